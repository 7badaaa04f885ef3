//! The `[Events]` section: backgrounds, breaks and storyboard scripting.
//!
//! Flat events (background, video, break) are single lines. Sprite, sample
//! and animation events own a nested command block: subsequent lines starting
//! with one depth marker (space or underscore) belong to the event, and lines
//! with two markers belong to the innermost loop or trigger command.

use crate::beatmap::command::graphics::{Colour, Position};
use crate::beatmap::lex::Line;
use crate::beatmap::{SectionError, SectionErrorAt};
use crate::util::format_number;

/// A storyboard easing function, stored as its numeric code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Easing(pub u32);

impl Easing {
    /// No easing, linear interpolation.
    pub const LINEAR: Self = Self(0);
}

/// The storyboard layer an element renders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventLayer {
    /// Behind everything.
    Background,
    /// Visible while failing.
    Fail,
    /// Visible while passing.
    Pass,
    /// In front of gameplay background elements.
    Foreground,
    /// Over hit objects.
    Overlay,
}

impl EventLayer {
    /// Resolves the wire token, either the name or the numeric form.
    #[must_use]
    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "Background" | "0" => Self::Background,
            "Fail" | "1" => Self::Fail,
            "Pass" | "2" => Self::Pass,
            "Foreground" | "3" => Self::Foreground,
            "Overlay" | "4" => Self::Overlay,
            _ => return None,
        })
    }

    /// The canonical name form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Background => "Background",
            Self::Fail => "Fail",
            Self::Pass => "Pass",
            Self::Foreground => "Foreground",
            Self::Overlay => "Overlay",
        }
    }

    /// The numeric form, used by sample events.
    #[must_use]
    pub const fn to_wire(self) -> u32 {
        match self {
            Self::Background => 0,
            Self::Fail => 1,
            Self::Pass => 2,
            Self::Foreground => 3,
            Self::Overlay => 4,
        }
    }
}

/// Which point of the image the element's coordinates refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Origin {
    TopLeft,
    Centre,
    CentreLeft,
    TopRight,
    BottomCentre,
    TopCentre,
    Custom,
    CentreRight,
    BottomLeft,
    BottomRight,
}

impl Origin {
    /// Resolves the wire token, either the name or the numeric form.
    #[must_use]
    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "TopLeft" | "0" => Self::TopLeft,
            "Centre" | "1" => Self::Centre,
            "CentreLeft" | "2" => Self::CentreLeft,
            "TopRight" | "3" => Self::TopRight,
            "BottomCentre" | "4" => Self::BottomCentre,
            "TopCentre" | "5" => Self::TopCentre,
            "Custom" | "6" => Self::Custom,
            "CentreRight" | "7" => Self::CentreRight,
            "BottomLeft" | "8" => Self::BottomLeft,
            "BottomRight" | "9" => Self::BottomRight,
            _ => return None,
        })
    }

    /// The canonical name form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "TopLeft",
            Self::Centre => "Centre",
            Self::CentreLeft => "CentreLeft",
            Self::TopRight => "TopRight",
            Self::BottomCentre => "BottomCentre",
            Self::TopCentre => "TopCentre",
            Self::Custom => "Custom",
            Self::CentreRight => "CentreRight",
            Self::BottomLeft => "BottomLeft",
            Self::BottomRight => "BottomRight",
        }
    }
}

/// Whether an animation plays once or forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoopType {
    /// Repeat until the element's lifetime ends.
    LoopForever,
    /// Play the frames once, then hold the last frame.
    LoopOnce,
}

impl LoopType {
    /// Resolves the wire token, either the name or the numeric form.
    #[must_use]
    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "LoopForever" | "0" => Self::LoopForever,
            "LoopOnce" | "1" => Self::LoopOnce,
            _ => return None,
        })
    }

    /// The canonical name form.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LoopForever => "LoopForever",
            Self::LoopOnce => "LoopOnce",
        }
    }
}

/// The sprite parameter toggled by a `P` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parameter {
    /// Mirror the sprite horizontally.
    FlipHorizontal,
    /// Mirror the sprite vertically.
    FlipVertical,
    /// Blend additively instead of alpha blending.
    AdditiveBlending,
}

impl Parameter {
    /// Resolves the wire letter.
    #[must_use]
    pub const fn from_wire(token: &str) -> Option<Self> {
        Some(match token.as_bytes() {
            b"H" => Self::FlipHorizontal,
            b"V" => Self::FlipVertical,
            b"A" => Self::AdditiveBlending,
            _ => return None,
        })
    }

    /// The wire letter.
    #[must_use]
    pub const fn to_wire(self) -> &'static str {
        match self {
            Self::FlipHorizontal => "H",
            Self::FlipVertical => "V",
            Self::AdditiveBlending => "A",
        }
    }
}

/// An interpolating command: easing, time span and a start value with an
/// optional end value (omitted on the wire when the value is constant).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animate<T> {
    /// Easing applied over the span.
    pub easing: Easing,
    /// Span start in milliseconds.
    pub start_time: f64,
    /// Span end in milliseconds; `None` round-trips the empty wire slot.
    pub end_time: Option<f64>,
    /// Value at the start of the span.
    pub start: T,
    /// Value at the end of the span, when it differs from `start`.
    pub end: Option<T>,
}

/// A `P` command: toggles a sprite parameter over a span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterCommand {
    /// Easing applied over the span.
    pub easing: Easing,
    /// Span start in milliseconds.
    pub start_time: f64,
    /// Span end in milliseconds; `None` round-trips the empty wire slot.
    pub end_time: Option<f64>,
    /// The toggled parameter.
    pub parameter: Parameter,
}

/// An `L` command: replays its nested commands.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoopCommand {
    /// Loop start in milliseconds.
    pub start_time: f64,
    /// Number of iterations.
    pub count: u32,
    /// Commands replayed each iteration, relative to the loop start.
    pub commands: Vec<Command>,
}

/// A `T` command: plays its nested commands when a trigger fires.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerCommand {
    /// Trigger name, e.g. `HitSoundClap`.
    pub name: String,
    /// Start of the window the trigger is armed in.
    pub start_time: Option<f64>,
    /// End of the window the trigger is armed in.
    pub end_time: Option<f64>,
    /// Commands played when the trigger fires.
    pub commands: Vec<Command>,
}

/// A storyboard command, dispatched on its wire type code.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    /// `F`: opacity.
    Fade(Animate<f64>),
    /// `M`: both coordinates.
    Move(Animate<Position>),
    /// `MX`: x coordinate only.
    MoveX(Animate<f64>),
    /// `MY`: y coordinate only.
    MoveY(Animate<f64>),
    /// `S`: uniform scale.
    Scale(Animate<f64>),
    /// `V`: per-axis scale.
    VectorScale(Animate<Position>),
    /// `R`: rotation in radians.
    Rotate(Animate<f64>),
    /// `C`: tint colour.
    Colour(Animate<Colour>),
    /// `P`: sprite parameter toggle.
    Parameter(ParameterCommand),
    /// `L`: nested loop block.
    Loop(LoopCommand),
    /// `T`: nested trigger block.
    Trigger(TriggerCommand),
}

/// A background image event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackgroundEvent {
    /// Display time in milliseconds; 0 in practice.
    pub start_time: f64,
    /// Image path relative to the map directory.
    pub filename: String,
    /// Optional pixel offset from the playfield centre.
    pub offset: Option<(i32, i32)>,
}

/// A background video event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VideoEvent {
    /// Playback start in milliseconds.
    pub start_time: f64,
    /// Video path relative to the map directory.
    pub filename: String,
    /// Optional pixel offset from the playfield centre.
    pub offset: Option<(i32, i32)>,
}

/// A gameplay break.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreakEvent {
    /// Break start in milliseconds.
    pub start_time: f64,
    /// Break end in milliseconds.
    pub end_time: f64,
}

/// A storyboard sprite element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpriteEvent {
    /// Render layer.
    pub layer: EventLayer,
    /// Anchor point of the image.
    pub origin: Origin,
    /// Image path relative to the map directory.
    pub filepath: String,
    /// Default position.
    pub position: Position,
    /// Nested command block.
    pub commands: Vec<Command>,
}

/// A storyboard sound sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleEvent {
    /// Play time in milliseconds.
    pub time: f64,
    /// Layer gating playback (fail/pass).
    pub layer: EventLayer,
    /// Audio path relative to the map directory.
    pub filepath: String,
    /// Volume percentage; absent on the wire defaults to 100.
    pub volume: Option<f64>,
    /// Nested command block.
    pub commands: Vec<Command>,
}

/// A storyboard frame animation element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationEvent {
    /// Render layer.
    pub layer: EventLayer,
    /// Anchor point of the image.
    pub origin: Origin,
    /// Frame path template relative to the map directory.
    pub filepath: String,
    /// Default position.
    pub position: Position,
    /// Number of frames.
    pub frame_count: u32,
    /// Milliseconds between frames.
    pub frame_delay: f64,
    /// Loop behaviour; absent on the wire defaults to forever.
    pub loop_type: Option<LoopType>,
}

/// A storyboard animation plus its command block.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationElement {
    /// The animation header.
    pub animation: AnimationEvent,
    /// Nested command block.
    pub commands: Vec<Command>,
}

/// A storyboard event, dispatched on the first token of its header line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// `0`: background image.
    Background(BackgroundEvent),
    /// `Video`: background video.
    Video(VideoEvent),
    /// `2`: gameplay break.
    Break(BreakEvent),
    /// `Sprite`: storyboard sprite with commands.
    Sprite(SpriteEvent),
    /// `Sample`: storyboard sound with commands.
    Sample(SampleEvent),
    /// `Animation`: storyboard animation with commands.
    Animation(AnimationElement),
}

fn invalid(line: &Line<'_>) -> SectionErrorAt {
    SectionErrorAt::new(
        SectionError::InvalidEvent {
            raw: line.text.to_owned(),
        },
        line.span,
    )
}

/// Depth of the leading command markers (space or underscore).
fn command_depth(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ' || *c == '_').count()
}

/// Splits an event line on commas, keeping quoted filenames intact.
fn split_fields(text: &str) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut quoted = false;
    for piece in text.split(',') {
        match fields.last_mut() {
            Some(last) if quoted => {
                last.push(',');
                last.push_str(piece);
            }
            _ => fields.push(piece.to_owned()),
        }
        if piece.starts_with('"') != piece.ends_with('"') {
            quoted = !quoted;
        }
    }
    fields
}

fn unquote(field: &str) -> String {
    field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(field)
        .to_owned()
}

fn parse_number(field: &str, line: &Line<'_>) -> Result<f64, SectionErrorAt> {
    field.trim().parse().map_err(|_| invalid(line))
}

fn parse_offset(
    fields: &[String],
    line: &Line<'_>,
) -> Result<Option<(i32, i32)>, SectionErrorAt> {
    match fields {
        [] => Ok(None),
        [x, y] => Ok(Some((
            x.trim().parse().map_err(|_| invalid(line))?,
            y.trim().parse().map_err(|_| invalid(line))?,
        ))),
        _ => Err(invalid(line)),
    }
}

/// Decodes the whole section payload into an event list.
pub(crate) fn decode_events(lines: &[Line<'_>]) -> Result<Vec<Event>, SectionErrorAt> {
    let mut events = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        let line = &lines[index];
        if command_depth(line.text) != 0 {
            // command line with no owning element
            return Err(invalid(line));
        }
        index += 1;
        let fields = split_fields(line.text);
        let token = fields[0].trim();
        let event = match token {
            "0" | "Background" => {
                if fields.len() < 3 {
                    return Err(invalid(line));
                }
                Event::Background(BackgroundEvent {
                    start_time: parse_number(&fields[1], line)?,
                    filename: unquote(&fields[2]),
                    offset: parse_offset(&fields[3..], line)?,
                })
            }
            "1" | "Video" => {
                if fields.len() < 3 {
                    return Err(invalid(line));
                }
                Event::Video(VideoEvent {
                    start_time: parse_number(&fields[1], line)?,
                    filename: unquote(&fields[2]),
                    offset: parse_offset(&fields[3..], line)?,
                })
            }
            "2" | "Break" => {
                if fields.len() != 3 {
                    return Err(invalid(line));
                }
                Event::Break(BreakEvent {
                    start_time: parse_number(&fields[1], line)?,
                    end_time: parse_number(&fields[2], line)?,
                })
            }
            "Sprite" | "4" => {
                if fields.len() != 6 {
                    return Err(invalid(line));
                }
                let commands = decode_command_block(lines, &mut index, 1)?;
                Event::Sprite(SpriteEvent {
                    layer: EventLayer::from_wire(fields[1].trim()).ok_or_else(|| invalid(line))?,
                    origin: Origin::from_wire(fields[2].trim()).ok_or_else(|| invalid(line))?,
                    filepath: unquote(&fields[3]),
                    position: Position::new(
                        parse_number(&fields[4], line)?,
                        parse_number(&fields[5], line)?,
                    ),
                    commands,
                })
            }
            "Sample" | "5" => {
                if !(4..=5).contains(&fields.len()) {
                    return Err(invalid(line));
                }
                let volume = match fields.get(4) {
                    Some(raw) => Some(parse_number(raw, line)?),
                    None => None,
                };
                let commands = decode_command_block(lines, &mut index, 1)?;
                Event::Sample(SampleEvent {
                    time: parse_number(&fields[1], line)?,
                    layer: EventLayer::from_wire(fields[2].trim()).ok_or_else(|| invalid(line))?,
                    filepath: unquote(&fields[3]),
                    volume,
                    commands,
                })
            }
            "Animation" | "6" => {
                if !(8..=9).contains(&fields.len()) {
                    return Err(invalid(line));
                }
                let loop_type = match fields.get(8) {
                    Some(raw) => Some(
                        LoopType::from_wire(raw.trim()).ok_or_else(|| invalid(line))?,
                    ),
                    None => None,
                };
                let commands = decode_command_block(lines, &mut index, 1)?;
                Event::Animation(AnimationElement {
                    animation: AnimationEvent {
                        layer: EventLayer::from_wire(fields[1].trim())
                            .ok_or_else(|| invalid(line))?,
                        origin: Origin::from_wire(fields[2].trim())
                            .ok_or_else(|| invalid(line))?,
                        filepath: unquote(&fields[3]),
                        position: Position::new(
                            parse_number(&fields[4], line)?,
                            parse_number(&fields[5], line)?,
                        ),
                        frame_count: fields[6].trim().parse().map_err(|_| invalid(line))?,
                        frame_delay: parse_number(&fields[7], line)?,
                        loop_type,
                    },
                    commands,
                })
            }
            _ => {
                return Err(SectionErrorAt::new(
                    SectionError::UnknownEventType {
                        token: token.to_owned(),
                    },
                    line.span,
                ));
            }
        };
        events.push(event);
    }
    Ok(events)
}

/// Consumes consecutive lines at exactly `depth` markers as a command list,
/// recursing one level deeper for loop and trigger blocks.
fn decode_command_block(
    lines: &[Line<'_>],
    index: &mut usize,
    depth: usize,
) -> Result<Vec<Command>, SectionErrorAt> {
    let mut commands = Vec::new();
    while *index < lines.len() {
        let line = &lines[*index];
        if command_depth(line.text) != depth {
            break;
        }
        *index += 1;
        commands.push(decode_command(lines, index, line, depth)?);
    }
    Ok(commands)
}

fn decode_command(
    lines: &[Line<'_>],
    index: &mut usize,
    line: &Line<'_>,
    depth: usize,
) -> Result<Command, SectionErrorAt> {
    let payload = line.text.trim_start_matches([' ', '_']);
    let fields: Vec<&str> = payload.split(',').collect();
    let code = fields[0];

    if code == "L" {
        if fields.len() != 3 {
            return Err(invalid(line));
        }
        let commands = decode_command_block(lines, index, depth + 1)?;
        return Ok(Command::Loop(LoopCommand {
            start_time: parse_number(fields[1], line)?,
            count: fields[2].trim().parse().map_err(|_| invalid(line))?,
            commands,
        }));
    }
    if code == "T" {
        if !(2..=4).contains(&fields.len()) {
            return Err(invalid(line));
        }
        let start_time = match fields.get(2) {
            Some(raw) => Some(parse_number(raw, line)?),
            None => None,
        };
        let end_time = match fields.get(3) {
            Some(raw) => Some(parse_number(raw, line)?),
            None => None,
        };
        let commands = decode_command_block(lines, index, depth + 1)?;
        return Ok(Command::Trigger(TriggerCommand {
            name: fields[1].to_owned(),
            start_time,
            end_time,
            commands,
        }));
    }

    if fields.len() < 4 {
        return Err(invalid(line));
    }
    let easing = Easing(fields[1].trim().parse().map_err(|_| invalid(line))?);
    let start_time = parse_number(fields[2], line)?;
    let end_time = if fields[3].trim().is_empty() {
        None
    } else {
        Some(parse_number(fields[3], line)?)
    };
    let params = &fields[4..];
    let scalar = |params: &[&str]| -> Result<(f64, Option<f64>), SectionErrorAt> {
        match params {
            [start] => Ok((parse_number(start, line)?, None)),
            [start, end] => Ok((parse_number(start, line)?, Some(parse_number(end, line)?))),
            _ => Err(invalid(line)),
        }
    };
    let pair = |params: &[&str]| -> Result<(Position, Option<Position>), SectionErrorAt> {
        match params {
            [x, y] => Ok((
                Position::new(parse_number(x, line)?, parse_number(y, line)?),
                None,
            )),
            [x, y, x2, y2] => Ok((
                Position::new(parse_number(x, line)?, parse_number(y, line)?),
                Some(Position::new(
                    parse_number(x2, line)?,
                    parse_number(y2, line)?,
                )),
            )),
            _ => Err(invalid(line)),
        }
    };
    let channel = |raw: &str| -> Result<u8, SectionErrorAt> {
        raw.trim().parse().map_err(|_| invalid(line))
    };
    let triple = |params: &[&str]| -> Result<(Colour, Option<Colour>), SectionErrorAt> {
        match params {
            [r, g, b] => Ok((
                Colour::new(channel(r)?, channel(g)?, channel(b)?),
                None,
            )),
            [r, g, b, r2, g2, b2] => Ok((
                Colour::new(channel(r)?, channel(g)?, channel(b)?),
                Some(Colour::new(channel(r2)?, channel(g2)?, channel(b2)?)),
            )),
            _ => Err(invalid(line)),
        }
    };

    macro_rules! animate {
        ($variant:ident, $decoder:expr) => {{
            let (start, end) = $decoder(params)?;
            Command::$variant(Animate {
                easing,
                start_time,
                end_time,
                start,
                end,
            })
        }};
    }
    Ok(match code {
        "F" => animate!(Fade, scalar),
        "M" => animate!(Move, pair),
        "MX" => animate!(MoveX, scalar),
        "MY" => animate!(MoveY, scalar),
        "S" => animate!(Scale, scalar),
        "V" => animate!(VectorScale, pair),
        "R" => animate!(Rotate, scalar),
        "C" => animate!(Colour, triple),
        "P" => {
            let [token] = params else {
                return Err(invalid(line));
            };
            Command::Parameter(ParameterCommand {
                easing,
                start_time,
                end_time,
                parameter: Parameter::from_wire(token.trim()).ok_or_else(|| invalid(line))?,
            })
        }
        _ => {
            return Err(SectionErrorAt::new(
                SectionError::UnknownCommandCode {
                    code: code.to_owned(),
                },
                line.span,
            ));
        }
    })
}

/// Renders all events back into section lines.
pub(crate) fn encode_events(events: &[Event]) -> Vec<String> {
    let mut out = Vec::new();
    for event in events {
        match event {
            Event::Background(background) => {
                let mut header = format!(
                    "0,{},\"{}\"",
                    format_number(background.start_time),
                    background.filename,
                );
                if let Some((x, y)) = background.offset {
                    header.push_str(&format!(",{x},{y}"));
                }
                out.push(header);
            }
            Event::Video(video) => {
                let mut header = format!(
                    "Video,{},\"{}\"",
                    format_number(video.start_time),
                    video.filename,
                );
                if let Some((x, y)) = video.offset {
                    header.push_str(&format!(",{x},{y}"));
                }
                out.push(header);
            }
            Event::Break(gameplay_break) => {
                out.push(format!(
                    "2,{},{}",
                    format_number(gameplay_break.start_time),
                    format_number(gameplay_break.end_time),
                ));
            }
            Event::Sprite(sprite) => {
                out.push(format!(
                    "Sprite,{},{},\"{}\",{},{}",
                    sprite.layer.name(),
                    sprite.origin.name(),
                    sprite.filepath,
                    format_number(sprite.position.x),
                    format_number(sprite.position.y),
                ));
                encode_commands(&sprite.commands, 1, &mut out);
            }
            Event::Sample(sample) => {
                let mut header = format!(
                    "Sample,{},{},\"{}\"",
                    format_number(sample.time),
                    sample.layer.to_wire(),
                    sample.filepath,
                );
                if let Some(volume) = sample.volume {
                    header.push_str(&format!(",{}", format_number(volume)));
                }
                out.push(header);
                encode_commands(&sample.commands, 1, &mut out);
            }
            Event::Animation(element) => {
                let animation = &element.animation;
                let mut header = format!(
                    "Animation,{},{},\"{}\",{},{},{},{}",
                    animation.layer.name(),
                    animation.origin.name(),
                    animation.filepath,
                    format_number(animation.position.x),
                    format_number(animation.position.y),
                    animation.frame_count,
                    format_number(animation.frame_delay),
                );
                if let Some(loop_type) = animation.loop_type {
                    header.push_str(&format!(",{}", loop_type.name()));
                }
                out.push(header);
                encode_commands(&element.commands, 1, &mut out);
            }
        }
    }
    out
}

fn encode_commands(commands: &[Command], depth: usize, out: &mut Vec<String>) {
    let marker = " ".repeat(depth);
    for command in commands {
        let animate_scalar = |code: &str, animate: &Animate<f64>| {
            let mut text = animate_head(&marker, code, animate.easing, animate.start_time, animate.end_time);
            text.push_str(&format!(",{}", format_number(animate.start)));
            if let Some(end) = animate.end {
                text.push_str(&format!(",{}", format_number(end)));
            }
            text
        };
        let animate_pair = |code: &str, animate: &Animate<Position>| {
            let mut text = animate_head(&marker, code, animate.easing, animate.start_time, animate.end_time);
            text.push_str(&format!(
                ",{},{}",
                format_number(animate.start.x),
                format_number(animate.start.y)
            ));
            if let Some(end) = animate.end {
                text.push_str(&format!(
                    ",{},{}",
                    format_number(end.x),
                    format_number(end.y)
                ));
            }
            text
        };
        match command {
            Command::Fade(animate) => out.push(animate_scalar("F", animate)),
            Command::Move(animate) => out.push(animate_pair("M", animate)),
            Command::MoveX(animate) => out.push(animate_scalar("MX", animate)),
            Command::MoveY(animate) => out.push(animate_scalar("MY", animate)),
            Command::Scale(animate) => out.push(animate_scalar("S", animate)),
            Command::VectorScale(animate) => out.push(animate_pair("V", animate)),
            Command::Rotate(animate) => out.push(animate_scalar("R", animate)),
            Command::Colour(animate) => {
                let mut text = animate_head(&marker, "C", animate.easing, animate.start_time, animate.end_time);
                let start = animate.start;
                text.push_str(&format!(",{},{},{}", start.red, start.green, start.blue));
                if let Some(end) = animate.end {
                    text.push_str(&format!(",{},{},{}", end.red, end.green, end.blue));
                }
                out.push(text);
            }
            Command::Parameter(parameter) => {
                let mut text = animate_head(
                    &marker,
                    "P",
                    parameter.easing,
                    parameter.start_time,
                    parameter.end_time,
                );
                text.push_str(&format!(",{}", parameter.parameter.to_wire()));
                out.push(text);
            }
            Command::Loop(loop_command) => {
                out.push(format!(
                    "{marker}L,{},{}",
                    format_number(loop_command.start_time),
                    loop_command.count,
                ));
                encode_commands(&loop_command.commands, depth + 1, out);
            }
            Command::Trigger(trigger) => {
                let mut text = format!("{marker}T,{}", trigger.name);
                if let Some(start_time) = trigger.start_time {
                    text.push_str(&format!(",{}", format_number(start_time)));
                    if let Some(end_time) = trigger.end_time {
                        text.push_str(&format!(",{}", format_number(end_time)));
                    }
                }
                out.push(text);
                encode_commands(&trigger.commands, depth + 1, out);
            }
        }
    }
}

fn animate_head(
    marker: &str,
    code: &str,
    easing: Easing,
    start_time: f64,
    end_time: Option<f64>,
) -> String {
    format!(
        "{marker}{code},{},{},{}",
        easing.0,
        format_number(start_time),
        end_time.map(format_number).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::Span;

    fn lines(texts: &[&'static str]) -> Vec<Line<'static>> {
        texts
            .iter()
            .map(|text| Line {
                text,
                span: Span::default(),
            })
            .collect()
    }

    #[test]
    fn decodes_flat_events() {
        let events = decode_events(&lines(&[
            "0,0,\"bg.jpg\",0,0",
            "Video,1200,\"intro.avi\"",
            "2,24000,32000",
        ]))
        .unwrap();
        assert_eq!(events.len(), 3);
        let Event::Background(background) = &events[0] else {
            panic!("expected background");
        };
        assert_eq!(background.filename, "bg.jpg");
        assert_eq!(background.offset, Some((0, 0)));
        assert!(matches!(&events[2], Event::Break(b) if b.end_time == 32000.0));
    }

    #[test]
    fn quoted_filename_may_contain_commas() {
        let events = decode_events(&lines(&["0,0,\"a,b.jpg\""])).unwrap();
        let Event::Background(background) = &events[0] else {
            panic!("expected background");
        };
        assert_eq!(background.filename, "a,b.jpg");
    }

    #[test]
    fn sprite_consumes_its_command_block() {
        let events = decode_events(&lines(&[
            "Sprite,Foreground,Centre,\"sb/glow.png\",320,240",
            " F,0,1000,2000,0,1",
            " M,0,1000,,320,240",
            "Sprite,Background,TopLeft,\"sb/back.png\",0,0",
        ]))
        .unwrap();
        assert_eq!(events.len(), 2);
        let Event::Sprite(sprite) = &events[0] else {
            panic!("expected sprite");
        };
        assert_eq!(sprite.commands.len(), 2);
        let Command::Move(animate) = &sprite.commands[1] else {
            panic!("expected move");
        };
        assert_eq!(animate.end_time, None);
        assert_eq!(animate.end, None);
    }

    #[test]
    fn loop_owns_deeper_lines() {
        let events = decode_events(&lines(&[
            "Sprite,Pass,Centre,\"sb/p.png\",320,240",
            " L,0,8",
            "  F,0,0,500,0,1",
            "  F,0,500,1000,1,0",
            " S,0,0,,0.5",
        ]))
        .unwrap();
        let Event::Sprite(sprite) = &events[0] else {
            panic!("expected sprite");
        };
        assert_eq!(sprite.commands.len(), 2);
        let Command::Loop(loop_command) = &sprite.commands[0] else {
            panic!("expected loop");
        };
        assert_eq!(loop_command.count, 8);
        assert_eq!(loop_command.commands.len(), 2);
    }

    #[test]
    fn underscore_markers_are_accepted() {
        let events = decode_events(&lines(&[
            "Sprite,Fail,Centre,\"sb/f.png\",320,240",
            "_F,0,0,100,1",
        ]))
        .unwrap();
        let Event::Sprite(sprite) = &events[0] else {
            panic!("expected sprite");
        };
        assert_eq!(sprite.commands.len(), 1);
    }

    #[test]
    fn unknown_event_and_command_fail() {
        let error = decode_events(&lines(&["7,0,0"])).unwrap_err();
        assert_eq!(
            error.error,
            SectionError::UnknownEventType { token: "7".into() }
        );
        let error = decode_events(&lines(&[
            "Sprite,Pass,Centre,\"x.png\",0,0",
            " Q,0,0,1",
        ]))
        .unwrap_err();
        assert_eq!(
            error.error,
            SectionError::UnknownCommandCode { code: "Q".into() }
        );
    }

    #[test]
    fn encode_round_trips_nested_blocks() {
        let source = [
            "Sprite,Foreground,Centre,\"sb/glow.png\",320,240",
            " F,0,1000,2000,0,1",
            " L,2000,4",
            "  MX,3,0,100,64,320",
            " T,HitSoundClap,5000,6000",
            "  C,0,0,,255,0,0",
            "Sample,3000,3,\"soft-hitclap.wav\",80",
        ];
        let events = decode_events(&lines(&source)).unwrap();
        let expected: Vec<String> = source.iter().map(|&text| text.to_owned()).collect();
        assert_eq!(encode_events(&events), expected);
    }
}
