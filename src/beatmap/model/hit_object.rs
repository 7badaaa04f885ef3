//! The `[HitObjects]` section: gameplay objects.
//!
//! Wire layout is positional: `x,y,time,type,hitSound,objectParams…,hitSample`.
//! `type` is a bitmask carrying the variant bit, the new-combo bit and a
//! 3-bit combo colour offset.

use itertools::Itertools;

use crate::beatmap::command::graphics::Position;
use crate::beatmap::command::sample::{HitSample, SamplePair, Sounds};
use crate::beatmap::lex::Line;
use crate::beatmap::{SectionError, SectionErrorAt, Span};
use crate::util::format_number;

/// Variant bit for a circle.
const TYPE_CIRCLE: u32 = 1;
/// Variant bit for a slider.
const TYPE_SLIDER: u32 = 2;
/// New-combo flag.
const TYPE_NEW_COMBO: u32 = 4;
/// Variant bit for a spinner.
const TYPE_SPINNER: u32 = 8;
/// Mask of the 3-bit combo colour offset.
const TYPE_COMBO_OFFSET_MASK: u32 = 0b0111_0000;
/// Variant bit for an osu!mania hold.
const TYPE_HOLD: u32 = 128;

/// How a slider path interpolates its control points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveType {
    /// Catmull-Rom spline, the oldest curve kind.
    Catmull,
    /// Bezier curve of arbitrary degree.
    Bezier,
    /// Straight segments.
    Linear,
    /// Circular arc through three points.
    PerfectCurve,
}

impl CurveType {
    /// Resolves the single-letter wire code.
    #[must_use]
    pub const fn from_wire(code: &str) -> Option<Self> {
        Some(match code.as_bytes() {
            b"C" => Self::Catmull,
            b"B" => Self::Bezier,
            b"L" => Self::Linear,
            b"P" => Self::PerfectCurve,
            _ => return None,
        })
    }

    /// The single-letter wire code.
    #[must_use]
    pub const fn to_wire(self) -> &'static str {
        match self {
            Self::Catmull => "C",
            Self::Bezier => "B",
            Self::Linear => "L",
            Self::PerfectCurve => "P",
        }
    }
}

/// Sounds played when one slider edge (head, repeat or tail) is passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeSound {
    /// Hit sound flags of this edge.
    pub sounds: Sounds,
    /// Sample bank pair of this edge.
    pub sample: SamplePair,
}

/// Per-edge sound data of a slider: head, one entry per repeat
/// (`slides - 1`), and tail. Wire-optional as a whole; sliders written
/// without edge lists round-trip without them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliderSounds {
    /// The edge passed when the slider starts.
    pub head: EdgeSound,
    /// Edges passed on each direction change, in order.
    pub repeats: Vec<EdgeSound>,
    /// The edge passed when the slider ends.
    pub tail: EdgeSound,
}

/// Fields common to every hit object variant.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitObjectCommon {
    /// Playfield position.
    pub position: Position,
    /// Hit time in milliseconds.
    pub time: f64,
    /// Hit sound flags.
    pub sounds: Sounds,
    /// Whether this object starts a new combo.
    pub new_combo: bool,
    /// Extra combo colours to skip when a new combo starts.
    pub combo_offset: u32,
    /// Trailing hit sample field; absent on the wire stays absent on encode.
    pub sample: Option<HitSample>,
}

/// A circle: tap once.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    /// Shared fields.
    pub common: HitObjectCommon,
}

/// A slider: follow a path, possibly repeating it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slider {
    /// Shared fields.
    pub common: HitObjectCommon,
    /// Path interpolation kind.
    pub curve_type: CurveType,
    /// Control points after the head position.
    pub curve_points: Vec<Position>,
    /// Number of times the path is traversed; at least 1.
    pub slides: u32,
    /// Visual path length in playfield pixels.
    pub length: f64,
    /// Per-edge sounds, when present on the wire.
    pub sounds: Option<SliderSounds>,
}

/// A spinner: spin until `end_time`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spinner {
    /// Shared fields.
    pub common: HitObjectCommon,
    /// End time in milliseconds.
    pub end_time: f64,
}

/// An osu!mania hold note: press until `end_time`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hold {
    /// Shared fields.
    pub common: HitObjectCommon,
    /// End time in milliseconds.
    pub end_time: f64,
}

/// A gameplay object. Variants are selected by the type bitmask and are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitObject {
    /// A tap circle.
    Circle(Circle),
    /// A path-following slider.
    Slider(Slider),
    /// A spinner.
    Spinner(Spinner),
    /// An osu!mania hold note.
    Hold(Hold),
}

impl HitObject {
    /// Shared fields of any variant.
    #[must_use]
    pub const fn common(&self) -> &HitObjectCommon {
        match self {
            Self::Circle(circle) => &circle.common,
            Self::Slider(slider) => &slider.common,
            Self::Spinner(spinner) => &spinner.common,
            Self::Hold(hold) => &hold.common,
        }
    }

    /// Shared fields of any variant, mutably.
    pub const fn common_mut(&mut self) -> &mut HitObjectCommon {
        match self {
            Self::Circle(circle) => &mut circle.common,
            Self::Slider(slider) => &mut slider.common,
            Self::Spinner(spinner) => &mut spinner.common,
            Self::Hold(hold) => &mut hold.common,
        }
    }

    /// Hit time in milliseconds.
    #[must_use]
    pub const fn time(&self) -> f64 {
        self.common().time
    }

    /// End time for span objects; `None` for circles and sliders, whose end
    /// is derived from timing (see [`super::Beatmap::slider_end_time`]).
    #[must_use]
    pub const fn stored_end_time(&self) -> Option<f64> {
        match self {
            Self::Spinner(spinner) => Some(spinner.end_time),
            Self::Hold(hold) => Some(hold.end_time),
            Self::Circle(_) | Self::Slider(_) => None,
        }
    }

    pub(crate) fn decode(line: &Line<'_>) -> Result<Self, SectionErrorAt> {
        let invalid = || {
            SectionErrorAt::new(
                SectionError::InvalidHitObject {
                    raw: line.text.to_owned(),
                },
                line.span,
            )
        };
        let fields: Vec<&str> = line.text.split(',').collect();
        if fields.len() < 5 {
            return Err(invalid());
        }
        let number = |raw: &str| raw.trim().parse::<f64>().map_err(|_| invalid());
        let integer = |raw: &str| raw.trim().parse::<u32>().map_err(|_| invalid());

        let position = Position::new(number(fields[0])?, number(fields[1])?);
        let time = number(fields[2])?;
        let type_bits = integer(fields[3])?;
        let sounds = Sounds(integer(fields[4])?);
        let common = HitObjectCommon {
            position,
            time,
            sounds,
            new_combo: type_bits & TYPE_NEW_COMBO != 0,
            combo_offset: (type_bits & TYPE_COMBO_OFFSET_MASK) >> 4,
            sample: None,
        };
        let sample = |raw: &str| {
            HitSample::from_wire(raw).ok_or_else(invalid)
        };

        if type_bits & TYPE_CIRCLE != 0 {
            let mut common = common;
            match fields.len() {
                5 => {}
                6 => common.sample = Some(sample(fields[5])?),
                _ => return Err(invalid()),
            }
            Ok(Self::Circle(Circle { common }))
        } else if type_bits & TYPE_SLIDER != 0 {
            Self::decode_slider(&fields, common, &invalid)
        } else if type_bits & TYPE_SPINNER != 0 {
            let mut common = common;
            let end_time = match fields.len() {
                6 => number(fields[5])?,
                7 => {
                    common.sample = Some(sample(fields[6])?);
                    number(fields[5])?
                }
                _ => return Err(invalid()),
            };
            Ok(Self::Spinner(Spinner { common, end_time }))
        } else if type_bits & TYPE_HOLD != 0 {
            if fields.len() != 6 {
                return Err(invalid());
            }
            let mut common = common;
            // the hold tail packs `endTime:hitSample` into one comma field
            let (end_time, packed_sample) = match fields[5].split_once(':') {
                Some((end, rest)) => (number(end)?, Some(rest)),
                None => (number(fields[5])?, None),
            };
            if let Some(raw) = packed_sample.filter(|raw| !raw.is_empty()) {
                common.sample = Some(sample(raw)?);
            }
            Ok(Self::Hold(Hold { common, end_time }))
        } else {
            Err(SectionErrorAt::new(
                SectionError::UnsupportedHitObjectType { bits: type_bits },
                line.span,
            ))
        }
    }

    fn decode_slider(
        fields: &[&str],
        mut common: HitObjectCommon,
        invalid: &dyn Fn() -> SectionErrorAt,
    ) -> Result<Self, SectionErrorAt> {
        if !(8..=11).contains(&fields.len()) {
            return Err(invalid());
        }
        let mut curve = fields[5].split('|');
        let curve_type = CurveType::from_wire(curve.next().unwrap_or("")).ok_or_else(invalid)?;
        let curve_points = curve
            .map(|pair| {
                let (x, y) = pair.split_once(':')?;
                Some(Position::new(x.parse().ok()?, y.parse().ok()?))
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        let slides: u32 = fields[6].trim().parse().map_err(|_| invalid())?;
        if slides == 0 {
            return Err(invalid());
        }
        let length: f64 = fields[7].trim().parse().map_err(|_| invalid())?;

        let mut sounds = None;
        if let Some(raw_sounds) = fields.get(8) {
            let edge_sounds = raw_sounds
                .split('|')
                .map(|raw| raw.parse::<u32>().ok().map(Sounds))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(invalid)?;
            let edge_sets = match fields.get(9) {
                Some(raw_sets) => raw_sets
                    .split('|')
                    .map(SamplePair::from_wire)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(invalid)?,
                None => vec![SamplePair::default(); edge_sounds.len()],
            };
            let edge_count = slides as usize + 1;
            if edge_sounds.len() != edge_count || edge_sets.len() != edge_count {
                return Err(invalid());
            }
            let mut edges = edge_sounds
                .into_iter()
                .zip(edge_sets)
                .map(|(sounds, sample)| EdgeSound { sounds, sample });
            let head = edges.next().ok_or_else(invalid)?;
            let mut repeats: Vec<EdgeSound> = edges.collect();
            let tail = repeats.pop().ok_or_else(invalid)?;
            sounds = Some(SliderSounds {
                head,
                repeats,
                tail,
            });
        }
        if let Some(raw_sample) = fields.get(10) {
            common.sample = Some(HitSample::from_wire(raw_sample).ok_or_else(invalid)?);
        }
        Ok(Self::Slider(Slider {
            common,
            curve_type,
            curve_points,
            slides,
            length,
            sounds,
        }))
    }

    /// Renders the wire line.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let common = self.common();
        let variant_bit = match self {
            Self::Circle(_) => TYPE_CIRCLE,
            Self::Slider(_) => TYPE_SLIDER,
            Self::Spinner(_) => TYPE_SPINNER,
            Self::Hold(_) => TYPE_HOLD,
        };
        let type_bits = variant_bit
            | if common.new_combo { TYPE_NEW_COMBO } else { 0 }
            | ((common.combo_offset << 4) & TYPE_COMBO_OFFSET_MASK);
        let mut out = format!(
            "{},{},{},{},{}",
            format_number(common.position.x),
            format_number(common.position.y),
            format_number(common.time),
            type_bits,
            common.sounds.0,
        );
        match self {
            Self::Circle(_) => {}
            Self::Slider(slider) => {
                out.push(',');
                out.push_str(slider.curve_type.to_wire());
                for point in &slider.curve_points {
                    out.push('|');
                    out.push_str(&point.to_curve_wire());
                }
                out.push_str(&format!(
                    ",{},{}",
                    slider.slides,
                    format_number(slider.length)
                ));
                let synthesized;
                let sounds = match (&slider.sounds, &common.sample) {
                    (Some(sounds), _) => Some(sounds),
                    // a trailing sample needs the edge lists in front of it
                    (None, Some(_)) => {
                        synthesized = SliderSounds {
                            head: EdgeSound {
                                sounds: common.sounds,
                                sample: SamplePair::default(),
                            },
                            repeats: vec![
                                EdgeSound {
                                    sounds: common.sounds,
                                    sample: SamplePair::default(),
                                };
                                slider.slides.saturating_sub(1) as usize
                            ],
                            tail: EdgeSound {
                                sounds: common.sounds,
                                sample: SamplePair::default(),
                            },
                        };
                        Some(&synthesized)
                    }
                    (None, None) => None,
                };
                if let Some(sounds) = sounds {
                    let edges = std::iter::once(&sounds.head)
                        .chain(&sounds.repeats)
                        .chain(std::iter::once(&sounds.tail));
                    out.push(',');
                    out.push_str(&edges.clone().map(|edge| edge.sounds.0).join("|"));
                    out.push(',');
                    out.push_str(&edges.map(|edge| edge.sample.to_wire()).join("|"));
                }
            }
            Self::Spinner(spinner) => {
                out.push(',');
                out.push_str(&format_number(spinner.end_time));
            }
            Self::Hold(hold) => {
                out.push(',');
                out.push_str(&format_number(hold.end_time));
            }
        }
        if let Some(sample) = &common.sample {
            // the hold tail joins with a colon instead of a comma
            out.push(if matches!(self, Self::Hold(_)) { ':' } else { ',' });
            out.push_str(&sample.to_wire());
        }
        out
    }

    #[allow(dead_code)]
    pub(crate) fn decode_str(text: &str) -> Result<Self, SectionErrorAt> {
        Self::decode(&Line {
            text,
            span: Span::default(),
        })
    }
}
