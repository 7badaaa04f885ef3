//! The `[TimingPoints]` section: timing control points.
//!
//! Wire layout is positional:
//! `time,beatLength,meter,sampleSet,sampleIndex,volume,uninherited[,effects]`.
//! The explicit `uninherited` flag selects the variant; the sign of the
//! second field never does, since both are present on the wire.

use crate::beatmap::command::{Effects, sample::SampleSet};
use crate::beatmap::lex::Line;
use crate::beatmap::{SectionError, SectionErrorAt};
use crate::util::{format_number, round_to_significant_digits};

/// A timing control point, either establishing a new tempo or scaling the
/// current scroll speed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingPoint {
    /// Establishes beat duration and measure signature.
    Uninherited(UninheritedTimingPoint),
    /// Multiplies slider velocity under the governing uninherited point.
    Inherited(InheritedTimingPoint),
}

/// An uninherited (red) timing point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UninheritedTimingPoint {
    /// Start time in milliseconds.
    pub time: f64,
    /// Duration of one beat in milliseconds; positive.
    pub beat_length: f64,
    /// Beats per measure.
    pub time_signature: u32,
    /// Default sample bank from this point on.
    pub sample_set: SampleSet,
    /// Custom sample index, 0 for the skin default.
    pub sample_index: u32,
    /// Hit sample volume percentage.
    pub volume: u32,
    /// Effect flags.
    pub effects: Effects,
}

/// An inherited (green) timing point.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InheritedTimingPoint {
    /// Start time in milliseconds.
    pub time: f64,
    /// Slider velocity multiplier; stored on the wire as `-100 / velocity`
    /// rounded to 13 significant digits.
    pub slider_velocity: f64,
    /// Default sample bank from this point on.
    pub sample_set: SampleSet,
    /// Custom sample index, 0 for the skin default.
    pub sample_index: u32,
    /// Hit sample volume percentage.
    pub volume: u32,
    /// Effect flags.
    pub effects: Effects,
}

/// BPM described by a beat duration in milliseconds.
#[must_use]
pub fn bpm_from_beat_length(beat_length: f64) -> f64 {
    60000.0 / beat_length
}

/// Beat duration in milliseconds for a BPM.
#[must_use]
pub fn beat_length_from_bpm(bpm: f64) -> f64 {
    60000.0 / bpm
}

impl UninheritedTimingPoint {
    /// The tempo this point establishes.
    #[must_use]
    pub fn bpm(&self) -> f64 {
        bpm_from_beat_length(self.beat_length)
    }
}

impl TimingPoint {
    /// Start time in milliseconds.
    #[must_use]
    pub const fn time(&self) -> f64 {
        match self {
            Self::Uninherited(point) => point.time,
            Self::Inherited(point) => point.time,
        }
    }

    /// Default sample bank from this point on.
    #[must_use]
    pub const fn sample_set(&self) -> SampleSet {
        match self {
            Self::Uninherited(point) => point.sample_set,
            Self::Inherited(point) => point.sample_set,
        }
    }

    /// Custom sample index from this point on.
    #[must_use]
    pub const fn sample_index(&self) -> u32 {
        match self {
            Self::Uninherited(point) => point.sample_index,
            Self::Inherited(point) => point.sample_index,
        }
    }

    /// Hit sample volume from this point on.
    #[must_use]
    pub const fn volume(&self) -> u32 {
        match self {
            Self::Uninherited(point) => point.volume,
            Self::Inherited(point) => point.volume,
        }
    }

    /// Effect flags of this point.
    #[must_use]
    pub const fn effects(&self) -> Effects {
        match self {
            Self::Uninherited(point) => point.effects,
            Self::Inherited(point) => point.effects,
        }
    }

    pub(crate) fn decode(line: &Line<'_>) -> Result<Self, SectionErrorAt> {
        let invalid = || {
            SectionErrorAt::new(
                SectionError::InvalidTimingPoint {
                    raw: line.text.to_owned(),
                },
                line.span,
            )
        };
        let fields: Vec<&str> = line.text.split(',').map(str::trim).collect();
        if !(7..=8).contains(&fields.len()) {
            return Err(invalid());
        }
        let number = |index: usize| fields[index].parse::<f64>().map_err(|_| invalid());
        let integer = |index: usize| fields[index].parse::<u32>().map_err(|_| invalid());

        let time = number(0)?;
        let value = number(1)?;
        let time_signature = integer(2)?;
        let sample_set = SampleSet::from_wire(integer(3)?).ok_or_else(invalid)?;
        let sample_index = integer(4)?;
        let volume = integer(5)?;
        let uninherited = integer(6)? != 0;
        let effects = Effects(match fields.get(7) {
            Some(raw) => raw.parse().map_err(|_| invalid())?,
            None => 0,
        });

        Ok(if uninherited {
            Self::Uninherited(UninheritedTimingPoint {
                time,
                beat_length: value,
                time_signature,
                sample_set,
                sample_index,
                volume,
                effects,
            })
        } else {
            if value == 0.0 {
                return Err(invalid());
            }
            Self::Inherited(InheritedTimingPoint {
                time,
                slider_velocity: -100.0 / value,
                sample_set,
                sample_index,
                volume,
                effects,
            })
        })
    }

    /// Renders the wire line. `governing_signature` is the time signature of
    /// the governing uninherited point, used only by inherited points (which
    /// store no signature of their own).
    #[must_use]
    pub(crate) fn encode(&self, governing_signature: u32) -> String {
        match self {
            Self::Uninherited(point) => format!(
                "{},{},{},{},{},{},1,{}",
                format_number(point.time),
                format_number(point.beat_length),
                point.time_signature,
                point.sample_set.to_wire(),
                point.sample_index,
                point.volume,
                point.effects.0,
            ),
            Self::Inherited(point) => format!(
                "{},{},{},{},{},{},0,{}",
                format_number(point.time),
                format_number(round_to_significant_digits(
                    -100.0 / point.slider_velocity,
                    13
                )),
                governing_signature,
                point.sample_set.to_wire(),
                point.sample_index,
                point.volume,
                point.effects.0,
            ),
        }
    }
}

/// The latest uninherited point at or before `time`, scanning the logically
/// time-ordered list.
#[must_use]
pub fn governing_uninherited(points: &[TimingPoint], time: f64) -> Option<&UninheritedTimingPoint> {
    points
        .iter()
        .filter_map(|point| match point {
            TimingPoint::Uninherited(point) if point.time <= time => Some(point),
            _ => None,
        })
        .last()
}

/// Time signature in effect at `time`; 4 when no uninherited point governs.
#[must_use]
pub fn governing_signature(points: &[TimingPoint], time: f64) -> u32 {
    governing_uninherited(points, time).map_or(4, |point| point.time_signature)
}

/// Slider velocity multiplier in effect at `time`. An inherited point only
/// applies while it is not superseded by a later uninherited point.
#[must_use]
pub fn effective_slider_velocity(points: &[TimingPoint], time: f64) -> f64 {
    let mut velocity = 1.0;
    let mut tempo_time = f64::NEG_INFINITY;
    for point in points.iter().filter(|point| point.time() <= time) {
        match point {
            TimingPoint::Uninherited(point) => {
                tempo_time = point.time;
                velocity = 1.0;
            }
            TimingPoint::Inherited(point) => {
                if point.time >= tempo_time {
                    velocity = point.slider_velocity;
                }
            }
        }
    }
    velocity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::Span;

    fn line(text: &'static str) -> Line<'static> {
        Line {
            text,
            span: Span::default(),
        }
    }

    #[test]
    fn decodes_uninherited() {
        let point = TimingPoint::decode(&line("1000,300,4,2,1,60,1,1")).unwrap();
        let TimingPoint::Uninherited(point) = point else {
            panic!("expected uninherited");
        };
        assert_eq!(point.time, 1000.0);
        assert_eq!(point.beat_length, 300.0);
        assert_eq!(point.sample_set, SampleSet::Soft);
        assert!(point.effects.kiai());
        assert_eq!(point.bpm(), 200.0);
    }

    #[test]
    fn decodes_inherited_velocity() {
        let point = TimingPoint::decode(&line("2000,-50,4,1,0,80,0,0")).unwrap();
        let TimingPoint::Inherited(point) = point else {
            panic!("expected inherited");
        };
        assert_eq!(point.slider_velocity, 2.0);
    }

    #[test]
    fn flag_beats_sign_for_variant_selection() {
        // negative second field, but the explicit flag says uninherited
        let point = TimingPoint::decode(&line("0,-100,4,1,0,100,1,0")).unwrap();
        assert!(matches!(point, TimingPoint::Uninherited(_)));
    }

    #[test]
    fn trailing_effects_field_is_optional() {
        let point = TimingPoint::decode(&line("0,500,4,1,0,100,1")).unwrap();
        assert_eq!(point.effects(), Effects(0));
    }

    #[test]
    fn wrong_arity_fails() {
        assert!(TimingPoint::decode(&line("0,500")).is_err());
        assert!(TimingPoint::decode(&line("0,500,4,1,0,100,1,0,9")).is_err());
    }

    #[test]
    fn non_numeric_fails() {
        assert!(TimingPoint::decode(&line("x,500,4,1,0,100,1,0")).is_err());
    }

    #[test]
    fn bpm_inverse_law() {
        assert_eq!(bpm_from_beat_length(500.0), 120.0);
        let beat_length = 431.654_f64;
        let bpm = bpm_from_beat_length(beat_length);
        assert!((beat_length_from_bpm(bpm) - beat_length).abs() < 1e-9);
    }

    #[test]
    fn velocity_encode_rounds_to_13_significant_digits() {
        let point = TimingPoint::Inherited(InheritedTimingPoint {
            time: 100.0,
            slider_velocity: 0.75,
            sample_set: SampleSet::Normal,
            sample_index: 0,
            volume: 100,
            effects: Effects(0),
        });
        assert_eq!(point.encode(4), "100,-133.3333333333,4,1,0,100,0,0");
    }

    #[test]
    fn governing_scans() {
        let points = vec![
            TimingPoint::decode(&line("0,500,3,1,0,100,1,0")).unwrap(),
            TimingPoint::decode(&line("1000,-50,4,1,0,100,0,0")).unwrap(),
            TimingPoint::decode(&line("2000,400,7,1,0,100,1,0")).unwrap(),
        ];
        assert_eq!(governing_signature(&points, 1500.0), 3);
        assert_eq!(governing_signature(&points, 2500.0), 7);
        assert_eq!(governing_signature(&points, -1.0), 4);
        assert_eq!(effective_slider_velocity(&points, 1500.0), 2.0);
        // the later uninherited point resets the multiplier
        assert_eq!(effective_slider_velocity(&points, 2500.0), 1.0);
    }
}
