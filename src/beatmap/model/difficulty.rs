//! The `[Difficulty]` section: gameplay scalar settings.

use crate::beatmap::SectionErrorAt;
use crate::beatmap::lex::Line;
use crate::util::format_number;

use super::fields::{parse_field, split_key_value};

/// Typed view of the `[Difficulty]` section.
///
/// `ApproachRate` is absent in revisions before it split off from
/// `OverallDifficulty`; consumers fall back via [`Difficulty::approach_rate_or_od`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Difficulty {
    /// Health drain rate, 0..=10.
    pub hp_drain_rate: Option<f64>,
    /// Circle size, 0..=10.
    pub circle_size: Option<f64>,
    /// Hit window tightness, 0..=10.
    pub overall_difficulty: Option<f64>,
    /// Approach circle speed, 0..=10.
    pub approach_rate: Option<f64>,
    /// Base slider speed in hundreds of playfield pixels per beat.
    pub slider_multiplier: Option<f64>,
    /// Slider ticks per beat.
    pub slider_tick_rate: Option<f64>,
}

impl Difficulty {
    /// Approach rate, falling back to overall difficulty as old clients did.
    #[must_use]
    pub fn approach_rate_or_od(&self) -> Option<f64> {
        self.approach_rate.or(self.overall_difficulty)
    }

    pub(crate) fn decode(lines: &[Line<'_>]) -> Result<Self, SectionErrorAt> {
        let mut difficulty = Self::default();
        for line in lines {
            let Some((key, value)) = split_key_value(line.text) else {
                continue;
            };
            match key {
                "HPDrainRate" => difficulty.hp_drain_rate = Some(parse_field(key, value, line)?),
                "CircleSize" => difficulty.circle_size = Some(parse_field(key, value, line)?),
                "OverallDifficulty" => {
                    difficulty.overall_difficulty = Some(parse_field(key, value, line)?);
                }
                "ApproachRate" => difficulty.approach_rate = Some(parse_field(key, value, line)?),
                "SliderMultiplier" => {
                    difficulty.slider_multiplier = Some(parse_field(key, value, line)?);
                }
                "SliderTickRate" => {
                    difficulty.slider_tick_rate = Some(parse_field(key, value, line)?);
                }
                _ => {}
            }
        }
        Ok(difficulty)
    }

    pub(crate) fn encode_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut push = |key: &str, value: f64| out.push(format!("{key}:{}", format_number(value)));
        if let Some(hp_drain_rate) = self.hp_drain_rate {
            push("HPDrainRate", hp_drain_rate);
        }
        if let Some(circle_size) = self.circle_size {
            push("CircleSize", circle_size);
        }
        if let Some(overall_difficulty) = self.overall_difficulty {
            push("OverallDifficulty", overall_difficulty);
        }
        if let Some(approach_rate) = self.approach_rate {
            push("ApproachRate", approach_rate);
        }
        if let Some(slider_multiplier) = self.slider_multiplier {
            push("SliderMultiplier", slider_multiplier);
        }
        if let Some(slider_tick_rate) = self.slider_tick_rate {
            push("SliderTickRate", slider_tick_rate);
        }
        out
    }
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
    fn ar_falls_back_to_od() {
        let difficulty = Difficulty::decode(&[line("OverallDifficulty:6")]).unwrap();
        assert_eq!(difficulty.approach_rate, None);
        assert_eq!(difficulty.approach_rate_or_od(), Some(6.0));
    }

    #[test]
    fn round_trip_preserves_decimals() {
        let difficulty = Difficulty::decode(&[line("SliderMultiplier:1.4")]).unwrap();
        assert_eq!(
            difficulty.encode_lines(),
            vec!["SliderMultiplier:1.4".to_owned()]
        );
    }
}
