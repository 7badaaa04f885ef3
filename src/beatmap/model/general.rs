//! The `[General]` section: global settings of the map.

use crate::beatmap::SectionErrorAt;
use crate::beatmap::command::{GameMode, OverlayPosition, sample::SampleSet};
use crate::beatmap::lex::Line;
use crate::util::format_number;

use super::fields::{parse_bool, parse_field, split_key_value};

/// Typed view of the `[General]` section. Every field is wire-optional;
/// `None` means the key was absent and is not re-emitted on encode.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct General {
    /// Audio file relative to the map directory.
    pub audio_filename: Option<String>,
    /// Milliseconds of silence before the audio starts.
    pub audio_lead_in: Option<i32>,
    /// Legacy audio checksum; dead weight carried by old files.
    pub audio_hash: Option<String>,
    /// Song-select preview time in milliseconds, `-1` when unset.
    pub preview_time: Option<i32>,
    /// Countdown speed before the first object (0 = none).
    pub countdown: Option<i32>,
    /// Default sample bank when objects do not override it.
    pub sample_set: Option<SampleSet>,
    /// Stacking tolerance multiplier, 0..=1.
    pub stack_leniency: Option<f64>,
    /// Ruleset of the map.
    pub mode: Option<GameMode>,
    /// Letterbox the screen during breaks.
    pub letterbox_in_breaks: Option<bool>,
    /// Draw the combo fire under the storyboard (legacy).
    pub story_fire_in_front: Option<bool>,
    /// Let the storyboard reference skin sprites.
    pub use_skin_sprites: Option<bool>,
    /// Always draw the playfield even with a storyboard (legacy).
    pub always_show_playfield: Option<bool>,
    /// Position of the hit circle overlay relative to hit numbers.
    pub overlay_position: Option<OverlayPosition>,
    /// Preferred skin name.
    pub skin_preference: Option<String>,
    /// Show the photosensitivity warning.
    pub epilepsy_warning: Option<bool>,
    /// Beats the countdown starts early.
    pub countdown_offset: Option<i32>,
    /// Use N+1 key layout for osu!mania special style.
    pub special_style: Option<bool>,
    /// The storyboard targets a widescreen canvas.
    pub widescreen_storyboard: Option<bool>,
    /// Pitch hit samples along with rate-changing mods.
    pub samples_match_playback_rate: Option<bool>,
}

impl General {
    pub(crate) fn decode(lines: &[Line<'_>]) -> Result<Self, SectionErrorAt> {
        let mut general = Self::default();
        for line in lines {
            let Some((key, value)) = split_key_value(line.text) else {
                continue;
            };
            match key {
                "AudioFilename" => general.audio_filename = Some(value.to_owned()),
                "AudioLeadIn" => general.audio_lead_in = Some(parse_field(key, value, line)?),
                "AudioHash" => general.audio_hash = Some(value.to_owned()),
                "PreviewTime" => general.preview_time = Some(parse_field(key, value, line)?),
                "Countdown" => general.countdown = Some(parse_field(key, value, line)?),
                "SampleSet" => {
                    general.sample_set = Some(SampleSet::from_name(value).ok_or_else(|| {
                        SectionErrorAt::invalid_field(key, value, line)
                    })?);
                }
                "StackLeniency" => general.stack_leniency = Some(parse_field(key, value, line)?),
                "Mode" => {
                    let wire: u32 = parse_field(key, value, line)?;
                    general.mode = Some(GameMode::from_wire(wire).ok_or_else(|| {
                        SectionErrorAt::invalid_field(key, value, line)
                    })?);
                }
                "LetterboxInBreaks" => {
                    general.letterbox_in_breaks = Some(parse_bool(key, value, line)?);
                }
                "StoryFireInFront" => {
                    general.story_fire_in_front = Some(parse_bool(key, value, line)?);
                }
                "UseSkinSprites" => general.use_skin_sprites = Some(parse_bool(key, value, line)?),
                "AlwaysShowPlayfield" => {
                    general.always_show_playfield = Some(parse_bool(key, value, line)?);
                }
                "OverlayPosition" => {
                    general.overlay_position =
                        Some(OverlayPosition::from_wire(value).ok_or_else(|| {
                            SectionErrorAt::invalid_field(key, value, line)
                        })?);
                }
                "SkinPreference" => general.skin_preference = Some(value.to_owned()),
                "EpilepsyWarning" => general.epilepsy_warning = Some(parse_bool(key, value, line)?),
                "CountdownOffset" => general.countdown_offset = Some(parse_field(key, value, line)?),
                "SpecialStyle" => general.special_style = Some(parse_bool(key, value, line)?),
                "WidescreenStoryboard" => {
                    general.widescreen_storyboard = Some(parse_bool(key, value, line)?);
                }
                "SamplesMatchPlaybackRate" => {
                    general.samples_match_playback_rate = Some(parse_bool(key, value, line)?);
                }
                _ => {}
            }
        }
        Ok(general)
    }

    pub(crate) fn encode_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut push = |key: &str, value: String| out.push(format!("{key}: {value}"));
        if let Some(audio_filename) = self.audio_filename.as_deref() {
            push("AudioFilename", audio_filename.to_owned());
        }
        if let Some(audio_lead_in) = self.audio_lead_in {
            push("AudioLeadIn", audio_lead_in.to_string());
        }
        if let Some(audio_hash) = self.audio_hash.as_deref() {
            push("AudioHash", audio_hash.to_owned());
        }
        if let Some(preview_time) = self.preview_time {
            push("PreviewTime", preview_time.to_string());
        }
        if let Some(countdown) = self.countdown {
            push("Countdown", countdown.to_string());
        }
        if let Some(sample_set) = self.sample_set {
            push("SampleSet", sample_set.name().to_owned());
        }
        if let Some(stack_leniency) = self.stack_leniency {
            push("StackLeniency", format_number(stack_leniency));
        }
        if let Some(mode) = self.mode {
            push("Mode", mode.to_wire().to_string());
        }
        if let Some(letterbox) = self.letterbox_in_breaks {
            push("LetterboxInBreaks", u8::from(letterbox).to_string());
        }
        if let Some(story_fire) = self.story_fire_in_front {
            push("StoryFireInFront", u8::from(story_fire).to_string());
        }
        if let Some(use_skin_sprites) = self.use_skin_sprites {
            push("UseSkinSprites", u8::from(use_skin_sprites).to_string());
        }
        if let Some(always_show) = self.always_show_playfield {
            push("AlwaysShowPlayfield", u8::from(always_show).to_string());
        }
        if let Some(overlay_position) = self.overlay_position {
            push("OverlayPosition", overlay_position.as_str().to_owned());
        }
        if let Some(skin_preference) = self.skin_preference.as_deref() {
            push("SkinPreference", skin_preference.to_owned());
        }
        if let Some(epilepsy_warning) = self.epilepsy_warning {
            push("EpilepsyWarning", u8::from(epilepsy_warning).to_string());
        }
        if let Some(countdown_offset) = self.countdown_offset {
            push("CountdownOffset", countdown_offset.to_string());
        }
        if let Some(special_style) = self.special_style {
            push("SpecialStyle", u8::from(special_style).to_string());
        }
        if let Some(widescreen) = self.widescreen_storyboard {
            push("WidescreenStoryboard", u8::from(widescreen).to_string());
        }
        if let Some(samples_match) = self.samples_match_playback_rate {
            push("SamplesMatchPlaybackRate", u8::from(samples_match).to_string());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beatmap::{SectionError, Span};

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
    fn decodes_known_fields_and_ignores_unknown() {
        let general = General::decode(&lines(&[
            "AudioFilename: audio.mp3",
            "StackLeniency: 0.7",
            "Mode: 3",
            "SomeFutureKey: whatever",
        ]))
        .unwrap();
        assert_eq!(general.audio_filename.as_deref(), Some("audio.mp3"));
        assert_eq!(general.stack_leniency, Some(0.7));
        assert_eq!(general.mode, Some(GameMode::Mania));
        assert_eq!(general.countdown, None);
    }

    #[test]
    fn absent_fields_are_not_encoded() {
        let general = General::decode(&lines(&["AudioLeadIn: 500"])).unwrap();
        assert_eq!(general.encode_lines(), vec!["AudioLeadIn: 500".to_owned()]);
    }

    #[test]
    fn invalid_value_fails() {
        let error = General::decode(&lines(&["PreviewTime: soon"])).unwrap_err();
        assert_eq!(
            error.error,
            SectionError::InvalidFieldValue {
                key: "PreviewTime".into(),
                raw: "soon".into(),
            }
        );
    }
}
