//! The typed document tree and its section decoders.

pub mod colours;
pub mod difficulty;
pub mod editor;
pub mod events;
pub(crate) mod fields;
pub mod general;
pub mod hit_object;
pub mod metadata;
pub mod timing;

use super::lex::{self, CommentPolicy, Line};
use super::{DecodeError, LATEST_FORMAT_VERSION, Result, SectionErrorAt, SectionName};

pub use self::colours::{ComboColour, Colours};
pub use self::difficulty::Difficulty;
pub use self::editor::Editor;
pub use self::events::Event;
pub use self::general::General;
pub use self::hit_object::{HitObject, Slider};
pub use self::metadata::Metadata;
pub use self::timing::TimingPoint;

/// The root parsed representation of one beatmap file.
///
/// Ownership is exclusive and tree-shaped: a decoded `Beatmap` holds no
/// references back into the source text, and derived tooling receives the
/// whole tree, mutates or rebuilds it, and hands it back.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beatmap {
    /// The `osu file format vN` revision, gating decode behaviour.
    pub version: i32,
    /// The `[General]` section.
    pub general: General,
    /// The `[Editor]` section; absent in old revisions.
    pub editor: Option<Editor>,
    /// The `[Metadata]` section.
    pub metadata: Metadata,
    /// The `[Difficulty]` section.
    pub difficulty: Difficulty,
    /// The `[Colours]` section, when present.
    pub colours: Option<Colours>,
    /// The `[Events]` section, in input order.
    pub events: Vec<Event>,
    /// The `[TimingPoints]` section, when present; logically ordered by time.
    pub timing_points: Option<Vec<TimingPoint>>,
    /// The `[HitObjects]` section, in input order.
    pub hit_objects: Vec<HitObject>,
}

impl Beatmap {
    /// Decodes document text. See [`crate::beatmap::decode`].
    ///
    /// # Errors
    ///
    /// Fails fast with the first [`DecodeError`]; no partial recovery.
    pub fn decode(source: &str) -> Result<Self> {
        let doc = lex::split_sections(source, CommentPolicy::Strip)?;
        for required in [
            SectionName::General,
            SectionName::Metadata,
            SectionName::Difficulty,
            SectionName::HitObjects,
        ] {
            if doc.block(required).is_none() {
                return Err(DecodeError::MissingRequiredSection { section: required });
            }
        }
        fn block_lines<'a, 'b>(
            doc: &'a lex::DocumentBlocks<'b>,
            section: SectionName,
        ) -> &'a [Line<'b>] {
            doc.block(section)
                .map_or(&[], |block| block.lines.as_slice())
        }
        let lines = |section: SectionName| block_lines(&doc, section);
        let wrap = |section: SectionName| {
            move |error: SectionErrorAt| error.into_decode_error(section)
        };

        let general =
            General::decode(lines(SectionName::General)).map_err(wrap(SectionName::General))?;
        let editor = doc
            .block(SectionName::Editor)
            .map(|block| Editor::decode(&block.lines))
            .transpose()
            .map_err(wrap(SectionName::Editor))?;
        let metadata =
            Metadata::decode(lines(SectionName::Metadata)).map_err(wrap(SectionName::Metadata))?;
        let difficulty = Difficulty::decode(lines(SectionName::Difficulty))
            .map_err(wrap(SectionName::Difficulty))?;
        let colours = doc
            .block(SectionName::Colours)
            .map(|block| Colours::decode(&block.lines))
            .transpose()
            .map_err(wrap(SectionName::Colours))?;
        let events = events::decode_events(lines(SectionName::Events))
            .map_err(wrap(SectionName::Events))?;
        let timing_points = doc
            .block(SectionName::TimingPoints)
            .map(|block| {
                block
                    .lines
                    .iter()
                    .map(TimingPoint::decode)
                    .collect::<core::result::Result<Vec<_>, _>>()
            })
            .transpose()
            .map_err(wrap(SectionName::TimingPoints))?;
        let hit_objects = lines(SectionName::HitObjects)
            .iter()
            .map(HitObject::decode)
            .collect::<core::result::Result<Vec<_>, _>>()
            .map_err(wrap(SectionName::HitObjects))?;

        Ok(Self {
            version: doc.version.unwrap_or(LATEST_FORMAT_VERSION),
            general,
            editor,
            metadata,
            difficulty,
            colours,
            events,
            timing_points,
            hit_objects,
        })
    }

    /// Renders the document. See [`crate::beatmap::encode`].
    #[must_use]
    pub fn encode(&self) -> String {
        super::encode::encode(self)
    }

    /// The timing point list, empty when the section is absent.
    #[must_use]
    pub fn timing_points(&self) -> &[TimingPoint] {
        self.timing_points.as_deref().unwrap_or(&[])
    }

    /// The combo colour palette, empty when the section is absent.
    #[must_use]
    pub fn combo_colours(&self) -> &[ComboColour] {
        self.colours
            .as_ref()
            .map_or(&[], |colours| colours.combo_colours.as_slice())
    }

    /// Minimum and maximum tempo over all uninherited points.
    #[must_use]
    pub fn bpm_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for point in self.timing_points() {
            if let TimingPoint::Uninherited(point) = point {
                let bpm = point.bpm();
                range = Some(range.map_or((bpm, bpm), |(min, max)| {
                    (min.min(bpm), max.max(bpm))
                }));
            }
        }
        range
    }

    /// Milliseconds one full traversal of `slider`'s path takes under the
    /// governing tempo and velocity. `None` without an uninherited point or a
    /// slider multiplier to derive from.
    #[must_use]
    pub fn slider_span_duration(&self, slider: &Slider) -> Option<f64> {
        let points = self.timing_points();
        let tempo = timing::governing_uninherited(points, slider.common.time)?;
        let multiplier = self.difficulty.slider_multiplier?;
        let velocity = timing::effective_slider_velocity(points, slider.common.time);
        Some(slider.length / (multiplier * 100.0 * velocity) * tempo.beat_length)
    }

    /// The time `slider` ends after all of its slides.
    #[must_use]
    pub fn slider_end_time(&self, slider: &Slider) -> Option<f64> {
        let span = self.slider_span_duration(slider)?;
        Some(slider.common.time + span * f64::from(slider.slides))
    }

    /// End time of any object: stored for spinners and holds, derived for
    /// sliders, the hit time itself for circles.
    #[must_use]
    pub fn object_end_time(&self, object: &HitObject) -> Option<f64> {
        match object {
            HitObject::Slider(slider) => self.slider_end_time(slider),
            _ => Some(object.stored_end_time().unwrap_or_else(|| object.time())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "osu file format v14\r\n\r\n[General]\r\nAudioFilename: audio.mp3\r\n\r\n[Metadata]\r\nTitle:t\r\n\r\n[Difficulty]\r\nSliderMultiplier:1\r\n\r\n[TimingPoints]\r\n0,500,4,1,0,100,1,0\r\n1000,-50,4,1,0,100,0,0\r\n\r\n[HitObjects]\r\n256,192,1000,1,0\r\n";

    #[test]
    fn decodes_minimal_document() {
        let beatmap = Beatmap::decode(MINIMAL).unwrap();
        assert_eq!(beatmap.version, 14);
        assert_eq!(beatmap.hit_objects.len(), 1);
        assert_eq!(beatmap.timing_points().len(), 2);
        assert_eq!(beatmap.editor, None);
        assert_eq!(beatmap.colours, None);
    }

    #[test]
    fn missing_required_section_fails() {
        let source = "osu file format v14\r\n[General]\r\nMode: 0\r\n";
        assert!(matches!(
            Beatmap::decode(source),
            Err(DecodeError::MissingRequiredSection {
                section: SectionName::Metadata,
            })
        ));
    }

    #[test]
    fn section_errors_carry_section_context() {
        let source = MINIMAL.replace("0,500,4,1,0,100,1,0", "garbage");
        let Err(DecodeError::Section { section, .. }) = Beatmap::decode(&source) else {
            panic!("expected section error");
        };
        assert_eq!(section, SectionName::TimingPoints);
    }

    #[test]
    fn missing_preamble_defaults_to_latest_version() {
        let source = MINIMAL.replace("osu file format v14\r\n", "");
        assert_eq!(Beatmap::decode(&source).unwrap().version, 14);
    }

    #[test]
    fn slider_end_time_uses_tempo_and_velocity() {
        let source = MINIMAL.replace(
            "256,192,1000,1,0",
            "100,100,2000,2,0,L|200:100,2,100",
        );
        let beatmap = Beatmap::decode(&source).unwrap();
        let HitObject::Slider(slider) = &beatmap.hit_objects[0] else {
            panic!("expected slider");
        };
        // sv 2.0 from the inherited point: 100 / (1 * 100 * 2) * 500 = 250ms per slide
        assert_eq!(beatmap.slider_span_duration(slider), Some(250.0));
        assert_eq!(beatmap.slider_end_time(slider), Some(2500.0));
    }

    #[test]
    fn bpm_range_over_uninherited_points() {
        let beatmap = Beatmap::decode(MINIMAL).unwrap();
        assert_eq!(beatmap.bpm_range(), Some((120.0, 120.0)));
    }
}
