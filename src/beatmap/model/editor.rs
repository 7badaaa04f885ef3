//! The `[Editor]` section: state the editor saves for its own use.

use itertools::Itertools;

use crate::beatmap::SectionErrorAt;
use crate::beatmap::lex::Line;
use crate::util::format_number;

use super::fields::{parse_field, split_key_value};

/// Typed view of the `[Editor]` section. Old format revisions have no such
/// section at all, so the whole struct is optional on [`super::Beatmap`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Editor {
    /// Bookmarked times in milliseconds.
    pub bookmarks: Option<Vec<i32>>,
    /// Distance snap multiplier.
    pub distance_spacing: Option<f64>,
    /// Beat snap divisor.
    pub beat_divisor: Option<i32>,
    /// Grid size in pixels.
    pub grid_size: Option<i32>,
    /// Timeline zoom factor.
    pub timeline_zoom: Option<f64>,
}

impl Editor {
    pub(crate) fn decode(lines: &[Line<'_>]) -> Result<Self, SectionErrorAt> {
        let mut editor = Self::default();
        for line in lines {
            let Some((key, value)) = split_key_value(line.text) else {
                continue;
            };
            match key {
                "Bookmarks" => {
                    if value.is_empty() {
                        continue;
                    }
                    let bookmarks = value
                        .split(',')
                        .map(|time| time.trim().parse::<i32>())
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|_| SectionErrorAt::invalid_field(key, value, line))?;
                    editor.bookmarks = Some(bookmarks);
                }
                "DistanceSpacing" => editor.distance_spacing = Some(parse_field(key, value, line)?),
                "BeatDivisor" => editor.beat_divisor = Some(parse_field(key, value, line)?),
                "GridSize" => editor.grid_size = Some(parse_field(key, value, line)?),
                "TimelineZoom" => editor.timeline_zoom = Some(parse_field(key, value, line)?),
                _ => {}
            }
        }
        Ok(editor)
    }

    pub(crate) fn encode_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(bookmarks) = self.bookmarks.as_deref() {
            out.push(format!("Bookmarks: {}", bookmarks.iter().join(",")));
        }
        if let Some(distance_spacing) = self.distance_spacing {
            out.push(format!("DistanceSpacing: {}", format_number(distance_spacing)));
        }
        if let Some(beat_divisor) = self.beat_divisor {
            out.push(format!("BeatDivisor: {beat_divisor}"));
        }
        if let Some(grid_size) = self.grid_size {
            out.push(format!("GridSize: {grid_size}"));
        }
        if let Some(timeline_zoom) = self.timeline_zoom {
            out.push(format!("TimelineZoom: {}", format_number(timeline_zoom)));
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
    fn bookmarks_round_trip() {
        let editor = Editor::decode(&[line("Bookmarks: 1500,3000,4500")]).unwrap();
        assert_eq!(editor.bookmarks.as_deref(), Some(&[1500, 3000, 4500][..]));
        assert_eq!(
            editor.encode_lines(),
            vec!["Bookmarks: 1500,3000,4500".to_owned()]
        );
    }

    #[test]
    fn bad_bookmark_fails() {
        assert!(Editor::decode(&[line("Bookmarks: 12,x")]).is_err());
    }
}
