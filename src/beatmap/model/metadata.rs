//! The `[Metadata]` section: titles, authorship and online identifiers.

use crate::beatmap::SectionErrorAt;
use crate::beatmap::lex::Line;

use super::fields::{parse_field, split_key_value};

/// Typed view of the `[Metadata]` section.
///
/// Values are taken verbatim after the first `:` (trimmed), so titles may
/// themselves contain colons.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    /// Romanised song title.
    pub title: Option<String>,
    /// Native-script song title.
    pub title_unicode: Option<String>,
    /// Romanised artist.
    pub artist: Option<String>,
    /// Native-script artist.
    pub artist_unicode: Option<String>,
    /// Mapper user name.
    pub creator: Option<String>,
    /// Difficulty name of this map within its set.
    pub version: Option<String>,
    /// Media the song was sourced from.
    pub source: Option<String>,
    /// Space-separated search terms, kept verbatim.
    pub tags: Option<String>,
    /// Online id of this difficulty.
    pub beatmap_id: Option<i64>,
    /// Online id of the containing set.
    pub beatmap_set_id: Option<i64>,
}

impl Metadata {
    pub(crate) fn decode(lines: &[Line<'_>]) -> Result<Self, SectionErrorAt> {
        let mut metadata = Self::default();
        for line in lines {
            let Some((key, value)) = split_key_value(line.text) else {
                continue;
            };
            match key {
                "Title" => metadata.title = Some(value.to_owned()),
                "TitleUnicode" => metadata.title_unicode = Some(value.to_owned()),
                "Artist" => metadata.artist = Some(value.to_owned()),
                "ArtistUnicode" => metadata.artist_unicode = Some(value.to_owned()),
                "Creator" => metadata.creator = Some(value.to_owned()),
                "Version" => metadata.version = Some(value.to_owned()),
                "Source" => metadata.source = Some(value.to_owned()),
                "Tags" => metadata.tags = Some(value.to_owned()),
                "BeatmapID" => metadata.beatmap_id = Some(parse_field(key, value, line)?),
                "BeatmapSetID" => metadata.beatmap_set_id = Some(parse_field(key, value, line)?),
                _ => {}
            }
        }
        Ok(metadata)
    }

    pub(crate) fn encode_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut push = |key: &str, value: String| out.push(format!("{key}:{value}"));
        if let Some(title) = self.title.as_deref() {
            push("Title", title.to_owned());
        }
        if let Some(title_unicode) = self.title_unicode.as_deref() {
            push("TitleUnicode", title_unicode.to_owned());
        }
        if let Some(artist) = self.artist.as_deref() {
            push("Artist", artist.to_owned());
        }
        if let Some(artist_unicode) = self.artist_unicode.as_deref() {
            push("ArtistUnicode", artist_unicode.to_owned());
        }
        if let Some(creator) = self.creator.as_deref() {
            push("Creator", creator.to_owned());
        }
        if let Some(version) = self.version.as_deref() {
            push("Version", version.to_owned());
        }
        if let Some(source) = self.source.as_deref() {
            push("Source", source.to_owned());
        }
        if let Some(tags) = self.tags.as_deref() {
            push("Tags", tags.to_owned());
        }
        if let Some(beatmap_id) = self.beatmap_id {
            push("BeatmapID", beatmap_id.to_string());
        }
        if let Some(beatmap_set_id) = self.beatmap_set_id {
            push("BeatmapSetID", beatmap_set_id.to_string());
        }
        out
    }
}
