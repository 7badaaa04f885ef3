//! Renders a [`Beatmap`] back into document text.
//!
//! Sections are emitted in the fixed canonical order with `\r\n` terminators,
//! one blank line between sections, and absent optional sections omitted.

use super::model::{Beatmap, timing};
use super::model::events::encode_events;

/// Renders the full document text.
#[must_use]
pub fn encode(beatmap: &Beatmap) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("osu file format v{}", beatmap.version));

    let mut section = |name: &str, body: Vec<String>| {
        lines.push(String::new());
        lines.push(format!("[{name}]"));
        lines.extend(body);
    };

    section("General", beatmap.general.encode_lines());
    if let Some(editor) = &beatmap.editor {
        section("Editor", editor.encode_lines());
    }
    section("Metadata", beatmap.metadata.encode_lines());
    section("Difficulty", beatmap.difficulty.encode_lines());
    if let Some(colours) = &beatmap.colours {
        section("Colours", colours.encode_lines());
    }
    section("Events", encode_events(&beatmap.events));
    if let Some(points) = &beatmap.timing_points {
        let body = points
            .iter()
            .map(|point| point.encode(timing::governing_signature(points, point.time())))
            .collect();
        section("TimingPoints", body);
    }
    section(
        "HitObjects",
        beatmap.hit_objects.iter().map(|object| object.encode()).collect(),
    );

    let mut out = lines.join("\r\n");
    out.push_str("\r\n");
    out
}
