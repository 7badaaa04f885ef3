//! Splits raw beatmap text into named section blocks.
//!
//! The splitter recognizes the `osu file format vN` preamble, then groups
//! every following line under the most recent `[Section]` header. Blank and
//! `//` comment lines are dropped or kept per [`CommentPolicy`]; the
//! difference-checking consumer needs them kept, the decoder wants them gone.

use super::{DecodeError, SectionName, Span};

/// What to do with blank and comment-only lines inside a section payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentPolicy {
    /// Exclude blank lines and lines starting with `//`. Decoding uses this.
    #[default]
    Strip,
    /// Keep every payload line verbatim, for original-vs-original comparison.
    Keep,
}

/// One payload line of a section, with its byte range in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line content without its terminator.
    pub text: &'a str,
    /// Byte range of the line in the source text.
    pub span: Span,
}

/// A named section block: the header plus every payload line up to the next
/// header or end of input.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBlock<'a> {
    /// The section, when the header names a known one.
    pub section: Option<SectionName>,
    /// The raw name between the brackets.
    pub name: &'a str,
    /// Payload lines, filtered per the splitter's [`CommentPolicy`].
    pub lines: Vec<Line<'a>>,
}

/// The split document: format version plus section blocks in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBlocks<'a> {
    /// The version parsed from the `osu file format vN` preamble, if present.
    pub version: Option<i32>,
    /// Section blocks in order of first appearance. Duplicate headers for the
    /// same known section are merged into the first block.
    pub blocks: Vec<SectionBlock<'a>>,
}

impl<'a> DocumentBlocks<'a> {
    /// Finds the block of a known section.
    #[must_use]
    pub fn block(&self, section: SectionName) -> Option<&SectionBlock<'a>> {
        self.blocks
            .iter()
            .find(|block| block.section == Some(section))
    }
}

/// Parses the `osu file format vN` preamble line, tolerating a UTF-8 BOM.
#[must_use]
pub fn parse_format_version(line: &str) -> Option<i32> {
    let trimmed = line.trim_start_matches('\u{feff}').trim();
    trimmed
        .strip_prefix("osu file format v")
        .and_then(|rest| rest.trim().parse().ok())
}

/// Splits beatmap text into section blocks.
///
/// Accepts `\r\n` and `\n` terminators. Content before the first header is
/// scanned only for the format preamble. Unknown section names are kept as
/// blocks with `section == None` so callers can choose to skip them.
///
/// # Errors
///
/// [`DecodeError::MalformedDocument`] when no known section header occurs in
/// the entire text.
pub fn split_sections(
    source: &str,
    policy: CommentPolicy,
) -> Result<DocumentBlocks<'_>, DecodeError> {
    let mut version = None;
    let mut blocks: Vec<SectionBlock<'_>> = Vec::new();
    let mut current: Option<usize> = None;

    let mut offset = 0;
    for raw in source.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();
        let text = raw
            .strip_suffix('\n')
            .map_or(raw, |rest| rest.strip_suffix('\r').unwrap_or(rest));
        let span = Span::new(start, start + text.len());

        let trimmed = text.trim();
        if let Some(name) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            let section = SectionName::from_header(name);
            // historical files split [Events] across two headers
            let existing = section.and_then(|s| {
                blocks.iter().position(|block| block.section == Some(s))
            });
            current = Some(existing.unwrap_or_else(|| {
                blocks.push(SectionBlock {
                    section,
                    name,
                    lines: Vec::new(),
                });
                blocks.len() - 1
            }));
            continue;
        }

        let Some(block) = current else {
            if version.is_none() {
                version = parse_format_version(text);
            }
            continue;
        };
        if policy == CommentPolicy::Strip && (trimmed.is_empty() || text.starts_with("//")) {
            continue;
        }
        blocks[block].lines.push(Line { text, span });
    }

    if blocks.iter().all(|block| block.section.is_none()) {
        return Err(DecodeError::MalformedDocument);
    }
    Ok(DocumentBlocks { version, blocks })
}
