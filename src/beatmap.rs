//! The codec module for the osu! beatmap (.osu) file format.
//!
//! Raw [String] == [`lex`] ==> section blocks == [`model`] ==> [`Beatmap`] == [`encode`] ==> [String]
//!
//! `lex` splits the raw text into named `[Section]` blocks and strips (or
//! keeps, per consumer policy) blank and `//` comment lines. `model` holds the
//! typed document tree and the per-section line codecs. `encode` renders a
//! [`Beatmap`] back into the canonical section order with `\r\n` terminators.
//!
//! In detail, our policies are:
//!
//! - Accept `\r\n` or `\n` on decode, always emit `\r\n` on encode.
//! - Decode fails fast: the first malformed line aborts with the section name
//!   attached. Absent optional data is not an error.
//! - Encode is total for any [`Beatmap`] produced by [`decode`]: wire-optional
//!   fields carry their own presence and are re-emitted only if present.

pub mod command;
pub mod encode;
pub mod lex;
pub mod model;
pub mod prelude;

use thiserror::Error;

pub use self::model::Beatmap;

/// The newest `osu file format` revision this crate understands.
pub const LATEST_FORMAT_VERSION: i32 = 14;

/// A well-known `[Section]` of a beatmap document.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionName {
    /// `[General]`, global settings of the map.
    General,
    /// `[Editor]`, editor-only state.
    Editor,
    /// `[Metadata]`, titles and identifiers.
    Metadata,
    /// `[Difficulty]`, gameplay scalar settings.
    Difficulty,
    /// `[Colours]`, combo colour palette and slider overrides.
    Colours,
    /// `[Events]`, storyboard events.
    Events,
    /// `[TimingPoints]`, timing control points.
    TimingPoints,
    /// `[HitObjects]`, gameplay objects.
    HitObjects,
}

impl SectionName {
    /// Resolves a bracketed header name. Unknown section names yield `None`
    /// and their blocks are skipped by the decoder.
    #[must_use]
    pub fn from_header(name: &str) -> Option<Self> {
        Some(match name {
            "General" => Self::General,
            "Editor" => Self::Editor,
            "Metadata" => Self::Metadata,
            "Difficulty" => Self::Difficulty,
            "Colours" => Self::Colours,
            "Events" => Self::Events,
            "TimingPoints" => Self::TimingPoints,
            "HitObjects" => Self::HitObjects,
            _ => return None,
        })
    }

    /// The name as it appears between brackets on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Editor => "Editor",
            Self::Metadata => "Metadata",
            Self::Difficulty => "Difficulty",
            Self::Colours => "Colours",
            Self::Events => "Events",
            Self::TimingPoints => "TimingPoints",
            Self::HitObjects => "HitObjects",
        }
    }
}

impl std::fmt::Display for SectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A byte range into the decoded source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// An error from a single section's line codec.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SectionError {
    /// A known `Key: Value` field failed type conversion.
    #[error("invalid value `{raw}` for field `{key}`")]
    InvalidFieldValue {
        /// The field key as written.
        key: String,
        /// The raw value text that failed to convert.
        raw: String,
    },
    /// A timing point line had wrong arity or a non-numeric field.
    #[error("invalid timing point line `{raw}`")]
    InvalidTimingPoint {
        /// The raw line.
        raw: String,
    },
    /// A hit object line had wrong arity or a non-numeric field.
    #[error("invalid hit object line `{raw}`")]
    InvalidHitObject {
        /// The raw line.
        raw: String,
    },
    /// The hit object type bitmask selected no known variant.
    #[error("hit object type bits `{bits}` select no known variant")]
    UnsupportedHitObjectType {
        /// The offending type bitmask.
        bits: u32,
    },
    /// The first token of an event line was not a known event type.
    #[error("unknown event type `{token}`")]
    UnknownEventType {
        /// The offending token.
        token: String,
    },
    /// A storyboard command line used an unknown type code.
    #[error("unknown storyboard command code `{code}`")]
    UnknownCommandCode {
        /// The offending code.
        code: String,
    },
    /// An event or command payload had wrong arity or a non-numeric field.
    #[error("invalid event line `{raw}`")]
    InvalidEvent {
        /// The raw line.
        raw: String,
    },
}

/// An error occurred when decoding a beatmap document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// The text contains no recognizable `[Section]` structure.
    #[error("no recognizable section headers in document")]
    MalformedDocument,
    /// A section every document must carry is absent.
    #[error("missing required section [{section}]")]
    MissingRequiredSection {
        /// The absent section.
        section: SectionName,
    },
    /// A section's codec rejected a line. Decoding stops at the first
    /// failure; no partial recovery is attempted.
    #[error("in section [{section}]: {source}")]
    Section {
        /// The section whose codec failed.
        section: SectionName,
        /// Byte range of the offending line in the source.
        span: Span,
        /// The underlying line-level error.
        source: SectionError,
    },
}

impl DecodeError {
    /// Byte range of the offending line, when the error is tied to one.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        match self {
            Self::Section { span, .. } => Some(*span),
            _ => None,
        }
    }
}

/// A [`SectionError`] paired with the byte range of the offending line,
/// before the document decoder attaches the section name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SectionErrorAt {
    pub(crate) error: SectionError,
    pub(crate) span: Span,
}

impl SectionErrorAt {
    pub(crate) const fn new(error: SectionError, span: Span) -> Self {
        Self { error, span }
    }

    pub(crate) fn invalid_field(key: &str, raw: &str, line: &lex::Line<'_>) -> Self {
        Self::new(
            SectionError::InvalidFieldValue {
                key: key.to_owned(),
                raw: raw.to_owned(),
            },
            line.span,
        )
    }

    pub(crate) fn into_decode_error(self, section: SectionName) -> DecodeError {
        DecodeError::Section {
            section,
            span: self.span,
            source: self.error,
        }
    }
}

/// Type alias of `core::result::Result<T, DecodeError>`.
pub type Result<T> = core::result::Result<T, DecodeError>;

/// Decodes beatmap document text into a [`Beatmap`].
///
/// # Errors
///
/// Returns the first [`DecodeError`] encountered; see the error type for the
/// taxonomy. Decoding never recovers partially.
pub fn decode(source: &str) -> Result<Beatmap> {
    Beatmap::decode(source)
}

/// Encodes a [`Beatmap`] into document text with `\r\n` terminators, sections
/// in canonical order.
#[must_use]
pub fn encode(beatmap: &Beatmap) -> String {
    encode::encode(beatmap)
}
