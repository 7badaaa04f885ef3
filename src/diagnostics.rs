//! Fancy diagnostics support using `ariadne`.
//!
//! Decode errors carry the byte range of the offending line, so `ariadne`
//! can compute rows and columns for display without any extra bookkeeping.
//!
//! # Usage Example
//!
//! ```rust
//! # #[cfg(feature = "diagnostics")]
//! # {
//! use osumap_rs::{beatmap::decode, diagnostics::emit_decode_error};
//!
//! let source = "osu file format v14\n[General]\nMode: 0\n";
//! if let Err(error) = decode(source) {
//!     emit_decode_error("map.osu", source, &error);
//! }
//! # }
//! ```

#[cfg(feature = "diagnostics")]
use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::beatmap::DecodeError;

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// The complete text content of the source file.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// The name of the source file.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
#[cfg(feature = "diagnostics")]
pub trait ToAriadne {
    /// Converts the error to an ariadne Report against `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[cfg(feature = "diagnostics")]
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

#[cfg(feature = "diagnostics")]
impl ToAriadne for DecodeError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let range = self
            .span()
            .map_or(0..src.text().len().min(1), |span| span.start..span.end);
        build_report(
            src,
            ReportKind::Error,
            range,
            "beatmap decode failed",
            self,
            Color::Red,
        )
    }
}

/// Convenience method: render a [`DecodeError`] against its source text.
#[cfg(feature = "diagnostics")]
pub fn emit_decode_error(name: &str, source: &str, error: &DecodeError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}
