//! The parser and encoder of the osu! beatmap (.osu) file format.
//!
//! This crate decodes the human-editable, sectioned text format into a typed
//! document tree and re-serializes it byte-faithfully, across the historical
//! format revisions that occur in the wild.
//!
//! - [`beatmap`] holds the codec: section splitting, the typed model and the
//!   per-section line codecs, and the document encoder.
//! - [`studio`] holds derived algorithms over the parsed model: redundant
//!   timing point pruning, combo colour index derivation, a repeating-pattern
//!   matcher, and hitsound event timelines.
//! - [`diagnostics`] (feature `diagnostics`) renders decode errors with
//!   source spans via `ariadne`.
//!
//! ```rust
//! use osumap_rs::{decode, encode};
//!
//! let source = "osu file format v14\r\n\r\n[General]\r\nMode: 0\r\n\r\n[Metadata]\r\nTitle:song\r\n\r\n[Difficulty]\r\nCircleSize:4\r\n\r\n[Events]\r\n\r\n[HitObjects]\r\n256,192,1000,1,0\r\n";
//! let beatmap = decode(source).expect("must decode");
//! assert_eq!(encode(&beatmap), source);
//! ```
//!
//! File reading, directory traversal and batch orchestration are left to the
//! surrounding tooling: the codec takes already-read text in and hands
//! produced text out, and every operation is a synchronous pure
//! transformation over a caller-owned document.

pub mod beatmap;
pub mod diagnostics;
pub mod studio;
pub mod util;

pub use beatmap::{Beatmap, DecodeError, decode, encode};
