//! Derived, read-only passes over a parsed [`Beatmap`](crate::beatmap::Beatmap).
//!
//! Nothing here touches text: these algorithms only make sense once the
//! document model exists. They power mapping tools layered on the codec:
//! timing cleanup, combo colour analysis and hitsound transplanting.

pub mod combo;
pub mod hitsound;
pub mod pattern;
pub mod timing;

pub use self::combo::{ComboIndex, derive_combo_indices};
pub use self::hitsound::{
    LookupMode, SampleSetEvent, SoundEvent, SoundEventKind, Timeline, build_hitsound_timeline,
};
pub use self::pattern::{Pattern, find_patterns};
pub use self::timing::prune_redundant_timing_points;
