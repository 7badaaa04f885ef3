//! Shared value types used across sections of a beatmap document.

pub mod graphics;
pub mod sample;

/// The ruleset a map is authored for, stored as `Mode` in `[General]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    /// The circle-clicking default ruleset.
    #[default]
    Osu,
    /// Drum ruleset.
    Taiko,
    /// Fruit-catching ruleset.
    Catch,
    /// Vertical-scrolling key ruleset.
    Mania,
}

impl GameMode {
    /// Resolves the wire integer.
    #[must_use]
    pub const fn from_wire(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Osu,
            1 => Self::Taiko,
            2 => Self::Catch,
            3 => Self::Mania,
            _ => return None,
        })
    }

    /// The wire integer.
    #[must_use]
    pub const fn to_wire(self) -> u32 {
        match self {
            Self::Osu => 0,
            Self::Taiko => 1,
            Self::Catch => 2,
            Self::Mania => 3,
        }
    }
}

/// Where the storyboard overlay layer sits relative to hit objects, stored as
/// `OverlayPosition` in `[General]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayPosition {
    /// Use the skin's setting.
    #[default]
    NoChange,
    /// Draw overlays under hit objects.
    Below,
    /// Draw overlays over hit objects.
    Above,
}

impl OverlayPosition {
    /// Resolves the wire word.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        Some(match value {
            "NoChange" => Self::NoChange,
            "Below" => Self::Below,
            "Above" => Self::Above,
            _ => return None,
        })
    }

    /// The wire word.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoChange => "NoChange",
            Self::Below => "Below",
            Self::Above => "Above",
        }
    }
}

/// Effect bit-flags of a timing point. Unknown bits are preserved so that
/// re-encoding reproduces the original value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effects(pub u32);

impl Effects {
    /// Kiai time is active in this timing section.
    pub const KIAI: u32 = 1;
    /// The first bar line of this section is not drawn (taiko/mania).
    pub const OMIT_FIRST_BAR_LINE: u32 = 8;

    /// Whether the kiai flag is set.
    #[must_use]
    pub const fn kiai(self) -> bool {
        self.0 & Self::KIAI != 0
    }

    /// Whether the omit-first-bar-line flag is set.
    #[must_use]
    pub const fn omit_first_bar_line(self) -> bool {
        self.0 & Self::OMIT_FIRST_BAR_LINE != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_mode_wire() {
        assert_eq!(GameMode::from_wire(3), Some(GameMode::Mania));
        assert_eq!(GameMode::from_wire(4), None);
        assert_eq!(GameMode::Catch.to_wire(), 2);
    }

    #[test]
    fn effects_flags() {
        let effects = Effects(Effects::KIAI | Effects::OMIT_FIRST_BAR_LINE);
        assert!(effects.kiai());
        assert!(effects.omit_first_bar_line());
        assert!(!Effects::default().kiai());
    }
}
