//! Defines for hit sound banks and sample selection.

/// A sample bank selector. `Default` defers to the governing timing point
/// (or, for additions, to the normal set of the same sample).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleSet {
    /// No override, inherit from context.
    #[default]
    Default,
    /// The normal bank.
    Normal,
    /// The soft bank.
    Soft,
    /// The drum bank.
    Drum,
}

impl SampleSet {
    /// Resolves the wire integer used by timing points and hit samples.
    #[must_use]
    pub const fn from_wire(value: u32) -> Option<Self> {
        Some(match value {
            0 => Self::Default,
            1 => Self::Normal,
            2 => Self::Soft,
            3 => Self::Drum,
            _ => return None,
        })
    }

    /// The wire integer.
    #[must_use]
    pub const fn to_wire(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::Normal => 1,
            Self::Soft => 2,
            Self::Drum => 3,
        }
    }

    /// Resolves the word form used by the `[General]` `SampleSet` field.
    #[must_use]
    pub fn from_name(value: &str) -> Option<Self> {
        Some(match value {
            "None" => Self::Default,
            "Normal" => Self::Normal,
            "Soft" => Self::Soft,
            "Drum" => Self::Drum,
            _ => return None,
        })
    }

    /// The word form used by the `[General]` `SampleSet` field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "None",
            Self::Normal => "Normal",
            Self::Soft => "Soft",
            Self::Drum => "Drum",
        }
    }
}

/// Hit sound bit-flags of a hit object or slider edge. Bit 0 (`Normal`) is
/// implicit when no other flag is set; raw bits are preserved for encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sounds(pub u32);

impl Sounds {
    /// The normal hit sound.
    pub const NORMAL: u32 = 1;
    /// The whistle addition.
    pub const WHISTLE: u32 = 2;
    /// The finish (cymbal) addition.
    pub const FINISH: u32 = 4;
    /// The clap addition.
    pub const CLAP: u32 = 8;

    /// Whether the normal flag is set explicitly.
    #[must_use]
    pub const fn normal(self) -> bool {
        self.0 & Self::NORMAL != 0
    }

    /// Whether the whistle flag is set.
    #[must_use]
    pub const fn whistle(self) -> bool {
        self.0 & Self::WHISTLE != 0
    }

    /// Whether the finish flag is set.
    #[must_use]
    pub const fn finish(self) -> bool {
        self.0 & Self::FINISH != 0
    }

    /// Whether the clap flag is set.
    #[must_use]
    pub const fn clap(self) -> bool {
        self.0 & Self::CLAP != 0
    }
}

/// A `normalSet:additionSet` pair, used by slider per-edge sample overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePair {
    /// Bank for the normal sound.
    pub normal_set: SampleSet,
    /// Bank for the addition sounds.
    pub addition_set: SampleSet,
}

impl SamplePair {
    /// Parses the `n:a` wire form.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        let (normal, addition) = value.split_once(':')?;
        Some(Self {
            normal_set: SampleSet::from_wire(normal.parse().ok()?)?,
            addition_set: SampleSet::from_wire(addition.parse().ok()?)?,
        })
    }

    /// Renders the `n:a` wire form.
    #[must_use]
    pub fn to_wire(self) -> String {
        format!(
            "{}:{}",
            self.normal_set.to_wire(),
            self.addition_set.to_wire()
        )
    }
}

/// The colon-separated hit sample tail of a hit object:
/// `normalSet:additionSet[:index[:volume[:filename]]]`.
///
/// Everything past the two sets is wire-optional and independently omittable;
/// encoding always re-emits index and volume (defaulting to 0) and appends
/// the filename field only when one exists.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitSample {
    /// Bank for the normal sound.
    pub normal_set: SampleSet,
    /// Bank for the addition sounds.
    pub addition_set: SampleSet,
    /// Custom sample index; 0 selects the skin default.
    pub index: Option<u32>,
    /// Volume percentage; 0 inherits the timing point volume.
    pub volume: Option<u32>,
    /// Custom sample file overriding bank lookup entirely.
    pub filename: Option<String>,
}

impl HitSample {
    /// Parses the colon-separated wire form.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        let mut fields = value.splitn(5, ':');
        let normal_set = SampleSet::from_wire(fields.next()?.parse().ok()?)?;
        let addition_set = SampleSet::from_wire(fields.next()?.parse().ok()?)?;
        let index = match fields.next() {
            Some(raw) => Some(raw.parse().ok()?),
            None => None,
        };
        let volume = match fields.next() {
            Some(raw) => Some(raw.parse().ok()?),
            None => None,
        };
        let filename = fields
            .next()
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        Some(Self {
            normal_set,
            addition_set,
            index,
            volume,
            filename,
        })
    }

    /// Renders the colon-separated wire form.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut out = format!(
            "{}:{}:{}:{}",
            self.normal_set.to_wire(),
            self.addition_set.to_wire(),
            self.index.unwrap_or(0),
            self.volume.unwrap_or(0),
        );
        if let Some(filename) = self.filename.as_deref() {
            out.push(':');
            out.push_str(filename);
        }
        out
    }
}
