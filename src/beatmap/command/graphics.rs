//! Defines for colours and playfield coordinates.

use crate::util::format_number;

/// An 8-bit RGB triple, stored on the wire as `R,G,B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colour {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Colour {
    /// Creates a new colour.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses the `R,G,B` wire form.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        let mut channels = value.split(',').map(|c| c.trim().parse::<u8>().ok());
        let red = channels.next()??;
        let green = channels.next()??;
        let blue = channels.next()??;
        if channels.next().is_some() {
            return None;
        }
        Some(Self::new(red, green, blue))
    }

    /// Renders the `R,G,B` wire form with no extraneous whitespace.
    #[must_use]
    pub fn to_wire(self) -> String {
        format!("{},{},{}", self.red, self.green, self.blue)
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self { red, green, blue }
    }
}

/// A 2D point in playfield coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Renders as `x:y`, the separator slider curve points use.
    #[must_use]
    pub fn to_curve_wire(self) -> String {
        format!("{}:{}", format_number(self.x), format_number(self.y))
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_wire_round_trip() {
        let colour = Colour::from_wire("255,128,0").unwrap();
        assert_eq!(colour, Colour::new(255, 128, 0));
        assert_eq!(colour.to_wire(), "255,128,0");
    }

    #[test]
    fn colour_rejects_garbage() {
        assert_eq!(Colour::from_wire("255,128"), None);
        assert_eq!(Colour::from_wire("255,128,0,1"), None);
        assert_eq!(Colour::from_wire("red,0,0"), None);
    }
}
