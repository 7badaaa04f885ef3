//! The `[Colours]` section: combo colour palette and slider overrides.

use crate::beatmap::SectionErrorAt;
use crate::beatmap::command::graphics::Colour;
use crate::beatmap::lex::Line;

use super::fields::split_key_value;

/// One numbered palette entry. Numbers need not be contiguous or start at 1;
/// the order of appearance in the section is the palette order combo colour
/// derivation cycles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboColour {
    /// The `N` of the `ComboN` key.
    pub number: u32,
    /// The palette colour.
    pub colour: Colour,
}

/// Typed view of the `[Colours]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colours {
    /// Palette entries in order of appearance.
    pub combo_colours: Vec<ComboColour>,
    /// Override for the slider track body.
    pub slider_track_override: Option<Colour>,
    /// Override for the slider border.
    pub slider_border: Option<Colour>,
}

impl Colours {
    pub(crate) fn decode(lines: &[Line<'_>]) -> Result<Self, SectionErrorAt> {
        let mut colours = Self::default();
        for line in lines {
            let Some((key, value)) = split_key_value(line.text) else {
                continue;
            };
            let triple = || {
                Colour::from_wire(value)
                    .ok_or_else(|| SectionErrorAt::invalid_field(key, value, line))
            };
            if let Some(number) = key.strip_prefix("Combo") {
                let number: u32 = number
                    .parse()
                    .map_err(|_| SectionErrorAt::invalid_field(key, value, line))?;
                colours.combo_colours.push(ComboColour {
                    number,
                    colour: triple()?,
                });
            } else if key == "SliderTrackOverride" {
                colours.slider_track_override = Some(triple()?);
            } else if key == "SliderBorder" {
                colours.slider_border = Some(triple()?);
            }
        }
        Ok(colours)
    }

    pub(crate) fn encode_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for combo in &self.combo_colours {
            out.push(format!("Combo{} : {}", combo.number, combo.colour.to_wire()));
        }
        if let Some(track) = self.slider_track_override {
            out.push(format!("SliderTrackOverride : {}", track.to_wire()));
        }
        if let Some(border) = self.slider_border {
            out.push(format!("SliderBorder : {}", border.to_wire()));
        }
        out
    }
}
