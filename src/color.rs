use log::debug;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color '{0}', must be 6 hex digits -- FFFFFF")]
    InvalidFormat(String),

    #[error("unknown color name '{0}'")]
    UnknownColorName(String),
}

/// Fixed table of symbolic color names, printed in order by `--colors`.
pub const PALETTE: &[(&str, [u8; 3])] = &[
    ("black", [0x00, 0x00, 0x00]),
    ("white", [0xFF, 0xFF, 0xFF]),
    ("red", [0xE7, 0x4C, 0x3C]),
    ("green", [0x2E, 0xCC, 0x71]),
    ("blue", [0x34, 0x98, 0xDB]),
    ("yellow", [0xF1, 0xC4, 0x0F]),
    ("orange", [0xF5, 0xB0, 0x65]),
    ("cyan", [0x1A, 0xBC, 0x9C]),
    ("magenta", [0x9B, 0x59, 0xB6]),
    ("gray", [0x95, 0xA5, 0xA6]),
    ("sky", [0xAE, 0xD6, 0xF1]),
];

/// A color in the X colormap's 16-bit-per-channel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb {
    /// Scales 8-bit channels into the 16-bit colormap range by keeping the
    /// high byte and zeroing the low one, so `FF` becomes `FF00` rather than
    /// `FFFF`. The quantization is deliberate and matches what users passing
    /// hex triplets on the command line expect.
    pub const fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self {
            red: (r as u16) << 8,
            green: (g as u16) << 8,
            blue: (b as u16) << 8,
        }
    }

    /// Parses a 6-hex-digit triplet like `AED6F1`.
    pub fn from_hex(spec: &str) -> Result<Self, ColorError> {
        if spec.len() != 6 || !spec.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidFormat(spec.to_owned()));
        }

        let channel = |range| {
            u8::from_str_radix(&spec[range], 16)
                .map_err(|_| ColorError::InvalidFormat(spec.to_owned()))
        };

        let rgb = Self::from_bytes(channel(0..2)?, channel(2..4)?, channel(4..6)?);
        debug!(
            "decoded '{spec}' -> r: {} g: {} b: {}",
            rgb.red, rgb.green, rgb.blue
        );

        Ok(rgb)
    }

    /// Looks up a symbolic name in [`PALETTE`]. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Result<Self, ColorError> {
        PALETTE
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|&(_, [r, g, b])| Self::from_bytes(r, g, b))
            .ok_or_else(|| ColorError::UnknownColorName(name.to_owned()))
    }

    /// Resolves a command-line color spec: symbolic names win, anything
    /// 6 characters long is then treated as a hex triplet.
    pub fn resolve(spec: &str) -> Result<Self, ColorError> {
        match Self::from_name(spec) {
            Ok(rgb) => Ok(rgb),
            Err(_) if spec.len() == 6 => Self::from_hex(spec),
            Err(err) => Err(err),
        }
    }
}

/// The four semantic color roles of the icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSlot {
    BgCharge,
    BgDischarge,
    FgCharge,
    FgDischarge,
}

/// One resolved color per slot. Written at most once during argument
/// parsing, read once when the pixels are allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorConfig {
    pub bg_charge: Rgb,
    pub bg_discharge: Rgb,
    pub fg_charge: Rgb,
    pub fg_discharge: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            // orange while charging, pale blue while discharging
            bg_charge: Rgb::from_bytes(0xF5, 0xB0, 0x65),
            bg_discharge: Rgb::from_bytes(0xAE, 0xD6, 0xF1),
            fg_charge: Rgb::from_bytes(0x00, 0x00, 0x00),
            fg_discharge: Rgb::from_bytes(0x00, 0x00, 0x00),
        }
    }
}

impl ColorConfig {
    pub fn set(&mut self, slot: ColorSlot, rgb: Rgb) {
        match slot {
            ColorSlot::BgCharge => self.bg_charge = rgb,
            ColorSlot::BgDischarge => self.bg_discharge = rgb,
            ColorSlot::FgCharge => self.fg_charge = rgb,
            ColorSlot::FgDischarge => self.fg_discharge = rgb,
        }
    }

    pub fn get(&self, slot: ColorSlot) -> Rgb {
        match slot {
            ColorSlot::BgCharge => self.bg_charge,
            ColorSlot::BgDischarge => self.bg_discharge,
            ColorSlot::FgCharge => self.fg_charge,
            ColorSlot::FgDischarge => self.fg_discharge,
        }
    }
}
