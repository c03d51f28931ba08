//! # Palettes
//!
//! Four planes (ULA, Layer 2, Sprites, Tilemap) each have two 256-entry
//! palettes. Palette Control (`$43`) picks which one the index (`$40`) and value
//! registers (`$41`, `$44`) talk to:
//!
//! ```text
//!   7      6 5 4     3 2 1   0
//!  [AI]   [select]  [ 0 ]   [EXT]
//! ```
//!
//! | select | palette                 |
//! |--------|-------------------------|
//! | 000    | ULA first               |
//! | 001    | Layer 2 first           |
//! | 010    | Sprites first           |
//! | 011    | Tilemap first           |
//! | 100    | ULA second              |
//! | 101    | Layer 2 second          |
//! | 110    | Sprites second          |
//! | 111    | Tilemap second          |
//!
//! ## Auto-increment
//!
//! While bit 7 (`AI`) is clear, every completed write to a value register moves
//! the palette index to the next entry. That index lives only in the chip: this
//! crate never tracks it, so after a partial upload the only safe move is to
//! write `$40` again.
//!
//! ## Value registers
//!
//! `$41` takes one byte per entry (`RRRGGGBB`; the missing blue LSB is the OR
//! of the other two blue bits). `$44` takes two writes per entry: `RRRGGGBB`
//! first, then the blue LSB in bit 0. The index only moves after the second.

use bit_field::BitField;

use crate::error::{RegisterError, Result};

pub const RPC_SELECT_ULA_PALETTE_0: u8 = 0x00;
pub const RPC_SELECT_LAYER2_PALETTE_0: u8 = 0x10;
pub const RPC_SELECT_SPRITE_PALETTE_0: u8 = 0x20;
pub const RPC_SELECT_TILEMAP_PALETTE_0: u8 = 0x30;
pub const RPC_SELECT_ULA_PALETTE_1: u8 = 0x40;
pub const RPC_SELECT_LAYER2_PALETTE_1: u8 = 0x50;
pub const RPC_SELECT_SPRITE_PALETTE_1: u8 = 0x60;
pub const RPC_SELECT_TILEMAP_PALETTE_1: u8 = 0x70;

pub const RPC_DISABLE_AUTOINC: u8 = 0x80;
pub const RPC_ENABLE_EXTENDED_PALETTE: u8 = 0x01;
pub const RPC_SELECT_MASK: u8 = 0x70;
pub const RPC_SELECT_SHIFT: u8 = 4;

/// Entries in one palette.
pub const PALETTE_SIZE: usize = 256;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PalettePlane {
    Ula,
    Layer2,
    Sprites,
    Tilemap,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PaletteBank {
    First,
    Second,
}

/// Which of the eight palettes is selected, as its 3-bit hardware code.
pub const fn palette_code(plane: PalettePlane, bank: PaletteBank) -> u8 {
    match (plane, bank) {
        (PalettePlane::Ula, PaletteBank::First) => 0b000,
        (PalettePlane::Layer2, PaletteBank::First) => 0b001,
        (PalettePlane::Sprites, PaletteBank::First) => 0b010,
        (PalettePlane::Tilemap, PaletteBank::First) => 0b011,
        (PalettePlane::Ula, PaletteBank::Second) => 0b100,
        (PalettePlane::Layer2, PaletteBank::Second) => 0b101,
        (PalettePlane::Sprites, PaletteBank::Second) => 0b110,
        (PalettePlane::Tilemap, PaletteBank::Second) => 0b111,
    }
}

fn split_code(code: u8) -> (PalettePlane, PaletteBank) {
    let plane = match code & 0b011 {
        0b000 => PalettePlane::Ula,
        0b001 => PalettePlane::Layer2,
        0b010 => PalettePlane::Sprites,
        _ => PalettePlane::Tilemap,
    };
    let bank = if code.get_bit(2) { PaletteBank::Second } else { PaletteBank::First };
    (plane, bank)
}

/// Inverse of [`palette_code`]. Codes above 7 are not palettes.
pub fn palette_from_code(code: u8) -> Result<(PalettePlane, PaletteBank)> {
    if code > 7 {
        return Err(RegisterError::out_of_range("palette select", code.into(), 7));
    }
    Ok(split_code(code))
}

/// Decoded Palette Control (`$43`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PaletteSelector {
    pub plane: PalettePlane,
    pub bank: PaletteBank,
    /// Stop value writes from moving the palette index.
    pub auto_increment_disabled: bool,
    /// ULANext extended attribute mode.
    pub extended: bool,
}

impl PaletteSelector {
    pub const fn new(plane: PalettePlane, bank: PaletteBank) -> Self {
        Self { plane, bank, auto_increment_disabled: false, extended: false }
    }

    /// Whether each completed value write moves the hardware palette index on.
    pub const fn auto_increments(&self) -> bool {
        !self.auto_increment_disabled
    }

    pub fn encode(&self) -> u8 {
        encode_palette_selector(self.plane, self.bank, self.auto_increment_disabled, self.extended)
    }
}

pub fn encode_palette_selector(
    plane: PalettePlane,
    bank: PaletteBank,
    auto_increment_disabled: bool,
    extended: bool,
) -> u8 {
    let mut raw = 0u8;
    raw.set_bits(4..7, palette_code(plane, bank));
    raw.set_bit(7, auto_increment_disabled);
    raw.set_bit(0, extended);
    raw
}

/// Build a Palette Control byte from a raw select code, checking it names one
/// of the eight palettes.
pub fn encode_palette_selector_code(code: u8, auto_increment_disabled: bool, extended: bool) -> Result<u8> {
    let (plane, bank) = palette_from_code(code)?;
    Ok(encode_palette_selector(plane, bank, auto_increment_disabled, extended))
}

/// Decode Palette Control. Bits 3:1 are ignored.
pub fn decode_palette_selector(raw: u8) -> PaletteSelector {
    let (plane, bank) = split_code(raw.get_bits(4..7));

    PaletteSelector {
        plane,
        bank,
        auto_increment_disabled: raw.get_bit(7),
        extended: raw.get_bit(0),
    }
}

/// A 9-bit palette colour, three bits per channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgb333 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb333 {
    pub fn new(r: u8, g: u8, b: u8) -> Result<Self> {
        for (field, value) in [("red", r), ("green", g), ("blue", b)] {
            if value > 7 {
                return Err(RegisterError::out_of_range(field, value.into(), 7));
            }
        }
        Ok(Self { r, g, b })
    }

    /// `RRRGGGBB` for `$41`. Blue loses its LSB.
    pub fn to_rgb332(self) -> u8 {
        let mut raw = 0u8;
        raw.set_bits(5..8, self.r);
        raw.set_bits(2..5, self.g);
        raw.set_bits(0..2, self.b >> 1);
        raw
    }

    /// How the chip widens an 8-bit value: blue LSB is the OR of the two blue bits.
    pub fn from_rgb332(raw: u8) -> Self {
        let b2 = raw.get_bits(0..2);
        Self {
            r: raw.get_bits(5..8),
            g: raw.get_bits(2..5),
            b: (b2 << 1) | u8::from(b2 != 0),
        }
    }

    /// The two bytes written to `$44`, in order.
    pub fn to_9bit(self) -> [u8; 2] {
        [self.to_rgb332(), self.b & 1]
    }

    pub fn from_9bit(bytes: [u8; 2]) -> Self {
        let mut colour = Self::from_rgb332(bytes[0]);
        colour.b = (bytes[0].get_bits(0..2) << 1) | (bytes[1] & 1);
        colour
    }

    /// Packed `RRRGGGBBB` form used for palette storage.
    pub fn to_bits(self) -> u16 {
        (u16::from(self.r) << 6) | (u16::from(self.g) << 3) | u16::from(self.b)
    }

    pub fn from_bits(bits: u16) -> Self {
        Self {
            r: bits.get_bits(6..9) as u8,
            g: bits.get_bits(3..6) as u8,
            b: bits.get_bits(0..3) as u8,
        }
    }
}
