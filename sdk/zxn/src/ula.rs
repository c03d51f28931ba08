//! # ULA Control (`$68`)
//!
//! ```text
//!   7      6 5     4       3      2       1    0
//!  [OFF]  [blend] [KEYS]  [ULA+] [HALF]  [0]  [STENCIL]
//! ```
//!
//! The blend field only matters in layer priority modes 6 and 7.

use bit_field::BitField;

pub const REG_ULA_PLUS_ENABLE: u8 = 0x08;

bitflags::bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct UlaFlags: u8 {
        /// Logical AND of ULA and tilemap where both are opaque.
        const STENCIL              = 0b0000_0001;
        const HALF_PIXEL_SCROLL    = 0b0000_0100;
        const ULA_PLUS             = REG_ULA_PLUS_ENABLE;
        /// Drop extended keys from the 8x5 keyboard matrix.
        const CANCEL_EXTENDED_KEYS = 0b0001_0000;
        const DISABLE_OUTPUT       = 0b1000_0000;
    }
}

/// Colour used as "B" by the blended layer priorities.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum UlaBlend {
    #[default]
    Ula,
    None,
    UlaTilemapMix,
    Tilemap,
}

impl UlaBlend {
    pub const fn code(self) -> u8 {
        match self {
            UlaBlend::Ula => 0b00,
            UlaBlend::None => 0b01,
            UlaBlend::UlaTilemapMix => 0b10,
            UlaBlend::Tilemap => 0b11,
        }
    }

    pub const fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b00 => UlaBlend::Ula,
            0b01 => UlaBlend::None,
            0b10 => UlaBlend::UlaTilemapMix,
            _ => UlaBlend::Tilemap,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct UlaControl {
    pub flags: UlaFlags,
    pub blend: UlaBlend,
}

impl UlaControl {
    pub fn encode(&self) -> u8 {
        let mut raw = self.flags.bits();
        raw.set_bits(5..7, self.blend.code());
        raw
    }

    /// Reserved bit 1 is dropped.
    pub fn decode(raw: u8) -> Self {
        Self {
            flags: UlaFlags::from_bits_truncate(raw),
            blend: UlaBlend::from_code(raw.get_bits(5..7)),
        }
    }
}
