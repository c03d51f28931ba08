//! # Layer 2 Access Port (`$123B`)
//!
//! Layer 2 visibility and CPU paging are not a Next register but an I/O port
//! of their own. The byte written there:
//!
//! ```text
//!   7 6        5    4       3        2      1      0
//!  [section]  [0]  [FULL]  [SHADOW] [READ] [SHOW] [WRITE]
//! ```
//!
//! `section` chooses which third of the 48K bitmap is paged in at `$0000`
//! when `FULL` is clear.

use bit_field::BitField;

use crate::error::{RegisterError, Result};

pub const LAYER2_ACCESS_PORT: u16 = 0x123B;

pub const LAYER2_SCREEN_TOP: u8 = 0;
pub const LAYER2_SCREEN_MIDDLE: u8 = 1;
pub const LAYER2_SCREEN_BOTTOM: u8 = 2;

pub const LAYER2_FULLSCREEN_MASK: u8 = 0x10;
pub const LAYER2_SHADOW_SCREEN_MASK: u8 = 0x08;
pub const LAYER2_READ_ENABLE_MASK: u8 = 0x04;
pub const LAYER2_VISIBLE_MASK: u8 = 0x02;
pub const LAYER2_WRITE_ENABLE_MASK: u8 = 0x01;

pub const LAYER2_SCREEN_SECTION_MASK: u8 = 0x03;
pub const LAYER2_SCREEN_SECTION_SHIFT: u8 = 6;

bitflags::bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct Layer2Flags: u8 {
        const WRITE_ENABLE  = LAYER2_WRITE_ENABLE_MASK;
        const VISIBLE       = LAYER2_VISIBLE_MASK;
        const READ_ENABLE   = LAYER2_READ_ENABLE_MASK;
        /// Page the shadow Layer 2 bank instead of the displayed one.
        const SHADOW_SCREEN = LAYER2_SHADOW_SCREEN_MASK;
        /// Page all 48K at once instead of one third.
        const FULLSCREEN    = LAYER2_FULLSCREEN_MASK;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Layer2Section {
    #[default]
    Top,
    Middle,
    Bottom,
    /// Code 3. Kept so every byte decodes; no bitmap third is paged by it.
    Reserved,
}

impl Layer2Section {
    pub const fn code(self) -> u8 {
        match self {
            Layer2Section::Top => LAYER2_SCREEN_TOP,
            Layer2Section::Middle => LAYER2_SCREEN_MIDDLE,
            Layer2Section::Bottom => LAYER2_SCREEN_BOTTOM,
            Layer2Section::Reserved => 3,
        }
    }

    /// Section for a third of the screen, 0-2.
    pub fn from_third(third: u8) -> Result<Self> {
        match third {
            LAYER2_SCREEN_TOP => Ok(Layer2Section::Top),
            LAYER2_SCREEN_MIDDLE => Ok(Layer2Section::Middle),
            LAYER2_SCREEN_BOTTOM => Ok(Layer2Section::Bottom),
            _ => Err(RegisterError::out_of_range("layer 2 section", third.into(), 2)),
        }
    }

    const fn from_code(code: u8) -> Self {
        match code & LAYER2_SCREEN_SECTION_MASK {
            LAYER2_SCREEN_TOP => Layer2Section::Top,
            LAYER2_SCREEN_MIDDLE => Layer2Section::Middle,
            LAYER2_SCREEN_BOTTOM => Layer2Section::Bottom,
            _ => Layer2Section::Reserved,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Layer2Access {
    pub flags: Layer2Flags,
    pub section: Layer2Section,
}

impl Layer2Access {
    pub fn encode(&self) -> u8 {
        let mut raw = self.flags.bits();
        raw.set_bits(6..8, self.section.code());
        raw
    }

    /// Bit 5 is reserved and dropped.
    pub fn decode(raw: u8) -> Self {
        Self {
            flags: Layer2Flags::from_bits_truncate(raw),
            section: Layer2Section::from_code(raw.get_bits(6..8)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_middle_third() {
        let access = Layer2Access {
            flags: Layer2Flags::VISIBLE | Layer2Flags::WRITE_ENABLE,
            section: Layer2Section::Middle,
        };
        assert_eq!(access.encode(), 0b0100_0011);
        assert_eq!(Layer2Access::decode(0b0100_0011), access);
    }

    #[test]
    fn decode_is_total() {
        for raw in 0..=u8::MAX {
            assert_eq!(Layer2Access::decode(raw).encode(), raw & !0b0010_0000);
        }
        assert_eq!(Layer2Access::decode(0b1001_0010).section, Layer2Section::Bottom);
        assert_eq!(Layer2Access::decode(0b1100_0000).section, Layer2Section::Reserved);
    }

    #[test]
    fn thirds_are_range_checked() {
        assert_eq!(Layer2Section::from_third(1), Ok(Layer2Section::Middle));
        assert!(Layer2Section::from_third(3).is_err());
    }
}
