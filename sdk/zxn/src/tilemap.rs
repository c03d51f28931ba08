//! # Tilemap Attributes and Control
//!
//! A tilemap attribute byte (per tile, or the default in `$6C` when tilemap
//! control bit 5 drops per-tile attributes) looks like this:
//!
//! ```text
//!   7 6 5 4   3    2    1    0
//!  [palette] [MX] [MY] [ROT] [U/T8]
//! ```
//!
//! Bit 0 has two meanings. Normally it draws the ULA over this tile; in 512-tile
//! mode (tilemap control bit 1) it is bit 8 of the tile number instead. The
//! byte alone cannot tell which, so both directions of the codec take a
//! [`TilemapAttributeMode`] from the caller.

use bit_field::BitField;

use crate::error::{RegisterError, Result};

pub const RPC_TILEMAP_ATTRIBUTE_ULA_OVER: u8 = 0x01;
pub const RPC_TILEMAP_ATTRIBUTE_ROTATE: u8 = 0x02;
pub const RPC_TILEMAP_ATTRIBUTE_MIRROR_Y: u8 = 0x04;
pub const RPC_TILEMAP_ATTRIBUTE_MIRROR_X: u8 = 0x08;
pub const TILEMAP_PALETTE_OFFSET_SHIFT: u8 = 4;

/// Soft reset value of the tilemap transparency index (`$4C`).
pub const TILEMAP_TRANSPARENCY_DEFAULT: u8 = 0x0F;

bitflags::bitflags! {
    /// Tilemap control register `$6B`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct TilemapControl: u8 {
        /// Tilemap always on top of the ULA.
        const FORCE_OVER_ULA    = 0b0000_0001;
        /// Attribute bit 0 becomes tile number bit 8.
        const TILES_512         = 0b0000_0010;
        const TEXT_MODE         = 0b0000_1000;
        const SECOND_PALETTE    = 0b0001_0000;
        /// Tiles carry no attribute byte; `$6C` applies to all of them.
        const DEFAULT_ATTRIBUTE = 0b0010_0000;
        const MODE_80X32        = 0b0100_0000;
        const ENABLE            = 0b1000_0000;
    }
}

/// How bit 0 of a tilemap attribute is read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TilemapAttributeMode {
    /// Bit 0 set draws the ULA over the tile.
    UlaOver,
    /// Bit 0 is bit 8 of the tile number (512-tile mode).
    TileIndexBit8,
}

impl TilemapAttributeMode {
    /// The mode selected by a tilemap control value.
    pub fn from_control(control: TilemapControl) -> Self {
        if control.contains(TilemapControl::TILES_512) {
            Self::TileIndexBit8
        } else {
            Self::UlaOver
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct TilemapAttribute {
    pub palette_offset: u8,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub rotate: bool,
    /// Meaningful in [`TilemapAttributeMode::UlaOver`] only.
    pub ula_over: bool,
    /// Meaningful in [`TilemapAttributeMode::TileIndexBit8`] only.
    pub tile_index_bit8: bool,
}

/// Pack a tilemap attribute.
///
/// Setting the bit 0 flag that belongs to the other mode is rejected instead of
/// being quietly folded into bit 0.
pub fn encode_tilemap_attribute(attr: &TilemapAttribute, mode: TilemapAttributeMode) -> Result<u8> {
    if attr.palette_offset > 0x0F {
        return Err(RegisterError::out_of_range(
            "tilemap palette offset",
            attr.palette_offset.into(),
            0x0F,
        ));
    }

    let bit0 = match mode {
        TilemapAttributeMode::UlaOver if attr.tile_index_bit8 => {
            return Err(RegisterError::InvalidModeCombination);
        }
        TilemapAttributeMode::TileIndexBit8 if attr.ula_over => {
            return Err(RegisterError::InvalidModeCombination);
        }
        TilemapAttributeMode::UlaOver => attr.ula_over,
        TilemapAttributeMode::TileIndexBit8 => attr.tile_index_bit8,
    };

    let mut raw = attr.palette_offset << TILEMAP_PALETTE_OFFSET_SHIFT;
    raw.set_bit(3, attr.mirror_x);
    raw.set_bit(2, attr.mirror_y);
    raw.set_bit(1, attr.rotate);
    raw.set_bit(0, bit0);
    Ok(raw)
}

/// Unpack a tilemap attribute. Without a mode, bit 0 cannot be interpreted and
/// the call fails with [`RegisterError::InvalidModeCombination`].
pub fn decode_tilemap_attribute(raw: u8, mode: Option<TilemapAttributeMode>) -> Result<TilemapAttribute> {
    let mode = mode.ok_or(RegisterError::InvalidModeCombination)?;
    let bit0 = raw.get_bit(0);

    Ok(TilemapAttribute {
        palette_offset: raw.get_bits(4..8),
        mirror_x: raw.get_bit(3),
        mirror_y: raw.get_bit(2),
        rotate: raw.get_bit(1),
        ula_over: mode == TilemapAttributeMode::UlaOver && bit0,
        tile_index_bit8: mode == TilemapAttributeMode::TileIndexBit8 && bit0,
    })
}

/// Tilemap transparency index for `$4C`, a 4-bit colour index.
pub fn encode_transparency_index(index: u8) -> Result<u8> {
    if index > 0x0F {
        return Err(RegisterError::out_of_range("tilemap transparency index", index.into(), 0x0F));
    }
    Ok(index)
}

pub fn decode_transparency_index(raw: u8) -> u8 {
    raw & 0x0F
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_x_and_rotate_round_trip() {
        let attr = TilemapAttribute { mirror_x: true, rotate: true, ..Default::default() };
        let raw = encode_tilemap_attribute(&attr, TilemapAttributeMode::UlaOver).unwrap();
        assert_eq!(raw, RPC_TILEMAP_ATTRIBUTE_MIRROR_X | RPC_TILEMAP_ATTRIBUTE_ROTATE);

        let decoded = decode_tilemap_attribute(raw, Some(TilemapAttributeMode::UlaOver)).unwrap();
        assert_eq!(
            decoded,
            TilemapAttribute {
                palette_offset: 0,
                mirror_x: true,
                mirror_y: false,
                rotate: true,
                ula_over: false,
                tile_index_bit8: false,
            }
        );
    }

    #[test]
    fn bit0_follows_the_mode() {
        let raw = 0b0011_0001;
        let ula = decode_tilemap_attribute(raw, Some(TilemapAttributeMode::UlaOver)).unwrap();
        assert!(ula.ula_over);
        assert!(!ula.tile_index_bit8);
        assert_eq!(ula.palette_offset, 3);

        let tiles = decode_tilemap_attribute(raw, Some(TilemapAttributeMode::TileIndexBit8)).unwrap();
        assert!(!tiles.ula_over);
        assert!(tiles.tile_index_bit8);
    }

    #[test]
    fn decode_without_mode_is_refused() {
        assert_eq!(decode_tilemap_attribute(0x01, None), Err(RegisterError::InvalidModeCombination));
        assert_eq!(decode_tilemap_attribute(0x00, None), Err(RegisterError::InvalidModeCombination));
    }

    #[test]
    fn encode_rejects_flag_from_other_mode() {
        let attr = TilemapAttribute { tile_index_bit8: true, ..Default::default() };
        assert_eq!(
            encode_tilemap_attribute(&attr, TilemapAttributeMode::UlaOver),
            Err(RegisterError::InvalidModeCombination)
        );
        assert_eq!(encode_tilemap_attribute(&attr, TilemapAttributeMode::TileIndexBit8), Ok(0x01));

        let attr = TilemapAttribute { ula_over: true, ..Default::default() };
        assert_eq!(
            encode_tilemap_attribute(&attr, TilemapAttributeMode::TileIndexBit8),
            Err(RegisterError::InvalidModeCombination)
        );
    }

    #[test]
    fn decode_is_total() {
        for raw in 0..=u8::MAX {
            for mode in [TilemapAttributeMode::UlaOver, TilemapAttributeMode::TileIndexBit8] {
                let attr = decode_tilemap_attribute(raw, Some(mode)).unwrap();
                assert_eq!(encode_tilemap_attribute(&attr, mode), Ok(raw));
            }
        }
    }

    #[test]
    fn palette_offset_range() {
        let attr = TilemapAttribute { palette_offset: 16, ..Default::default() };
        assert!(encode_tilemap_attribute(&attr, TilemapAttributeMode::UlaOver).is_err());
        let attr = TilemapAttribute { palette_offset: 15, mirror_y: true, ..Default::default() };
        assert_eq!(encode_tilemap_attribute(&attr, TilemapAttributeMode::UlaOver), Ok(0xF4));
    }

    #[test]
    fn mode_from_control() {
        let control = TilemapControl::ENABLE | TilemapControl::TILES_512;
        assert_eq!(TilemapAttributeMode::from_control(control), TilemapAttributeMode::TileIndexBit8);
        assert_eq!(
            TilemapAttributeMode::from_control(TilemapControl::ENABLE),
            TilemapAttributeMode::UlaOver
        );
    }

    #[test]
    fn transparency_index() {
        assert_eq!(encode_transparency_index(TILEMAP_TRANSPARENCY_DEFAULT), Ok(0x0F));
        assert!(encode_transparency_index(0x10).is_err());
        assert_eq!(decode_transparency_index(0xF3), 0x03);
    }
}
