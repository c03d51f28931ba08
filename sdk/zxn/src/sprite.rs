//! # Sprite Attributes
//!
//! A hardware sprite is described by four attribute bytes, or five when the
//! extended bit is set:
//!
//! | Byte | Bits                                                        |
//! |------|-------------------------------------------------------------|
//! | 0    | X bits 7:0                                                  |
//! | 1    | Y bits 7:0                                                  |
//! | 2    | palette offset 7:4, mirror X 3, mirror Y 2, rotate 1, X8 0  |
//! | 3    | visible 7, extended 6, pattern slot 5:0                     |
//! | 4    | Y8 0 (only sent when extended)                              |
//!
//! The 9-bit X coordinate is split between byte 0 and bit 0 of byte 2, which
//! is why [`encode_sprite_x`] hands back both halves.

use bit_field::BitField;

use crate::error::{RegisterError, Result};

pub const SPRITE_PALETTE_OFFSET_SHIFT: u8 = 4;
pub const SPRITE_SLOT_MASK_LSB: u8 = 0x3F;
pub const SPRITE_EXTENDED_MASK: u8 = 0x40;
pub const SPRITE_VISIBLE_MASK: u8 = 0x80;

pub const SPRITE_ROTATE_MASK: u8 = 0x02;
pub const SPRITE_MIRROR_Y_MASK: u8 = 0x04;
pub const SPRITE_MIRROR_X_MASK: u8 = 0x08;

pub const SPRITE_X_LSB_MASK: u16 = 0x00FF;
pub const SPRITE_X_MSB_MASK: u16 = 0x0100;
pub const SPRITE_X_MSB_SHIFT: u16 = 8;

/// Largest X (and extended Y) coordinate a sprite can take.
pub const SPRITE_COORD_MAX: u16 = 511;
/// Number of hardware sprites.
pub const SPRITE_COUNT: u8 = 128;

bitflags::bitflags! {
    /// Transform bits shared by attribute byte 2.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct SpriteTransform: u8 {
        const ROTATE   = SPRITE_ROTATE_MASK;
        const MIRROR_Y = SPRITE_MIRROR_Y_MASK;
        const MIRROR_X = SPRITE_MIRROR_X_MASK;
    }
}

/// Split a 9-bit X coordinate into its low byte and bit 8.
pub fn encode_sprite_x(x: u16) -> Result<(u8, bool)> {
    if x > SPRITE_COORD_MAX {
        return Err(RegisterError::out_of_range("sprite x", x.into(), SPRITE_COORD_MAX.into()));
    }
    Ok(((x & SPRITE_X_LSB_MASK) as u8, x & SPRITE_X_MSB_MASK != 0))
}

pub fn decode_sprite_x(lsb: u8, msb: bool) -> u16 {
    u16::from(lsb) | (u16::from(msb) << SPRITE_X_MSB_SHIFT)
}

/// Everything the attribute bytes say about one sprite.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct SpriteAttribute {
    pub x: u16,
    /// 0-255, or 0-511 when `extended` is set.
    pub y: u16,
    pub visible: bool,
    /// Send the fifth attribute byte.
    pub extended: bool,
    /// Pattern slot, 0-63.
    pub slot: u8,
    pub palette_offset: u8,
    pub mirror_x: bool,
    pub mirror_y: bool,
    pub rotate: bool,
}

impl SpriteAttribute {
    pub fn transform(&self) -> SpriteTransform {
        let mut t = SpriteTransform::empty();
        t.set(SpriteTransform::MIRROR_X, self.mirror_x);
        t.set(SpriteTransform::MIRROR_Y, self.mirror_y);
        t.set(SpriteTransform::ROTATE, self.rotate);
        t
    }

    /// Pack into attribute bytes. Only the first [`SpriteAttributeBytes::len`]
    /// bytes are meant to be sent.
    pub fn encode(&self) -> Result<SpriteAttributeBytes> {
        let (x_lsb, x_msb) = encode_sprite_x(self.x)?;

        let y_max = if self.extended { SPRITE_COORD_MAX } else { 0xFF };
        if self.y > y_max {
            return Err(RegisterError::out_of_range("sprite y", self.y.into(), y_max.into()));
        }
        if self.slot > SPRITE_SLOT_MASK_LSB {
            return Err(RegisterError::out_of_range(
                "sprite slot",
                self.slot.into(),
                SPRITE_SLOT_MASK_LSB.into(),
            ));
        }
        if self.palette_offset > 0x0F {
            return Err(RegisterError::out_of_range(
                "sprite palette offset",
                self.palette_offset.into(),
                0x0F,
            ));
        }

        let mut attr2 = self.transform().bits() | (self.palette_offset << SPRITE_PALETTE_OFFSET_SHIFT);
        attr2.set_bit(0, x_msb);

        let mut attr3 = self.slot;
        attr3.set_bit(6, self.extended);
        attr3.set_bit(7, self.visible);

        let mut attr4 = 0u8;
        attr4.set_bit(0, self.y.get_bit(8));

        Ok(SpriteAttributeBytes {
            bytes: [x_lsb, self.y as u8, attr2, attr3, attr4],
        })
    }

    /// Unpack attribute bytes. `attr4` is ignored unless byte 3 has the extended bit.
    pub fn decode(bytes: [u8; 5]) -> Self {
        let [attr0, attr1, attr2, attr3, attr4] = bytes;
        let extended = attr3 & SPRITE_EXTENDED_MASK != 0;
        let transform = SpriteTransform::from_bits_truncate(attr2);

        let mut y = u16::from(attr1);
        if extended {
            y.set_bit(8, attr4.get_bit(0));
        }

        Self {
            x: decode_sprite_x(attr0, attr2.get_bit(0)),
            y,
            visible: attr3 & SPRITE_VISIBLE_MASK != 0,
            extended,
            slot: attr3 & SPRITE_SLOT_MASK_LSB,
            palette_offset: attr2 >> SPRITE_PALETTE_OFFSET_SHIFT,
            mirror_x: transform.contains(SpriteTransform::MIRROR_X),
            mirror_y: transform.contains(SpriteTransform::MIRROR_Y),
            rotate: transform.contains(SpriteTransform::ROTATE),
        }
    }
}

/// Encoded attribute block, ready for `$35`-`$39`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpriteAttributeBytes {
    bytes: [u8; 5],
}

impl SpriteAttributeBytes {
    /// Always false: a block carries at least four bytes.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn len(&self) -> usize {
        if self.bytes[3] & SPRITE_EXTENDED_MASK != 0 { 5 } else { 4 }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn raw(&self) -> [u8; 5] {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_round_trip() {
        for x in 0..=SPRITE_COORD_MAX {
            let (lsb, msb) = encode_sprite_x(x).unwrap();
            assert_eq!(decode_sprite_x(lsb, msb), x);
        }
    }

    #[test]
    fn x_split() {
        assert_eq!(encode_sprite_x(0x1FF).unwrap(), (0xFF, true));
        assert_eq!(encode_sprite_x(0x0FF).unwrap(), (0xFF, false));
        assert_eq!(encode_sprite_x(256).unwrap(), (0x00, true));
    }

    #[test]
    fn x_out_of_range() {
        assert_eq!(
            encode_sprite_x(512),
            Err(RegisterError::ValueOutOfRange { field: "sprite x", value: 512, max: 511 })
        );
        assert!(encode_sprite_x(u16::MAX).is_err());
    }

    #[test]
    fn encode_basic_sprite() {
        let sprite = SpriteAttribute {
            x: 300,
            y: 40,
            visible: true,
            slot: 5,
            palette_offset: 2,
            mirror_x: true,
            ..Default::default()
        };
        let bytes = sprite.encode().unwrap();
        assert_eq!(bytes.len(), 4);
        assert!(!bytes.is_empty());
        assert_eq!(bytes.as_slice(), &[44, 40, 0b0010_1001, 0b1000_0101]);
        assert_eq!(SpriteAttribute::decode(bytes.raw()), sprite);
    }

    #[test]
    fn extended_sprite_carries_y8() {
        let sprite = SpriteAttribute {
            x: 0,
            y: 300,
            visible: true,
            extended: true,
            slot: 63,
            rotate: true,
            mirror_y: true,
            ..Default::default()
        };
        let bytes = sprite.encode().unwrap();
        assert_eq!(bytes.len(), 5);
        assert_eq!(bytes.raw()[3], SPRITE_VISIBLE_MASK | SPRITE_EXTENDED_MASK | 63);
        assert_eq!(bytes.raw()[4], 1);
        assert_eq!(SpriteAttribute::decode(bytes.raw()), sprite);
    }

    #[test]
    fn y_above_255_needs_extended() {
        let sprite = SpriteAttribute { y: 256, ..Default::default() };
        assert_eq!(
            sprite.encode(),
            Err(RegisterError::ValueOutOfRange { field: "sprite y", value: 256, max: 255 })
        );
    }

    #[test]
    fn slot_and_palette_are_range_checked() {
        let sprite = SpriteAttribute { slot: 64, ..Default::default() };
        assert!(sprite.encode().is_err());
        let sprite = SpriteAttribute { palette_offset: 16, ..Default::default() };
        assert!(sprite.encode().is_err());
    }

    #[test]
    fn decode_ignores_attr4_when_not_extended() {
        let sprite = SpriteAttribute::decode([1, 2, 0, 0, 0xFF]);
        assert_eq!(sprite.y, 2);
        assert!(!sprite.extended);
    }
}
