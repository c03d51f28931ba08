//! # Layer Priority (`$15`)
//!
//! Bits 4:2 of the Sprite and Layers System register choose the order in which
//! Sprites (S), Layer 2 (L) and the ULA/tilemap (U) are stacked, top first:
//!
//! | Code | Order                  |
//! |------|------------------------|
//! | 000  | S L U                  |
//! | 001  | L S U                  |
//! | 010  | S U L                  |
//! | 011  | L U S                  |
//! | 100  | U S L                  |
//! | 101  | U L S                  |
//! | 110  | (U\|T) S (T\|U) (B+L)  |
//! | 111  | (U\|T) S (T\|U) (B+L-5)|
//!
//! Codes 6 and 7 add a blended pass of the ULA/tilemap mix (B) with Layer 2,
//! clamped or darkened by 5 respectively.
//!
//! The rest of the byte controls sprites and LoRes, so the priority is always
//! merged into the previous register value rather than written on its own.

use bit_field::BitField;

pub const LAYER_PRIORITIES_S_L_U: u8 = 0x0;
pub const LAYER_PRIORITIES_L_S_U: u8 = 0x1;
pub const LAYER_PRIORITIES_S_U_L: u8 = 0x2;
pub const LAYER_PRIORITIES_L_U_S: u8 = 0x3;
pub const LAYER_PRIORITIES_U_S_L: u8 = 0x4;
pub const LAYER_PRIORITIES_U_L_S: u8 = 0x5;
pub const LAYER_PRIORITIES_UT_S_TU_BL: u8 = 0x6;
pub const LAYER_PRIORITIES_UT_S_TU_BL5: u8 = 0x7;

pub const LAYER_PRIORITIES_MASK: u8 = 0x07;
pub const LAYER_PRIORITIES_SHIFT: u8 = 2;

const PRIORITY_BITS: core::ops::Range<usize> = 2..5;

bitflags::bitflags! {
    /// The non-priority bits of register `$15`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct SpriteLayerFlags: u8 {
        const SPRITES_VISIBLE         = 0b0000_0001;
        const SPRITES_OVER_BORDER     = 0b0000_0010;
        /// Clip sprites to the border when they are drawn over it.
        const SPRITE_CLIP_OVER_BORDER = 0b0010_0000;
        /// Sprite 0 is drawn on top instead of the highest numbered sprite.
        const SPRITE_ZERO_ON_TOP      = 0b0100_0000;
        const LORES                   = 0b1000_0000;
    }
}

/// Relative draw order of the graphics layers.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LayerPriorityOrder {
    SpritesLayer2Ula = LAYER_PRIORITIES_S_L_U,
    Layer2SpritesUla = LAYER_PRIORITIES_L_S_U,
    SpritesUlaLayer2 = LAYER_PRIORITIES_S_U_L,
    Layer2UlaSprites = LAYER_PRIORITIES_L_U_S,
    UlaSpritesLayer2 = LAYER_PRIORITIES_U_S_L,
    UlaLayer2Sprites = LAYER_PRIORITIES_U_L_S,
    /// ULA and tilemap around the sprites, Layer 2 blended with the ULA/tilemap mix.
    BlendClamped = LAYER_PRIORITIES_UT_S_TU_BL,
    /// As [`BlendClamped`](Self::BlendClamped) but the blend result is darkened by 5.
    BlendDarkened = LAYER_PRIORITIES_UT_S_TU_BL5,
}

impl LayerPriorityOrder {
    pub const ALL: [LayerPriorityOrder; 8] = [
        Self::SpritesLayer2Ula,
        Self::Layer2SpritesUla,
        Self::SpritesUlaLayer2,
        Self::Layer2UlaSprites,
        Self::UlaSpritesLayer2,
        Self::UlaLayer2Sprites,
        Self::BlendClamped,
        Self::BlendDarkened,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Map a 3-bit code back to an order. Bits above bit 2 are ignored.
    pub const fn from_code(code: u8) -> Self {
        Self::ALL[(code & LAYER_PRIORITIES_MASK) as usize]
    }

    /// Whether this order includes the blended fifth pass.
    pub const fn is_blended(self) -> bool {
        matches!(self, Self::BlendClamped | Self::BlendDarkened)
    }
}

/// Merge `order` into a previous value of register `$15`.
pub fn encode_layer_priority(base: u8, order: LayerPriorityOrder) -> u8 {
    let mut raw = base;
    raw.set_bits(PRIORITY_BITS, order.code());
    raw
}

pub fn decode_layer_priority(raw: u8) -> LayerPriorityOrder {
    LayerPriorityOrder::from_code(raw.get_bits(PRIORITY_BITS))
}

/// Split register `$15` into its flag bits, dropping the priority field.
pub fn decode_sprite_layer_flags(raw: u8) -> SpriteLayerFlags {
    SpriteLayerFlags::from_bits_truncate(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_order() {
        for order in LayerPriorityOrder::ALL {
            assert_eq!(decode_layer_priority(encode_layer_priority(0, order)), order);
        }
    }

    #[test]
    fn code_sits_at_bits_4_to_2() {
        assert_eq!(encode_layer_priority(0, LayerPriorityOrder::SpritesUlaLayer2), 0b0000_1000);
        assert_eq!(encode_layer_priority(0, LayerPriorityOrder::BlendDarkened), 0b0001_1100);
        assert_eq!(
            encode_layer_priority(0, LayerPriorityOrder::UlaLayer2Sprites),
            LAYER_PRIORITIES_U_L_S << LAYER_PRIORITIES_SHIFT
        );
    }

    #[test]
    fn unrelated_bits_survive() {
        let base = 0b1001_0000;
        for code in 0..=6 {
            let order = LayerPriorityOrder::from_code(code);
            let raw = encode_layer_priority(base, order);
            // bit 4 belongs to the priority field, only bit 7 is foreign
            assert_eq!(raw & !(LAYER_PRIORITIES_MASK << LAYER_PRIORITIES_SHIFT), 0b1000_0000);
            assert_eq!(decode_layer_priority(raw), order);
        }
    }

    #[test]
    fn replaces_previous_priority() {
        let raw = encode_layer_priority(0b1111_1111, LayerPriorityOrder::SpritesLayer2Ula);
        assert_eq!(raw, 0b1110_0011);
    }

    #[test]
    fn decode_ignores_flags() {
        let raw = 0b1100_0011 | (LAYER_PRIORITIES_L_U_S << LAYER_PRIORITIES_SHIFT);
        assert_eq!(decode_layer_priority(raw), LayerPriorityOrder::Layer2UlaSprites);
        assert_eq!(
            decode_sprite_layer_flags(raw),
            SpriteLayerFlags::LORES
                | SpriteLayerFlags::SPRITE_ZERO_ON_TOP
                | SpriteLayerFlags::SPRITES_OVER_BORDER
                | SpriteLayerFlags::SPRITES_VISIBLE
        );
        assert!(LayerPriorityOrder::BlendClamped.is_blended());
        assert!(!LayerPriorityOrder::UlaSpritesLayer2.is_blended());
    }
}
