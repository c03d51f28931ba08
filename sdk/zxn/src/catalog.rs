//! # Register Catalog
//!
//! Every Next register this crate knows about, with its address, access mode,
//! number of write phases and field layout. The catalog is plain `static` data;
//! nothing in it is ever mutated.
//!
//! | Address       | Name                         | Access | Notes                          |
//! |---------------|------------------------------|--------|--------------------------------|
//! | `$02`         | `RESET`                      | R/W    | bit 0 soft reset               |
//! | `$15`         | `SPRITE_LAYER_SYSTEM`        | R/W    | layer priority in bits 4:2     |
//! | `$16`/`$71`   | `LAYER2_XSCROLL`             | R/W    | 9-bit pair                     |
//! | `$18`-`$1B`   | `CLIP_WINDOW_*`              | R/W    | 4 write phases (X1 X2 Y1 Y2)   |
//! | `$1E`/`$1F`   | `ACTIVE_VIDEO_LINE`          | R      | 9-bit pair                     |
//! | `$2F`/`$30`   | `TILEMAP_XSCROLL`            | R/W    | 10-bit pair                    |
//! | `$34`-`$39`   | `SPRITE_NUMBER`, `SPRITE_ATTR*` | W   | sprite attribute upload        |
//! | `$40`-`$44`   | `PALETTE_*`                  | R/W    | index, value, control          |
//! | `$68`         | `ULA_CONTROL`                | R/W    |                                |
//! | `$6B`/`$6C`   | `TILEMAP_CONTROL`/`_DEFAULT_ATTRIBUTE` | R/W |                      |
//! | `$7F`         | `USER`                       | R/W    | free for software              |
//!
//! Pair registers are catalogued under the MSB address with the LSB address in
//! their [`Span`]; their halves are also listed as ordinary byte registers.

use bit_field::BitField;

use crate::error::{RegisterError, Result};

pub const REG_RESET: u8 = 0x02;
pub const REG_SPRITE_LAYER_SYSTEM: u8 = 0x15;
pub const REG_LAYER2_XSCROLL_LSB: u8 = 0x16;
pub const REG_LAYER2_YSCROLL: u8 = 0x17;
pub const REG_CLIP_WINDOW_LAYER2: u8 = 0x18;
pub const REG_CLIP_WINDOW_SPRITES: u8 = 0x19;
pub const REG_CLIP_WINDOW_ULA: u8 = 0x1A;
pub const REG_CLIP_WINDOW_TILEMAP: u8 = 0x1B;
pub const REG_ACTIVE_VIDEO_LINE_H: u8 = 0x1E;
pub const REG_ACTIVE_VIDEO_LINE_L: u8 = 0x1F;
pub const REG_TILEMAP_XSCROLL_MSB: u8 = 0x2F;
pub const REG_TILEMAP_XSCROLL_LSB: u8 = 0x30;
pub const REG_TILEMAP_YSCROLL: u8 = 0x31;
pub const REG_SPRITE_NUMBER: u8 = 0x34;
pub const REG_SPRITE_ATTR0: u8 = 0x35;
pub const REG_SPRITE_ATTR1: u8 = 0x36;
pub const REG_SPRITE_ATTR2: u8 = 0x37;
pub const REG_SPRITE_ATTR3: u8 = 0x38;
pub const REG_SPRITE_ATTR4: u8 = 0x39;
pub const REG_PALETTE_INDEX: u8 = 0x40;
pub const REG_PALETTE_VALUE_8: u8 = 0x41;
pub const REG_PALETTE_CONTROL: u8 = 0x43;
pub const REG_PALETTE_VALUE_9: u8 = 0x44;
pub const REG_SPRITE_TRANSPARENCY_INDEX: u8 = 0x4B;
pub const REG_TILEMAP_TRANSPARENCY_INDEX: u8 = 0x4C;
pub const REG_ULA_CONTROL: u8 = 0x68;
pub const REG_TILEMAP_CONTROL: u8 = 0x6B;
pub const REG_TILEMAP_DEFAULT_ATTRIBUTE: u8 = 0x6C;
pub const REG_LAYER2_XSCROLL_MSB: u8 = 0x71;
pub const REG_USER: u8 = 0x7F;

/// Which directions a register can be accessed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub const fn readable(self) -> bool {
        matches!(self, Access::ReadOnly | Access::ReadWrite)
    }

    pub const fn writable(self) -> bool {
        matches!(self, Access::WriteOnly | Access::ReadWrite)
    }
}

/// How many bytes of the register file a catalog entry covers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Span {
    Byte,
    /// 16-bit value split across two registers. The entry's own address holds
    /// the MSB, `lsb` holds the low byte.
    Pair { lsb: u8 },
}

/// A named bit-field inside a register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: u8,
    pub width: u8,
    /// Legal values with their hardware names. Empty when any value fits.
    pub values: &'static [(u16, &'static str)],
}

impl Field {
    pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
        Self { name, offset, width, values: &[] }
    }

    pub const fn flag(name: &'static str, bit: u8) -> Self {
        Self::new(name, bit, 1)
    }

    pub const fn with_values(self, values: &'static [(u16, &'static str)]) -> Self {
        Self { values, ..self }
    }

    /// Largest value the field can hold.
    pub const fn max(&self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    /// The field's bits in register position.
    pub const fn mask(&self) -> u16 {
        self.max() << self.offset
    }

    fn range(&self) -> core::ops::Range<usize> {
        self.offset as usize..(self.offset + self.width) as usize
    }

    /// Pull the field out of a raw register value. Bits outside the field are ignored.
    pub fn extract(&self, raw: u16) -> u16 {
        raw.get_bits(self.range())
    }

    /// Replace the field inside `base`, leaving every other bit alone.
    pub fn insert(&self, base: u16, value: u16) -> Result<u16> {
        if value > self.max() {
            return Err(RegisterError::out_of_range(self.name, value.into(), self.max().into()));
        }
        let mut raw = base;
        raw.set_bits(self.range(), value);
        Ok(raw)
    }

    /// Hardware name of an enumerated value.
    pub fn value_name(&self, value: u16) -> Option<&'static str> {
        self.values.iter().find(|(v, _)| *v == value).map(|(_, name)| *name)
    }
}

/// A catalogued Next register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Register {
    pub name: &'static str,
    pub address: u8,
    pub access: Access,
    pub span: Span,
    /// Writes needed to load the whole register. Greater than 1 for registers
    /// that step an internal cursor on every write.
    pub phases: u8,
    /// Value after a soft reset (the first phase for multi-phase registers).
    pub reset: u16,
    pub fields: &'static [Field],
}

impl Register {
    const fn byte(name: &'static str, address: u8, access: Access, reset: u16, fields: &'static [Field]) -> Self {
        Self { name, address, access, span: Span::Byte, phases: 1, reset, fields }
    }

    const fn pair(name: &'static str, msb: u8, lsb: u8, access: Access, fields: &'static [Field]) -> Self {
        Self { name, address: msb, access, span: Span::Pair { lsb }, phases: 1, reset: 0, fields }
    }

    const fn phased(self, phases: u8) -> Self {
        Self { phases, ..self }
    }

    /// Bit width of the register: 8, or 16 for MSB/LSB pairs.
    pub const fn bits(&self) -> u8 {
        match self.span {
            Span::Byte => 8,
            Span::Pair { .. } => 16,
        }
    }

    /// Largest value a write may carry. Pairs are limited to the bits their
    /// fields cover, so a 10-bit scroll offset stops at 1023.
    pub fn max_value(&self) -> u16 {
        match self.span {
            Span::Byte => 0xFF,
            Span::Pair { .. } => self.fields.iter().fold(0, |acc, f| acc | f.mask()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub const fn is_stateful(&self) -> bool {
        self.phases > 1
    }
}

const LAYER_PRIORITY_NAMES: &[(u16, &str)] = &[
    (0, "SLU"),
    (1, "LSU"),
    (2, "SUL"),
    (3, "LUS"),
    (4, "USL"),
    (5, "ULS"),
    (6, "(U|T)S(T|U)(B+L)"),
    (7, "(U|T)S(T|U)(B+L-5)"),
];

const PALETTE_SELECT_NAMES: &[(u16, &str)] = &[
    (0b000, "ULA first palette"),
    (0b001, "Layer 2 first palette"),
    (0b010, "Sprites first palette"),
    (0b011, "Tilemap first palette"),
    (0b100, "ULA second palette"),
    (0b101, "Layer 2 second palette"),
    (0b110, "Sprites second palette"),
    (0b111, "Tilemap second palette"),
];

const ULA_BLEND_NAMES: &[(u16, &str)] = &[
    (0b00, "ULA as blend colour"),
    (0b01, "no blending"),
    (0b10, "ULA/tilemap mix as blend colour"),
    (0b11, "tilemap as blend colour"),
];

const COORDINATE: &[Field] = &[Field::new("coordinate", 0, 8)];
const WHOLE_BYTE: &[Field] = &[Field::new("value", 0, 8)];

pub static CATALOG: &[Register] = &[
    Register::byte("RESET", REG_RESET, Access::ReadWrite, 0, &[
        Field::flag("soft_reset", 0),
        Field::flag("hard_reset", 1),
    ]),
    Register::byte("SPRITE_LAYER_SYSTEM", REG_SPRITE_LAYER_SYSTEM, Access::ReadWrite, 0, &[
        Field::flag("sprites_visible", 0),
        Field::flag("sprites_over_border", 1),
        Field::new("layer_priority", 2, 3).with_values(LAYER_PRIORITY_NAMES),
        Field::flag("sprite_clip_over_border", 5),
        Field::flag("sprite_zero_on_top", 6),
        Field::flag("lores", 7),
    ]),
    Register::byte("LAYER2_XSCROLL_LSB", REG_LAYER2_XSCROLL_LSB, Access::ReadWrite, 0, WHOLE_BYTE),
    Register::byte("LAYER2_YSCROLL", REG_LAYER2_YSCROLL, Access::ReadWrite, 0, WHOLE_BYTE),
    Register::byte("CLIP_WINDOW_LAYER2", REG_CLIP_WINDOW_LAYER2, Access::ReadWrite, 0, COORDINATE).phased(4),
    Register::byte("CLIP_WINDOW_SPRITES", REG_CLIP_WINDOW_SPRITES, Access::ReadWrite, 0, COORDINATE).phased(4),
    Register::byte("CLIP_WINDOW_ULA", REG_CLIP_WINDOW_ULA, Access::ReadWrite, 0, COORDINATE).phased(4),
    Register::byte("CLIP_WINDOW_TILEMAP", REG_CLIP_WINDOW_TILEMAP, Access::ReadWrite, 0, COORDINATE).phased(4),
    Register::byte("ACTIVE_VIDEO_LINE_H", REG_ACTIVE_VIDEO_LINE_H, Access::ReadOnly, 0, &[
        Field::flag("line_msb", 0),
    ]),
    Register::byte("ACTIVE_VIDEO_LINE_L", REG_ACTIVE_VIDEO_LINE_L, Access::ReadOnly, 0, WHOLE_BYTE),
    Register::byte("TILEMAP_XSCROLL_MSB", REG_TILEMAP_XSCROLL_MSB, Access::ReadWrite, 0, &[
        Field::new("offset_msb", 0, 2),
    ]),
    Register::byte("TILEMAP_XSCROLL_LSB", REG_TILEMAP_XSCROLL_LSB, Access::ReadWrite, 0, WHOLE_BYTE),
    Register::byte("TILEMAP_YSCROLL", REG_TILEMAP_YSCROLL, Access::ReadWrite, 0, WHOLE_BYTE),
    Register::byte("SPRITE_NUMBER", REG_SPRITE_NUMBER, Access::ReadWrite, 0, &[
        Field::new("sprite", 0, 7),
    ]),
    Register::byte("SPRITE_ATTR0", REG_SPRITE_ATTR0, Access::WriteOnly, 0, &[
        Field::new("x_lsb", 0, 8),
    ]),
    Register::byte("SPRITE_ATTR1", REG_SPRITE_ATTR1, Access::WriteOnly, 0, &[
        Field::new("y_lsb", 0, 8),
    ]),
    Register::byte("SPRITE_ATTR2", REG_SPRITE_ATTR2, Access::WriteOnly, 0, &[
        Field::flag("x_msb", 0),
        Field::flag("rotate", 1),
        Field::flag("mirror_y", 2),
        Field::flag("mirror_x", 3),
        Field::new("palette_offset", 4, 4),
    ]),
    Register::byte("SPRITE_ATTR3", REG_SPRITE_ATTR3, Access::WriteOnly, 0, &[
        Field::new("pattern", 0, 6),
        Field::flag("extended", 6),
        Field::flag("visible", 7),
    ]),
    Register::byte("SPRITE_ATTR4", REG_SPRITE_ATTR4, Access::WriteOnly, 0, &[
        Field::flag("y_msb", 0),
    ]),
    Register::byte("PALETTE_INDEX", REG_PALETTE_INDEX, Access::ReadWrite, 0, WHOLE_BYTE),
    Register::byte("PALETTE_VALUE_8", REG_PALETTE_VALUE_8, Access::ReadWrite, 0, &[
        Field::new("blue", 0, 2),
        Field::new("green", 2, 3),
        Field::new("red", 5, 3),
    ]),
    Register::byte("PALETTE_CONTROL", REG_PALETTE_CONTROL, Access::ReadWrite, 0, &[
        Field::flag("extended_palette", 0),
        Field::new("palette_select", 4, 3).with_values(PALETTE_SELECT_NAMES),
        Field::flag("auto_increment_disabled", 7),
    ]),
    Register::byte("PALETTE_VALUE_9", REG_PALETTE_VALUE_9, Access::ReadWrite, 0, WHOLE_BYTE).phased(2),
    Register::byte("SPRITE_TRANSPARENCY_INDEX", REG_SPRITE_TRANSPARENCY_INDEX, Access::ReadWrite, 0xE3, WHOLE_BYTE),
    Register::byte("TILEMAP_TRANSPARENCY_INDEX", REG_TILEMAP_TRANSPARENCY_INDEX, Access::ReadWrite, 0x0F, &[
        Field::new("index", 0, 4),
    ]),
    Register::byte("ULA_CONTROL", REG_ULA_CONTROL, Access::ReadWrite, 0, &[
        Field::flag("stencil", 0),
        Field::flag("half_pixel_scroll", 2),
        Field::flag("ula_plus", 3),
        Field::flag("cancel_extended_keys", 4),
        Field::new("blend", 5, 2).with_values(ULA_BLEND_NAMES),
        Field::flag("disable_output", 7),
    ]),
    Register::byte("TILEMAP_CONTROL", REG_TILEMAP_CONTROL, Access::ReadWrite, 0, &[
        Field::flag("force_over_ula", 0),
        Field::flag("tiles_512", 1),
        Field::flag("text_mode", 3),
        Field::flag("second_palette", 4),
        Field::flag("default_attribute", 5),
        Field::flag("mode_80x32", 6),
        Field::flag("enable", 7),
    ]),
    Register::byte("TILEMAP_DEFAULT_ATTRIBUTE", REG_TILEMAP_DEFAULT_ATTRIBUTE, Access::ReadWrite, 0, &[
        Field::flag("ula_over_or_tile_bit8", 0),
        Field::flag("rotate", 1),
        Field::flag("mirror_y", 2),
        Field::flag("mirror_x", 3),
        Field::new("palette_offset", 4, 4),
    ]),
    Register::byte("LAYER2_XSCROLL_MSB", REG_LAYER2_XSCROLL_MSB, Access::ReadWrite, 0, &[
        Field::flag("offset_msb", 0),
    ]),
    Register::byte("USER", REG_USER, Access::ReadWrite, 0xFF, WHOLE_BYTE),
    Register::pair("LAYER2_XSCROLL", REG_LAYER2_XSCROLL_MSB, REG_LAYER2_XSCROLL_LSB, Access::ReadWrite, &[
        Field::new("offset", 0, 9),
    ]),
    Register::pair("TILEMAP_XSCROLL", REG_TILEMAP_XSCROLL_MSB, REG_TILEMAP_XSCROLL_LSB, Access::ReadWrite, &[
        Field::new("offset", 0, 10),
    ]),
    Register::pair("ACTIVE_VIDEO_LINE", REG_ACTIVE_VIDEO_LINE_H, REG_ACTIVE_VIDEO_LINE_L, Access::ReadOnly, &[
        Field::new("line", 0, 9),
    ]),
];

/// Find a register by its catalog name.
pub fn lookup(name: &str) -> Result<&'static Register> {
    CATALOG
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| RegisterError::UnknownRegister { name: name.into() })
}

/// The single-byte register living at `address`, if it is catalogued.
pub fn by_address(address: u8) -> Option<&'static Register> {
    CATALOG.iter().find(|r| r.address == address && r.span == Span::Byte)
}
