//! # Register File
//!
//! [`RegisterFile`] is the handle every hardware-touching operation goes
//! through. It owns a [`RegisterPort`] and adds the two things a bare port
//! cannot express:
//!
//! - **read-modify-write** for registers shared between unrelated settings
//!   (layer priority lives next to the sprite flags in `$15`), and
//! - **write sequences** for registers with a hidden cursor (clip windows,
//!   palette upload).
//!
//! Every sequence takes `&mut self`, so two call sites can never interleave
//! their phases. If the register file has to be shared between threads, put
//! the whole `RegisterFile` behind one lock; locking individual registers
//! would still let clip window phases from different writers mix.
//!
//! ```ignore
//! let mut regs = RegisterFile::new(port);
//!
//! regs.set_layer_priority(LayerPriorityOrder::UlaSpritesLayer2);
//! regs.write_clip_window(ClipLayer::Tilemap, ClipWindow::new(8, 151, 16, 239));
//! regs.write_palette(
//!     PaletteSelector::new(PalettePlane::Tilemap, PaletteBank::First),
//!     0,
//!     &colours,
//! )?;
//! ```

use log::trace;

use crate::{
    catalog::{
        self, Span, REG_ACTIVE_VIDEO_LINE_H, REG_ACTIVE_VIDEO_LINE_L, REG_LAYER2_XSCROLL_LSB,
        REG_LAYER2_XSCROLL_MSB, REG_PALETTE_CONTROL, REG_PALETTE_INDEX, REG_PALETTE_VALUE_8,
        REG_PALETTE_VALUE_9, REG_SPRITE_ATTR0, REG_SPRITE_LAYER_SYSTEM, REG_SPRITE_NUMBER,
        REG_TILEMAP_CONTROL, REG_TILEMAP_DEFAULT_ATTRIBUTE, REG_TILEMAP_TRANSPARENCY_INDEX,
        REG_TILEMAP_XSCROLL_LSB, REG_TILEMAP_XSCROLL_MSB, REG_ULA_CONTROL,
    },
    clip::{ClipLayer, ClipWindow},
    error::{RegisterError, Result},
    layers::{decode_layer_priority, encode_layer_priority, LayerPriorityOrder, SpriteLayerFlags},
    palette::{decode_palette_selector, PaletteSelector, Rgb333, PALETTE_SIZE},
    port::RegisterPort,
    scroll::{decode_active_video_line, encode_layer2_xscroll, encode_tilemap_xscroll, SplitValue},
    sprite::{SpriteAttribute, SPRITE_COUNT},
    tilemap::{
        decode_tilemap_attribute, encode_tilemap_attribute, encode_transparency_index, TilemapAttribute,
        TilemapAttributeMode, TilemapControl,
    },
    ula::UlaControl,
};

pub struct RegisterFile<P: RegisterPort> {
    port: P,
}

impl<P: RegisterPort> RegisterFile<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    #[inline(always)]
    pub fn write(&mut self, address: u8, value: u8) {
        trace!("nextreg ${:02X} <- ${:02X}", address, value);
        self.port.write_register(address, value);
    }

    #[inline(always)]
    pub fn read(&mut self, address: u8) -> u8 {
        self.port.read_register(address)
    }

    /// Read a register, pass it through `f` and write the result back.
    pub fn modify(&mut self, address: u8, f: impl FnOnce(u8) -> u8) -> u8 {
        let value = f(self.read(address));
        self.write(address, value);
        value
    }

    /// Write a catalogued register by name. Pair registers get their MSB
    /// written before the LSB. Read-only registers are refused before anything
    /// reaches the port.
    pub fn write_named(&mut self, name: &str, value: u16) -> Result<()> {
        let reg = catalog::lookup(name)?;
        if !reg.access.writable() {
            return Err(RegisterError::NotWritable { name: reg.name });
        }
        let max = reg.max_value();
        if value > max {
            return Err(RegisterError::out_of_range(reg.name, value.into(), max.into()));
        }

        match reg.span {
            Span::Byte => self.write(reg.address, value as u8),
            Span::Pair { lsb } => {
                let [hi, lo] = value.to_be_bytes();
                self.write(reg.address, hi);
                self.write(lsb, lo);
            }
        }
        Ok(())
    }

    /// Read a catalogued register by name. Write-only registers are refused.
    pub fn read_named(&mut self, name: &str) -> Result<u16> {
        let reg = catalog::lookup(name)?;
        if !reg.access.readable() {
            return Err(RegisterError::NotReadable { name: reg.name });
        }
        Ok(match reg.span {
            Span::Byte => self.read(reg.address).into(),
            Span::Pair { lsb } => {
                let hi = self.read(reg.address);
                let lo = self.read(lsb);
                u16::from_be_bytes([hi, lo])
            }
        })
    }

    /// Change the layer order, keeping the sprite and LoRes bits of `$15`.
    pub fn set_layer_priority(&mut self, order: LayerPriorityOrder) {
        self.modify(REG_SPRITE_LAYER_SYSTEM, |base| encode_layer_priority(base, order));
    }

    pub fn layer_priority(&mut self) -> LayerPriorityOrder {
        decode_layer_priority(self.read(REG_SPRITE_LAYER_SYSTEM))
    }

    /// Replace the flag bits of `$15`, keeping the layer order.
    pub fn set_sprite_layer_flags(&mut self, flags: SpriteLayerFlags) {
        self.modify(REG_SPRITE_LAYER_SYSTEM, |base| {
            encode_layer_priority(flags.bits(), decode_layer_priority(base))
        });
    }

    /// Write all four coordinates of a clip window.
    ///
    /// Assumes the window's cursor is at X1, which holds after reset and after
    /// any earlier complete write.
    pub fn write_clip_window(&mut self, layer: ClipLayer, window: ClipWindow) {
        let address = layer.register();
        for value in window.phases() {
            self.write(address, value);
        }
    }

    /// Write one coordinate and move the chip's cursor on by one.
    pub fn write_clip_window_phase(&mut self, layer: ClipLayer, value: u8) {
        self.write(layer.register(), value);
    }

    /// The coordinate under the window's cursor. The cursor does not move.
    pub fn read_clip_window(&mut self, layer: ClipLayer) -> u8 {
        self.read(layer.register())
    }

    pub fn select_palette(&mut self, selector: PaletteSelector) {
        self.write(REG_PALETTE_CONTROL, selector.encode());
    }

    pub fn palette_selector(&mut self) -> PaletteSelector {
        decode_palette_selector(self.read(REG_PALETTE_CONTROL))
    }

    /// Upload 9-bit colours starting at `first_index` of the selected palette.
    ///
    /// With auto-increment enabled the index is written once and the chip
    /// steps it; with it disabled the index is written before every entry.
    pub fn write_palette(&mut self, selector: PaletteSelector, first_index: u8, colours: &[Rgb333]) -> Result<()> {
        check_palette_span(first_index, colours.len())?;

        self.select_palette(selector);
        self.write(REG_PALETTE_INDEX, first_index);
        for (i, colour) in colours.iter().enumerate() {
            if i > 0 && !selector.auto_increments() {
                self.write(REG_PALETTE_INDEX, first_index + i as u8);
            }
            let [first, second] = colour.to_9bit();
            self.write(REG_PALETTE_VALUE_9, first);
            self.write(REG_PALETTE_VALUE_9, second);
        }
        Ok(())
    }

    /// Upload 8-bit `RRRGGGBB` colours through `$41`.
    pub fn write_palette_8bit(&mut self, selector: PaletteSelector, first_index: u8, colours: &[u8]) -> Result<()> {
        check_palette_span(first_index, colours.len())?;

        self.select_palette(selector);
        self.write(REG_PALETTE_INDEX, first_index);
        for (i, colour) in colours.iter().enumerate() {
            if i > 0 && !selector.auto_increments() {
                self.write(REG_PALETTE_INDEX, first_index + i as u8);
            }
            self.write(REG_PALETTE_VALUE_8, *colour);
        }
        Ok(())
    }

    /// Select sprite `number` and send its attribute bytes.
    pub fn write_sprite(&mut self, number: u8, attr: &SpriteAttribute) -> Result<()> {
        if number >= SPRITE_COUNT {
            return Err(RegisterError::out_of_range("sprite number", number.into(), (SPRITE_COUNT - 1).into()));
        }
        let bytes = attr.encode()?;

        self.write(REG_SPRITE_NUMBER, number);
        for (offset, byte) in bytes.as_slice().iter().enumerate() {
            self.write(REG_SPRITE_ATTR0 + offset as u8, *byte);
        }
        Ok(())
    }

    pub fn set_tilemap_xscroll(&mut self, x: u16) -> Result<()> {
        let SplitValue { msb, lsb } = encode_tilemap_xscroll(x)?;
        self.write(REG_TILEMAP_XSCROLL_MSB, msb);
        self.write(REG_TILEMAP_XSCROLL_LSB, lsb);
        Ok(())
    }

    pub fn set_layer2_xscroll(&mut self, x: u16) -> Result<()> {
        let SplitValue { msb, lsb } = encode_layer2_xscroll(x)?;
        self.modify(REG_LAYER2_XSCROLL_MSB, |base| (base & !0x01) | msb);
        self.write(REG_LAYER2_XSCROLL_LSB, lsb);
        Ok(())
    }

    pub fn set_tilemap_control(&mut self, control: TilemapControl) {
        self.write(REG_TILEMAP_CONTROL, control.bits());
    }

    pub fn tilemap_control(&mut self) -> TilemapControl {
        TilemapControl::from_bits_truncate(self.read(REG_TILEMAP_CONTROL))
    }

    /// How bit 0 of tilemap attributes is read right now, according to `$6B`.
    pub fn tilemap_attribute_mode(&mut self) -> TilemapAttributeMode {
        TilemapAttributeMode::from_control(self.tilemap_control())
    }

    pub fn set_tilemap_default_attribute(&mut self, attr: &TilemapAttribute, mode: TilemapAttributeMode) -> Result<()> {
        let raw = encode_tilemap_attribute(attr, mode)?;
        self.write(REG_TILEMAP_DEFAULT_ATTRIBUTE, raw);
        Ok(())
    }

    pub fn tilemap_default_attribute(&mut self, mode: Option<TilemapAttributeMode>) -> Result<TilemapAttribute> {
        decode_tilemap_attribute(self.read(REG_TILEMAP_DEFAULT_ATTRIBUTE), mode)
    }

    pub fn set_tilemap_transparency(&mut self, index: u8) -> Result<()> {
        let raw = encode_transparency_index(index)?;
        self.write(REG_TILEMAP_TRANSPARENCY_INDEX, raw);
        Ok(())
    }

    pub fn set_ula_control(&mut self, control: UlaControl) {
        self.write(REG_ULA_CONTROL, control.encode());
    }

    pub fn ula_control(&mut self) -> UlaControl {
        UlaControl::decode(self.read(REG_ULA_CONTROL))
    }

    /// Line the beam is on. The MSB is read first, so a carry between the two
    /// reads can make the result one line stale.
    pub fn active_video_line(&mut self) -> u16 {
        let msb = self.read(REG_ACTIVE_VIDEO_LINE_H);
        let lsb = self.read(REG_ACTIVE_VIDEO_LINE_L);
        decode_active_video_line(msb, lsb)
    }
}

fn check_palette_span(first_index: u8, len: usize) -> Result<()> {
    let end = usize::from(first_index) + len;
    if end > PALETTE_SIZE {
        return Err(RegisterError::out_of_range(
            "palette entries",
            end as u32,
            PALETTE_SIZE as u32,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::palette::{PaletteBank, PalettePlane};

    /// Records every write instead of modelling the chip.
    struct Recorder {
        values: Vec<(u8, u8)>,
        regs: [u8; 256],
    }

    impl RegisterPort for Recorder {
        fn write_register(&mut self, address: u8, value: u8) {
            self.values.push((address, value));
            self.regs[address as usize] = value;
        }

        fn read_register(&mut self, address: u8) -> u8 {
            self.regs[address as usize]
        }
    }

    fn regs() -> RegisterFile<Recorder> {
        RegisterFile::new(Recorder { values: Vec::new(), regs: [0; 256] })
    }

    #[test]
    fn layer_priority_keeps_sprite_flags() {
        let mut regs = regs();
        regs.write(REG_SPRITE_LAYER_SYSTEM, 0b1000_0011);
        regs.set_layer_priority(LayerPriorityOrder::UlaLayer2Sprites);
        assert_eq!(regs.read(REG_SPRITE_LAYER_SYSTEM), 0b1001_0111);
        assert_eq!(regs.layer_priority(), LayerPriorityOrder::UlaLayer2Sprites);

        regs.set_sprite_layer_flags(SpriteLayerFlags::SPRITES_VISIBLE);
        assert_eq!(regs.read(REG_SPRITE_LAYER_SYSTEM), 0b0001_0101);
    }

    #[test]
    fn clip_window_is_four_writes_in_order() {
        let mut regs = regs();
        regs.write_clip_window(ClipLayer::Tilemap, ClipWindow::new(10, 20, 5, 100));
        assert_eq!(regs.port().values, [(0x1B, 10), (0x1B, 20), (0x1B, 5), (0x1B, 100)]);
    }

    #[test]
    fn palette_upload_sequence() {
        let mut regs = regs();
        let selector = PaletteSelector::new(PalettePlane::Layer2, PaletteBank::Second);
        let colours = [Rgb333 { r: 7, g: 0, b: 1 }, Rgb333 { r: 0, g: 7, b: 6 }];
        regs.write_palette(selector, 16, &colours).unwrap();
        assert_eq!(
            regs.port().values,
            [
                (REG_PALETTE_CONTROL, 0x50),
                (REG_PALETTE_INDEX, 16),
                (REG_PALETTE_VALUE_9, 0b111_000_00),
                (REG_PALETTE_VALUE_9, 1),
                (REG_PALETTE_VALUE_9, 0b000_111_11),
                (REG_PALETTE_VALUE_9, 0),
            ]
        );
    }

    #[test]
    fn palette_without_auto_increment_rewrites_index() {
        let mut regs = regs();
        let mut selector = PaletteSelector::new(PalettePlane::Ula, PaletteBank::First);
        selector.auto_increment_disabled = true;
        regs.write_palette_8bit(selector, 254, &[0xAA, 0xBB]).unwrap();
        assert_eq!(
            regs.port().values,
            [
                (REG_PALETTE_CONTROL, 0x80),
                (REG_PALETTE_INDEX, 254),
                (REG_PALETTE_VALUE_8, 0xAA),
                (REG_PALETTE_INDEX, 255),
                (REG_PALETTE_VALUE_8, 0xBB),
            ]
        );
    }

    #[test]
    fn palette_span_checked_before_any_write() {
        let mut regs = regs();
        let selector = PaletteSelector::new(PalettePlane::Ula, PaletteBank::First);
        assert_eq!(
            regs.write_palette_8bit(selector, 255, &[1, 2]),
            Err(RegisterError::ValueOutOfRange { field: "palette entries", value: 257, max: 256 })
        );
        assert!(regs.port().values.is_empty());
    }

    #[test]
    fn sprite_upload() {
        let mut regs = regs();
        let sprite = SpriteAttribute { x: 256, y: 10, visible: true, slot: 1, ..Default::default() };
        regs.write_sprite(3, &sprite).unwrap();
        assert_eq!(
            regs.port().values,
            [(0x34, 3), (0x35, 0), (0x36, 10), (0x37, 0x01), (0x38, 0x81)]
        );
        assert!(regs.write_sprite(128, &sprite).is_err());
    }

    #[test]
    fn bad_sprite_writes_nothing() {
        let mut regs = regs();
        let sprite = SpriteAttribute { x: 600, ..Default::default() };
        assert!(regs.write_sprite(0, &sprite).is_err());
        assert!(regs.port().values.is_empty());
    }

    #[test]
    fn scroll_pairs_write_msb_first() {
        let mut regs = regs();
        regs.set_tilemap_xscroll(639).unwrap();
        regs.write(REG_LAYER2_XSCROLL_MSB, 0b1000_0000);
        regs.set_layer2_xscroll(0x1FF).unwrap();
        assert_eq!(regs.read(REG_LAYER2_XSCROLL_MSB), 0b1000_0001);
        assert_eq!(regs.read_named("TILEMAP_XSCROLL").unwrap(), 639);
        assert_eq!(regs.port().values[..2], [(0x2F, 0x02), (0x30, 0x7F)]);
    }

    #[test]
    fn named_access() {
        let mut regs = regs();
        regs.write_named("USER", 0x42).unwrap();
        assert_eq!(regs.read(0x7F), 0x42);
        assert!(matches!(regs.write_named("USER", 0x100), Err(RegisterError::ValueOutOfRange { .. })));
        assert!(matches!(regs.write_named("BOGUS", 0), Err(RegisterError::UnknownRegister { .. })));
        assert!(matches!(regs.read_named("BOGUS"), Err(RegisterError::UnknownRegister { .. })));
    }

    #[test]
    fn named_access_honours_catalog_access() {
        let mut regs = regs();
        assert_eq!(
            regs.write_named("ACTIVE_VIDEO_LINE", 0x100),
            Err(RegisterError::NotWritable { name: "ACTIVE_VIDEO_LINE" })
        );
        assert_eq!(
            regs.write_named("ACTIVE_VIDEO_LINE_L", 0),
            Err(RegisterError::NotWritable { name: "ACTIVE_VIDEO_LINE_L" })
        );
        assert!(regs.port().values.is_empty());

        assert_eq!(regs.read_named("SPRITE_ATTR2"), Err(RegisterError::NotReadable { name: "SPRITE_ATTR2" }));
        regs.write_named("SPRITE_ATTR2", 0x08).unwrap();
        assert_eq!(regs.port().values, [(REG_SPRITE_ATTR0 + 2, 0x08)]);
    }

    #[test]
    fn tilemap_attribute_mode_comes_from_control() {
        let mut regs = regs();
        regs.set_tilemap_control(TilemapControl::ENABLE | TilemapControl::TILES_512);
        let mode = regs.tilemap_attribute_mode();
        assert_eq!(mode, TilemapAttributeMode::TileIndexBit8);

        let attr = TilemapAttribute { tile_index_bit8: true, palette_offset: 2, ..Default::default() };
        regs.set_tilemap_default_attribute(&attr, mode).unwrap();
        assert_eq!(regs.read(REG_TILEMAP_DEFAULT_ATTRIBUTE), 0x21);
        assert_eq!(regs.tilemap_default_attribute(Some(mode)).unwrap(), attr);
        assert_eq!(regs.tilemap_default_attribute(None), Err(RegisterError::InvalidModeCombination));
    }
}
