//! # Emulated Chip
//!
//! An in-memory [`RegisterPort`] that behaves like the Next register file,
//! including the state software cannot see on real hardware:
//!
//! - the four clip window cursors,
//! - the palette index and its auto-increment,
//! - the first-byte latch of the 9-bit palette register `$44`,
//! - the video line counter, which moves one line per read of `$1F`.
//!
//! Writes to read-only registers and reads of write-only ones are logged and
//! otherwise ignored (reads return 0).

use alloc::{boxed::Box, vec::Vec};

use log::{debug, warn};

use crate::{
    catalog::{
        self, Access, Span, REG_ACTIVE_VIDEO_LINE_H, REG_ACTIVE_VIDEO_LINE_L, REG_PALETTE_CONTROL,
        REG_PALETTE_INDEX, REG_PALETTE_VALUE_8, REG_PALETTE_VALUE_9, REG_RESET, REG_SPRITE_ATTR0,
        REG_SPRITE_ATTR4, REG_SPRITE_NUMBER,
    },
    clip::{ClipCursor, ClipLayer, ClipPhase, ClipWindow},
    palette::{decode_palette_selector, palette_code, PaletteBank, PalettePlane, Rgb333, PALETTE_SIZE},
    port::RegisterPort,
    sprite::SPRITE_COUNT,
};

/// Lines per frame of the 50 Hz timing.
pub const SCANLINES_50HZ: u16 = 312;
/// Lines per frame of the 60 Hz timing.
pub const SCANLINES_60HZ: u16 = 262;

pub struct EmulatedChip {
    regs: [u8; 256],
    clip: [ClipCursor; 4],
    palette_index: u8,
    palette_latch: Option<u8>,
    /// Eight palettes of 256 packed `RRRGGGBBB` entries, indexed by select code.
    palettes: Box<[[u16; PALETTE_SIZE]; 8]>,
    sprite_number: u8,
    sprites: Box<[[u8; 5]; SPRITE_COUNT as usize]>,
    video_line: u16,
    scanlines: u16,
    soft_resets: usize,
    writes: Vec<(u8, u8)>,
}

impl Default for EmulatedChip {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatedChip {
    pub fn new() -> Self {
        Self::with_scanlines(SCANLINES_50HZ)
    }

    pub fn with_scanlines(scanlines: u16) -> Self {
        let mut chip = Self {
            regs: [0; 256],
            clip: ClipLayer::ALL.map(ClipCursor::new),
            palette_index: 0,
            palette_latch: None,
            palettes: Box::new([[0; PALETTE_SIZE]; 8]),
            sprite_number: 0,
            sprites: Box::new([[0; 5]; SPRITE_COUNT as usize]),
            video_line: 0,
            scanlines: scanlines.max(1),
            soft_resets: 0,
            writes: Vec::new(),
        };
        chip.load_reset_values();
        chip
    }

    fn load_reset_values(&mut self) {
        for reg in catalog::CATALOG {
            if reg.span == Span::Byte && reg.phases == 1 {
                self.regs[reg.address as usize] = reg.reset as u8;
            }
        }
    }

    fn soft_reset(&mut self) {
        debug!("soft reset");
        self.load_reset_values();
        self.clip = ClipLayer::ALL.map(ClipCursor::new);
        self.palette_index = 0;
        self.palette_latch = None;
        self.soft_resets += 1;
    }

    fn clip_cursor(&mut self, layer: ClipLayer) -> &mut ClipCursor {
        &mut self.clip[layer as usize]
    }

    pub fn clip_phase(&self, layer: ClipLayer) -> ClipPhase {
        self.clip[layer as usize].phase()
    }

    pub fn clip_window(&self, layer: ClipLayer) -> ClipWindow {
        self.clip[layer as usize].window()
    }

    pub fn palette_index(&self) -> u8 {
        self.palette_index
    }

    /// Whether the first byte of a `$44` pair is waiting for its second.
    pub fn palette_latched(&self) -> bool {
        self.palette_latch.is_some()
    }

    pub fn palette_entry(&self, plane: PalettePlane, bank: PaletteBank, index: u8) -> Rgb333 {
        Rgb333::from_bits(self.palettes[palette_code(plane, bank) as usize][index as usize])
    }

    pub fn sprite_attributes(&self, number: u8) -> [u8; 5] {
        self.sprites[(number % SPRITE_COUNT) as usize]
    }

    /// Raw register contents, without the side effects of a read.
    pub fn peek(&self, address: u8) -> u8 {
        self.regs[address as usize]
    }

    pub fn video_line(&self) -> u16 {
        self.video_line
    }

    pub fn set_video_line(&mut self, line: u16) {
        self.video_line = line % self.scanlines;
    }

    pub fn soft_resets(&self) -> usize {
        self.soft_resets
    }

    /// Every write seen so far, in order.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    fn selected_palette(&self) -> usize {
        let selector = decode_palette_selector(self.regs[REG_PALETTE_CONTROL as usize]);
        palette_code(selector.plane, selector.bank) as usize
    }

    fn store_palette(&mut self, colour: Rgb333) {
        let palette = self.selected_palette();
        self.palettes[palette][self.palette_index as usize] = colour.to_bits();

        let selector = decode_palette_selector(self.regs[REG_PALETTE_CONTROL as usize]);
        if selector.auto_increments() {
            self.palette_index = self.palette_index.wrapping_add(1);
        }
    }

    fn current_palette_entry(&self) -> Rgb333 {
        Rgb333::from_bits(self.palettes[self.selected_palette()][self.palette_index as usize])
    }
}

impl RegisterPort for EmulatedChip {
    fn write_register(&mut self, address: u8, value: u8) {
        self.writes.push((address, value));

        if let Some(reg) = catalog::by_address(address) {
            if !reg.access.writable() {
                warn!("write of ${:02X} to read-only register {} (${:02X})", value, reg.name, address);
                return;
            }
        }

        if let Some(layer) = ClipLayer::from_register(address) {
            let phase = self.clip_cursor(layer).write(value);
            debug!("clip window {:?} {:?} <- {}", layer, phase, value);
            return;
        }

        match address {
            REG_RESET if value & 0x01 != 0 => self.soft_reset(),
            REG_PALETTE_INDEX => {
                self.palette_index = value;
                self.palette_latch = None;
            }
            REG_PALETTE_VALUE_8 => {
                self.palette_latch = None;
                self.store_palette(Rgb333::from_rgb332(value));
            }
            REG_PALETTE_VALUE_9 => match self.palette_latch.take() {
                None => self.palette_latch = Some(value),
                Some(first) => self.store_palette(Rgb333::from_9bit([first, value])),
            },
            REG_SPRITE_NUMBER => {
                self.sprite_number = value % SPRITE_COUNT;
                self.regs[address as usize] = self.sprite_number;
            }
            REG_SPRITE_ATTR0..=REG_SPRITE_ATTR4 => {
                let slot = (address - REG_SPRITE_ATTR0) as usize;
                self.sprites[self.sprite_number as usize][slot] = value;
            }
            _ => self.regs[address as usize] = value,
        }
    }

    fn read_register(&mut self, address: u8) -> u8 {
        if let Some(reg) = catalog::by_address(address) {
            if reg.access == Access::WriteOnly {
                warn!("read of write-only register {} (${:02X})", reg.name, address);
                return 0;
            }
        }

        if let Some(layer) = ClipLayer::from_register(address) {
            return self.clip[layer as usize].read();
        }

        match address {
            REG_ACTIVE_VIDEO_LINE_H => (self.video_line >> 8) as u8,
            REG_ACTIVE_VIDEO_LINE_L => {
                let lsb = self.video_line as u8;
                self.video_line = (self.video_line + 1) % self.scanlines;
                lsb
            }
            REG_PALETTE_INDEX => self.palette_index,
            REG_PALETTE_VALUE_8 => self.current_palette_entry().to_rgb332(),
            REG_PALETTE_VALUE_9 => self.current_palette_entry().b & 0x01,
            _ => self.regs[address as usize],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{REG_CLIP_WINDOW_TILEMAP, REG_TILEMAP_TRANSPARENCY_INDEX, REG_USER};

    #[test]
    fn reset_values_loaded() {
        let mut chip = EmulatedChip::new();
        assert_eq!(chip.read_register(REG_TILEMAP_TRANSPARENCY_INDEX), 0x0F);
        assert_eq!(chip.read_register(REG_USER), 0xFF);
        assert_eq!(chip.clip_window(ClipLayer::Tilemap), ClipWindow::new(0, 159, 0, 255));
    }

    #[test]
    fn clip_cursor_advances_on_write_only() {
        let mut chip = EmulatedChip::new();
        chip.write_register(REG_CLIP_WINDOW_TILEMAP, 10);
        assert_eq!(chip.clip_phase(ClipLayer::Tilemap), ClipPhase::Phase1);
        // X2 still holds its reset value
        assert_eq!(chip.read_register(REG_CLIP_WINDOW_TILEMAP), 159);
        assert_eq!(chip.read_register(REG_CLIP_WINDOW_TILEMAP), 159);
        assert_eq!(chip.clip_phase(ClipLayer::Tilemap), ClipPhase::Phase1);
        assert_eq!(chip.clip_phase(ClipLayer::Ula), ClipPhase::Phase0);
    }

    #[test]
    fn nine_bit_palette_needs_two_writes() {
        let mut chip = EmulatedChip::new();
        chip.write_register(REG_PALETTE_INDEX, 4);
        chip.write_register(REG_PALETTE_VALUE_9, 0b101_010_11);
        assert!(chip.palette_latched());
        assert_eq!(chip.palette_index(), 4);
        chip.write_register(REG_PALETTE_VALUE_9, 0);
        assert!(!chip.palette_latched());
        assert_eq!(chip.palette_index(), 5);
        assert_eq!(
            chip.palette_entry(PalettePlane::Ula, PaletteBank::First, 4),
            Rgb333 { r: 5, g: 2, b: 6 }
        );
    }

    #[test]
    fn index_write_drops_half_written_entry() {
        let mut chip = EmulatedChip::new();
        chip.write_register(REG_PALETTE_VALUE_9, 0xFF);
        chip.write_register(REG_PALETTE_INDEX, 9);
        assert!(!chip.palette_latched());
        chip.write_register(REG_PALETTE_VALUE_8, 0xFF);
        assert_eq!(chip.palette_entry(PalettePlane::Ula, PaletteBank::First, 9), Rgb333 { r: 7, g: 7, b: 7 });
        assert_eq!(chip.palette_index(), 10);
    }

    #[test]
    fn palette_index_reads_back() {
        let mut chip = EmulatedChip::new();
        chip.write_register(REG_PALETTE_INDEX, 30);
        assert_eq!(chip.read_register(REG_PALETTE_INDEX), 30);
        chip.write_register(REG_PALETTE_VALUE_8, 0x1C);
        assert_eq!(chip.read_register(REG_PALETTE_INDEX), 31);
    }

    #[test]
    fn video_line_wraps() {
        let mut chip = EmulatedChip::with_scanlines(SCANLINES_60HZ);
        chip.set_video_line(261);
        assert_eq!(chip.read_register(REG_ACTIVE_VIDEO_LINE_H), 1);
        assert_eq!(chip.read_register(REG_ACTIVE_VIDEO_LINE_L), 5);
        assert_eq!(chip.video_line(), 0);
    }

    #[test]
    fn read_only_registers_ignore_writes() {
        let mut chip = EmulatedChip::new();
        chip.write_register(REG_ACTIVE_VIDEO_LINE_H, 0xFF);
        assert_eq!(chip.peek(REG_ACTIVE_VIDEO_LINE_H), 0);
        assert_eq!(chip.writes(), &[(REG_ACTIVE_VIDEO_LINE_H, 0xFF)]);
    }

    #[test]
    fn soft_reset_restores_cursors() {
        let mut chip = EmulatedChip::new();
        chip.write_register(REG_CLIP_WINDOW_TILEMAP, 1);
        chip.write_register(REG_PALETTE_INDEX, 30);
        chip.write_register(REG_USER, 0);
        chip.write_register(REG_RESET, 0x01);
        assert_eq!(chip.clip_phase(ClipLayer::Tilemap), ClipPhase::Phase0);
        assert_eq!(chip.palette_index(), 0);
        assert_eq!(chip.peek(REG_USER), 0xFF);
        assert_eq!(chip.soft_resets(), 1);
    }
}
