//! # Clip Windows (`$18`-`$1B`)
//!
//! Each clip window register holds four coordinates behind a single address.
//! The chip keeps a hidden cursor per window that picks which coordinate the
//! next write lands in:
//!
//! ```text
//!   write 1 -> X1    write 2 -> X2    write 3 -> Y1    write 4 -> Y2
//!   write 5 -> X1 again ...
//! ```
//!
//! Reads return the coordinate under the cursor and never move it. The cursor
//! cannot be read back, so software has to write all four phases (or soft
//! reset the machine) to know where it stands. A partial update through
//! [`RegisterFile::write_clip_window_phase`](crate::register_file::RegisterFile::write_clip_window_phase)
//! leaves that bookkeeping to the caller.
//!
//! Coordinates are inclusive. The tilemap window's X coordinates are doubled
//! by the hardware, so X2 = 159 reaches the right edge of a 320 pixel tilemap.

use crate::catalog::{
    REG_CLIP_WINDOW_LAYER2, REG_CLIP_WINDOW_SPRITES, REG_CLIP_WINDOW_TILEMAP, REG_CLIP_WINDOW_ULA,
};

/// The layer a clip window applies to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClipLayer {
    Layer2,
    Sprites,
    Ula,
    Tilemap,
}

impl ClipLayer {
    pub const ALL: [ClipLayer; 4] = [Self::Layer2, Self::Sprites, Self::Ula, Self::Tilemap];

    pub const fn register(self) -> u8 {
        match self {
            ClipLayer::Layer2 => REG_CLIP_WINDOW_LAYER2,
            ClipLayer::Sprites => REG_CLIP_WINDOW_SPRITES,
            ClipLayer::Ula => REG_CLIP_WINDOW_ULA,
            ClipLayer::Tilemap => REG_CLIP_WINDOW_TILEMAP,
        }
    }

    pub const fn from_register(address: u8) -> Option<Self> {
        match address {
            REG_CLIP_WINDOW_LAYER2 => Some(ClipLayer::Layer2),
            REG_CLIP_WINDOW_SPRITES => Some(ClipLayer::Sprites),
            REG_CLIP_WINDOW_ULA => Some(ClipLayer::Ula),
            REG_CLIP_WINDOW_TILEMAP => Some(ClipLayer::Tilemap),
            _ => None,
        }
    }

    /// Window after a soft reset.
    pub const fn reset_window(self) -> ClipWindow {
        match self {
            ClipLayer::Tilemap => ClipWindow { x1: 0, x2: 159, y1: 0, y2: 255 },
            _ => ClipWindow { x1: 0, x2: 255, y1: 0, y2: 191 },
        }
    }
}

/// An inclusive clip rectangle in write order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ClipWindow {
    pub x1: u8,
    pub x2: u8,
    pub y1: u8,
    pub y2: u8,
}

impl ClipWindow {
    pub const fn new(x1: u8, x2: u8, y1: u8, y2: u8) -> Self {
        Self { x1, x2, y1, y2 }
    }

    /// The four values in the order the chip expects them.
    pub const fn phases(&self) -> [u8; 4] {
        [self.x1, self.x2, self.y1, self.y2]
    }

    pub const fn get(&self, phase: ClipPhase) -> u8 {
        match phase {
            ClipPhase::Phase0 => self.x1,
            ClipPhase::Phase1 => self.x2,
            ClipPhase::Phase2 => self.y1,
            ClipPhase::Phase3 => self.y2,
        }
    }

    pub fn set(&mut self, phase: ClipPhase, value: u8) {
        match phase {
            ClipPhase::Phase0 => self.x1 = value,
            ClipPhase::Phase1 => self.x2 = value,
            ClipPhase::Phase2 => self.y1 = value,
            ClipPhase::Phase3 => self.y2 = value,
        }
    }
}

/// Position of a clip window's hidden write cursor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ClipPhase {
    /// Expecting X1. The state after reset.
    #[default]
    Phase0,
    /// Expecting X2.
    Phase1,
    /// Expecting Y1.
    Phase2,
    /// Expecting Y2.
    Phase3,
}

impl ClipPhase {
    pub const fn next(self) -> Self {
        match self {
            ClipPhase::Phase0 => ClipPhase::Phase1,
            ClipPhase::Phase1 => ClipPhase::Phase2,
            ClipPhase::Phase2 => ClipPhase::Phase3,
            ClipPhase::Phase3 => ClipPhase::Phase0,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }
}

/// The chip-side state of one clip window: its rectangle and write cursor.
///
/// Only an emulated chip can hold one of these; on hardware the cursor is
/// invisible.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ClipCursor {
    window: ClipWindow,
    phase: ClipPhase,
}

impl ClipCursor {
    pub const fn new(layer: ClipLayer) -> Self {
        Self { window: layer.reset_window(), phase: ClipPhase::Phase0 }
    }

    /// Store `value` under the cursor and advance it, wrapping after Y2.
    pub fn write(&mut self, value: u8) -> ClipPhase {
        let written = self.phase;
        self.window.set(written, value);
        self.phase = written.next();
        written
    }

    /// The coordinate under the cursor. Does not advance.
    pub fn read(&self) -> u8 {
        self.window.get(self.phase)
    }

    pub fn phase(&self) -> ClipPhase {
        self.phase
    }

    pub fn window(&self) -> ClipWindow {
        self.window
    }
}
