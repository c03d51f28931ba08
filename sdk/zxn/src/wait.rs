//! # Busy Waits and Soft Reset
//!
//! Both waits spin with no timeout and no way to cancel them. If the line
//! never comes round (or the key is never pressed) they never return.

use crate::{
    catalog::{REG_ACTIVE_VIDEO_LINE_L, REG_RESET},
    port::RegisterPort,
    register_file::RegisterFile,
};

/// Value written to `$02` to soft reset the machine.
pub const RESET_SOFT: u8 = 0x01;

/// Source of the ROM's "key currently held" code, 0 when nothing is pressed.
pub trait KeyInput {
    fn inkey(&mut self) -> u8;
}

impl<P: RegisterPort> RegisterFile<P> {
    /// Spin until the beam enters `line` (low 8 bits of the line counter).
    ///
    /// If the beam is already on `line`, waits for it to leave and come back,
    /// so the caller always lands at the start of the line.
    ///
    /// Only `$1F` is compared, so on frames taller than 256 lines the lines
    /// from 256 up alias the first ones: at 312 lines, waiting for 20 also
    /// stops on line 276.
    pub fn wait_for_scanline(&mut self, line: u8) {
        while self.read(REG_ACTIVE_VIDEO_LINE_L) == line {}
        while self.read(REG_ACTIVE_VIDEO_LINE_L) != line {}
    }

    /// Soft reset the machine. Clip window cursors and the palette index go
    /// back to their reset state along with everything else.
    pub fn soft_reset(&mut self) {
        self.write(REG_RESET, RESET_SOFT);
    }
}

/// Spin until a key is pressed, then until it is released.
pub fn wait_key<K: KeyInput>(keys: &mut K) {
    while keys.inkey() == 0 {}
    while keys.inkey() != 0 {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Script<'a> {
        codes: &'a [u8],
        reads: usize,
    }

    impl KeyInput for Script<'_> {
        fn inkey(&mut self) -> u8 {
            let code = self.codes[self.reads];
            self.reads += 1;
            code
        }
    }

    #[test]
    fn key_wait_needs_press_and_release() {
        let mut keys = Script { codes: &[0, 0, b'a', b'a', 0, b'b'], reads: 0 };
        wait_key(&mut keys);
        assert_eq!(keys.reads, 5);
    }
}
