//! # Register Port
//!
//! The one primitive everything else is built on: read or write a byte in the
//! Next register file. On the machine itself this is the `$243B`/`$253B` I/O port
//! pair (or the `NEXTREG` instruction); in tests it is
//! [`EmulatedChip`](crate::emulated::EmulatedChip).
//!
//! Neither operation can fail. Hardware faults are not observable from software.

/// Select port: the register number is written here.
pub const NEXTREG_SELECT_PORT: u16 = 0x243B;
/// Data port: reads and writes go to the register last selected.
pub const NEXTREG_DATA_PORT: u16 = 0x253B;

/// Byte-wide access to the Next register file.
///
/// Reads take `&mut self` because they are I/O on the real machine; several
/// registers (the video line counter, for one) change between reads.
pub trait RegisterPort {
    fn write_register(&mut self, address: u8, value: u8);

    fn read_register(&mut self, address: u8) -> u8;
}

impl<P: RegisterPort + ?Sized> RegisterPort for &mut P {
    #[inline(always)]
    fn write_register(&mut self, address: u8, value: u8) {
        (**self).write_register(address, value)
    }

    #[inline(always)]
    fn read_register(&mut self, address: u8) -> u8 {
        (**self).read_register(address)
    }
}
