//! # Terminal Control Sequences
//!
//! The ROM print routine takes a control byte followed by its parameter:
//!
//! | Byte   | Parameter            | Effect                  |
//! |--------|----------------------|-------------------------|
//! | `0x10` | `'0'` + colour       | ink (foreground) colour |
//! | `0x11` | `'0'` + colour       | paper (background)      |
//! | `0x12` | `'0'` or `'1'`       | flash off / on          |
//! | `0x13` | `'0'` or `'1'`       | bright off / on         |
//! | `0x16` | column, row          | move the print position |
//!
//! These functions only build the bytes; sending them to a character sink is
//! up to the caller.

use alloc::vec::Vec;

use crate::error::{RegisterError, Result};

pub const CTRL_INK: u8 = 0x10;
pub const CTRL_PAPER: u8 = 0x11;
pub const CTRL_FLASH: u8 = 0x12;
pub const CTRL_BRIGHT: u8 = 0x13;
pub const CTRL_AT: u8 = 0x16;

/// Highest colour accepted by ink and paper (8 and 9 are "transparent" and "contrast").
pub const COLOUR_MAX: u8 = 9;

fn colour(field: &'static str, ctrl: u8, k: u8) -> Result<[u8; 2]> {
    if k > COLOUR_MAX {
        return Err(RegisterError::out_of_range(field, k.into(), COLOUR_MAX.into()));
    }
    Ok([ctrl, b'0' + k])
}

pub fn ink(k: u8) -> Result<[u8; 2]> {
    colour("ink", CTRL_INK, k)
}

pub fn paper(k: u8) -> Result<[u8; 2]> {
    colour("paper", CTRL_PAPER, k)
}

pub fn flash(on: bool) -> [u8; 2] {
    [CTRL_FLASH, b'0' + u8::from(on)]
}

pub fn bright(on: bool) -> [u8; 2] {
    [CTRL_BRIGHT, b'0' + u8::from(on)]
}

/// Move the print position. Note the column comes first on the wire.
pub fn at(row: u8, col: u8) -> [u8; 3] {
    [CTRL_AT, col, row]
}

/// Move the print position and print `text` there.
pub fn at_str(row: u8, col: u8, text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(3 + text.len());
    out.extend_from_slice(&at(row, col));
    out.extend_from_slice(text.as_bytes());
    out
}
