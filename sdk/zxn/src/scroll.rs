//! # Scroll Offsets and the Video Line Counter
//!
//! Values wider than a byte are split across an MSB/LSB register pair:
//!
//! | Value                 | MSB register       | LSB register | Width |
//! |-----------------------|--------------------|--------------|-------|
//! | Layer 2 X scroll      | `$71` bit 0        | `$16`        | 9     |
//! | Tilemap X scroll      | `$2F` bits 1:0     | `$30`        | 10    |
//! | Active video line     | `$1E` bit 0        | `$1F`        | 9     |
//!
//! The tilemap X offset is only meaningful up to 319 in 40-column mode and up
//! to 639 in 80-column mode; larger values still fit the register and wrap.

use crate::error::{RegisterError, Result};

pub const LAYER2_XSCROLL_MAX: u16 = 0x1FF;
pub const TILEMAP_XSCROLL_MAX: u16 = 0x3FF;

/// A value split into the bytes for an MSB/LSB register pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SplitValue {
    pub msb: u8,
    pub lsb: u8,
}

impl SplitValue {
    pub fn join(self) -> u16 {
        u16::from_be_bytes([self.msb, self.lsb])
    }
}

fn split(field: &'static str, value: u16, max: u16) -> Result<SplitValue> {
    if value > max {
        return Err(RegisterError::out_of_range(field, value.into(), max.into()));
    }
    let [msb, lsb] = value.to_be_bytes();
    Ok(SplitValue { msb, lsb })
}

pub fn encode_layer2_xscroll(x: u16) -> Result<SplitValue> {
    split("layer 2 x scroll", x, LAYER2_XSCROLL_MAX)
}

pub fn decode_layer2_xscroll(msb: u8, lsb: u8) -> u16 {
    SplitValue { msb: msb & 0x01, lsb }.join()
}

pub fn encode_tilemap_xscroll(x: u16) -> Result<SplitValue> {
    split("tilemap x scroll", x, TILEMAP_XSCROLL_MAX)
}

pub fn decode_tilemap_xscroll(msb: u8, lsb: u8) -> u16 {
    SplitValue { msb: msb & 0x03, lsb }.join()
}

/// Join `$1E`/`$1F` into the current video line.
pub fn decode_active_video_line(msb: u8, lsb: u8) -> u16 {
    SplitValue { msb: msb & 0x01, lsb }.join()
}
