//! # zxn
//!
//! Register-level access to the ZX Spectrum Next video hardware.
//!
//! The Next configures its video through a bank of 8-bit "nextregs", reached by
//! writing a register number to port `$243B` and then reading or writing the
//! value at `$253B`. Most of them are plain bit-fields. A few are not:
//!
//! - the four clip window registers (`$18`-`$1B`) each hide a four-phase write
//!   cursor,
//! - the palette value registers (`$41`, `$44`) move a hidden palette index
//!   after each entry.
//!
//! The crate is split the same way:
//!
//! - [`catalog`]: every known register, its address, access and fields.
//! - Codecs ([`layers`], [`sprite`], [`tilemap`], [`palette`], [`scroll`],
//!   [`ula`], [`layer2`], [`text`]): pure functions between typed values and raw
//!   register bytes.
//! - [`register_file`]: the [`RegisterFile`] handle that drives a
//!   [`RegisterPort`] and owns the multi-write sequences.
//! - [`emulated`]: an in-memory chip that models the hidden state, for tests and
//!   host-side tooling.

#![no_std]

extern crate alloc;

pub mod catalog;
pub mod clip;
#[cfg(any(test, feature = "emulated"))]
pub mod emulated;
pub mod error;
pub mod layer2;
pub mod layers;
pub mod palette;
pub mod port;
pub mod register_file;
pub mod scroll;
pub mod sprite;
pub mod text;
pub mod tilemap;
pub mod ula;
pub mod wait;

pub use error::{RegisterError, Result};
pub use port::RegisterPort;
pub use register_file::RegisterFile;

#[cfg(any(test, feature = "emulated"))]
pub use emulated::EmulatedChip;
