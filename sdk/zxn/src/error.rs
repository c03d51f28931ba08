use alloc::string::String;
use core::fmt;

/// Errors reported by the register catalog and the field codecs.
///
/// Every variant is raised synchronously at the offending call and leaves the
/// chip untouched: nothing is written to a [`RegisterPort`](crate::port::RegisterPort)
/// once encoding has failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// No register with this name exists in the catalog.
    UnknownRegister { name: String },
    /// A value does not fit the bit width of the field it is encoded into.
    ValueOutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },
    /// A write was asked of a register the catalog lists as read-only.
    NotWritable { name: &'static str },
    /// A read was asked of a register the catalog lists as write-only.
    NotReadable { name: &'static str },
    /// Bit 0 of a tilemap attribute was interpreted without knowing whether the
    /// tilemap runs in 512-tile mode, or a flag of the other interpretation was set.
    InvalidModeCombination,
}

impl RegisterError {
    pub(crate) const fn out_of_range(field: &'static str, value: u32, max: u32) -> Self {
        RegisterError::ValueOutOfRange { field, value, max }
    }
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRegister { name } => write!(f, "unknown register: {name}"),
            Self::ValueOutOfRange { field, value, max } => {
                write!(f, "value {value} out of range for {field} (max {max})")
            }
            Self::NotWritable { name } => write!(f, "register {name} is read-only"),
            Self::NotReadable { name } => write!(f, "register {name} is write-only"),
            Self::InvalidModeCombination => write!(
                f,
                "tilemap attribute bit 0 needs an explicit ULA-over or 512-tile mode"
            ),
        }
    }
}

impl core::error::Error for RegisterError {}

pub type Result<T> = core::result::Result<T, RegisterError>;
