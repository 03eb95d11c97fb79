//! .fms string table file format
//!
//! Binary container used by Criware titles to store an ordered list of
//! localized strings. Can be converted to/from XML format.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! 0x00  magic "FMSB"
//! 0x04  data size (file length - 48)
//! 0x08  header size (32)
//! 0x0C  unknown1
//! 0x10  unknown2
//! 0x14  string count N
//! 0x18  unknown3 (always 3)
//! 0x1C  unknown4
//! 0x20  props block: N x (props1: u32, props2: u32)
//!       string table: N x (UTF-8 bytes, 0x00)
//!       zero padding to a 16-byte boundary
//!       footer: magic "FEOC", unknown5, footer size (16), unknown6
//! ```

mod cursor;
mod reader;
mod writer;

pub use cursor::{ByteReader, ByteWriter};
pub use reader::{parse_fms_bytes, read_fms};
pub use writer::{serialize_fms, write_fms};

use serde::Serialize;

use crate::error::Result;

/// "FMSB" header magic
pub const FMS_HEADER_MAGIC: [u8; 4] = *b"FMSB";

/// "FEOC" footer magic
pub const FMS_FOOTER_MAGIC: [u8; 4] = *b"FEOC";

/// Size of the header in bytes
pub const HEADER_SIZE: u32 = 32;

/// Size of the footer in bytes
pub const FOOTER_SIZE: u32 = 16;

/// Size of each props block entry (props1 + props2)
pub const PROPS_ENTRY_SIZE: usize = 8;

/// The file length (up to the end of the footer) is a multiple of this
pub const ALIGNMENT: usize = 16;

/// Header and footer bytes, not counted in the data size field
pub const FRAME_SIZE: usize = (HEADER_SIZE + FOOTER_SIZE) as usize;

/// Header fields that are not implied by the format.
///
/// The magic word and header size are constants and are not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FmsHeader {
    /// Data size as read from a file. Recomputed on write.
    pub data_size: u32,
    /// Header word at 0x0C, 0 in every known file
    pub unknown1: u32,
    /// Header word at 0x10, 0 in every known file
    pub unknown2: u32,
    /// Number of strings. Recomputed on write.
    pub string_count: u32,
    /// Header word at 0x18, 3 in every known file
    pub unknown3: u32,
    /// Header word at 0x1C, 0 in every known file
    pub unknown4: u32,
}

impl Default for FmsHeader {
    fn default() -> Self {
        Self {
            data_size: 0,
            unknown1: 0,
            unknown2: 0,
            string_count: 0,
            unknown3: 3,
            unknown4: 0,
        }
    }
}

/// Footer fields that are not implied by the format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FmsFooter {
    /// Footer word after `FEOC`, 0 in every known file
    pub unknown5: u32,
    /// Last footer word, 0 in every known file
    pub unknown6: u32,
}

/// A single string entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StringRecord {
    /// Opaque per-string value, function unknown
    pub props1: u32,
    /// Opaque per-string value, function unknown
    pub props2: u32,
    /// The string content, without its NUL terminator
    pub text: String,
}

impl StringRecord {
    /// Create a record with zero props
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            props1: 0,
            props2: 0,
            text: text.into(),
        }
    }

    /// Create a record with explicit props
    pub fn with_props(text: impl Into<String>, props1: u32, props2: u32) -> Self {
        Self {
            props1,
            props2,
            text: text.into(),
        }
    }

    /// Empty text and zero props: the only kind of record that may be collapsed into a run
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.text.is_empty() && self.props1 == 0 && self.props2 == 0
    }
}

/// An FMS file in memory.
///
/// String order is significant: game code looks strings up by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FmsDocument {
    pub header: FmsHeader,
    pub strings: Vec<StringRecord>,
    pub footer: FmsFooter,
}

impl FmsDocument {
    /// Create a document with default header/footer values
    #[must_use]
    pub fn new(strings: Vec<StringRecord>) -> Self {
        let header = FmsHeader {
            string_count: strings.len() as u32,
            ..FmsHeader::default()
        };
        Self {
            header,
            strings,
            footer: FmsFooter::default(),
        }
    }

    /// Number of strings
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Serialize the document as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Round `position` up to the next multiple of [`ALIGNMENT`]
#[must_use]
pub fn align_up(position: usize) -> usize {
    position.div_ceil(ALIGNMENT) * ALIGNMENT
}
