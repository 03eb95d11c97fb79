//! `<metadata>` fields and their defaults
//!
//! Every metadata element is optional. Absent fields take the only value
//! observed in real files; present fields that the format fixes (magic words
//! and sizes) must hold exactly that value.

use crate::error::{Error, Result};
use crate::formats::fms::{
    FMS_FOOTER_MAGIC, FMS_HEADER_MAGIC, FOOTER_SIZE, FmsFooter, FmsHeader, HEADER_SIZE,
};

/// Resolution rule for a numeric metadata field
struct FieldRule {
    name: &'static str,
    default: u32,
}

const UNKNOWN1: FieldRule = FieldRule { name: "unknown1", default: 0 };
const UNKNOWN2: FieldRule = FieldRule { name: "unknown2", default: 0 };
const UNKNOWN3: FieldRule = FieldRule { name: "unknown3", default: 3 };
const UNKNOWN4: FieldRule = FieldRule { name: "unknown4", default: 0 };
const UNKNOWN5: FieldRule = FieldRule { name: "unknown5", default: 0 };
const UNKNOWN6: FieldRule = FieldRule { name: "unknown6", default: 0 };

impl FieldRule {
    fn resolve(&self, raw: Option<&str>) -> Result<u32> {
        raw.map_or(Ok(self.default), |value| parse_u32(self.name, value))
    }
}

/// Parse a numeric element's text, ignoring surrounding whitespace
pub(crate) fn parse_u32(field: &str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| Error::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Raw `<metadata>` element text, as found in the XML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFields {
    pub header_magic: Option<String>,
    pub header_size: Option<String>,
    pub unknown1: Option<String>,
    pub unknown2: Option<String>,
    pub string_count: Option<String>,
    pub unknown3: Option<String>,
    pub unknown4: Option<String>,
    pub footer_magic: Option<String>,
    pub unknown5: Option<String>,
    pub footer_size: Option<String>,
    pub unknown6: Option<String>,
}

/// Header/footer values after defaults and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub header: FmsHeader,
    pub footer: FmsFooter,
    /// `<stringcount>`, if it was given
    pub declared_count: Option<u32>,
}

impl MetadataFields {
    /// Store the text of a metadata child element.
    ///
    /// Returns `false` for element names that are not metadata fields.
    /// `datasize` is accepted and dropped, since it is always recomputed.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "headermagicword" => &mut self.header_magic,
            "headersize" => &mut self.header_size,
            "unknown1" => &mut self.unknown1,
            "unknown2" => &mut self.unknown2,
            "stringcount" => &mut self.string_count,
            "unknown3" => &mut self.unknown3,
            "unknown4" => &mut self.unknown4,
            "footermagicword" => &mut self.footer_magic,
            "unknown5" => &mut self.unknown5,
            "footersize" => &mut self.footer_size,
            "unknown6" => &mut self.unknown6,
            "datasize" => return true,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Apply defaults and validate fixed fields.
    ///
    /// # Errors
    /// Returns [`Error::BadMagic`], [`Error::BadHeaderSize`],
    /// [`Error::BadFooterMagic`] or [`Error::BadFooterSize`] for a fixed field with
    /// the wrong value, [`Error::ZeroStringCount`] for `<stringcount>0</stringcount>`
    /// and [`Error::InvalidNumber`] for unparsable numbers.
    ///
    /// [`Error::BadMagic`]: crate::Error::BadMagic
    /// [`Error::BadHeaderSize`]: crate::Error::BadHeaderSize
    /// [`Error::BadFooterMagic`]: crate::Error::BadFooterMagic
    /// [`Error::BadFooterSize`]: crate::Error::BadFooterSize
    /// [`Error::ZeroStringCount`]: crate::Error::ZeroStringCount
    /// [`Error::InvalidNumber`]: crate::Error::InvalidNumber
    pub fn resolve(&self) -> Result<ResolvedMetadata> {
        if let Some(magic) = &self.header_magic {
            if magic.as_bytes() != FMS_HEADER_MAGIC {
                return Err(Error::BadMagic {
                    found: magic.clone(),
                });
            }
        }

        if let Some(size) = &self.header_size {
            let size = parse_u32("headersize", size)?;
            if size != HEADER_SIZE {
                return Err(Error::BadHeaderSize(size));
            }
        }

        let declared_count = self
            .string_count
            .as_deref()
            .map(|count| parse_u32("stringcount", count))
            .transpose()?;
        if declared_count == Some(0) {
            return Err(Error::ZeroStringCount);
        }

        if let Some(magic) = &self.footer_magic {
            if magic.as_bytes() != FMS_FOOTER_MAGIC {
                return Err(Error::BadFooterMagic {
                    found: magic.clone(),
                });
            }
        }

        if let Some(size) = &self.footer_size {
            let size = parse_u32("footersize", size)?;
            if size != FOOTER_SIZE {
                return Err(Error::BadFooterSize(size));
            }
        }

        let header = FmsHeader {
            data_size: 0,
            unknown1: UNKNOWN1.resolve(self.unknown1.as_deref())?,
            unknown2: UNKNOWN2.resolve(self.unknown2.as_deref())?,
            string_count: declared_count.unwrap_or(0),
            unknown3: UNKNOWN3.resolve(self.unknown3.as_deref())?,
            unknown4: UNKNOWN4.resolve(self.unknown4.as_deref())?,
        };
        let footer = FmsFooter {
            unknown5: UNKNOWN5.resolve(self.unknown5.as_deref())?,
            unknown6: UNKNOWN6.resolve(self.unknown6.as_deref())?,
        };

        Ok(ResolvedMetadata {
            header,
            footer,
            declared_count,
        })
    }
}
