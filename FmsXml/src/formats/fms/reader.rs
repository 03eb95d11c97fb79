//! `.fms` file reading and parsing

use super::{
    ByteReader, FMS_FOOTER_MAGIC, FMS_HEADER_MAGIC, FOOTER_SIZE, FRAME_SIZE, FmsDocument,
    FmsFooter, FmsHeader, HEADER_SIZE, PROPS_ENTRY_SIZE, StringRecord,
};
use crate::error::{Error, Result};
use crate::warning::{Converted, Warning};
use std::fs;
use std::path::Path;

/// Read a .fms file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, or any
/// format error from [`parse_fms_bytes`].
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_fms<P: AsRef<Path>>(path: P) -> Result<Converted<FmsDocument>> {
    let buffer = fs::read(path)?;
    parse_fms_bytes(&buffer)
}

/// Parse .fms data from bytes
///
/// # Errors
///
/// Returns [`Error::BadMagic`] / [`Error::BadHeaderSize`] for an invalid header,
/// [`Error::ZeroStringCount`] if no strings are declared,
/// [`Error::Truncated`] if the data ends early, [`Error::InvalidUtf8`],
/// [`Error::NonZeroPadding`], [`Error::BadFooterMagic`] / [`Error::BadFooterSize`]
/// for an invalid footer and [`Error::TrailingData`] if bytes follow the footer.
///
/// [`Error::BadMagic`]: crate::Error::BadMagic
/// [`Error::BadHeaderSize`]: crate::Error::BadHeaderSize
/// [`Error::ZeroStringCount`]: crate::Error::ZeroStringCount
/// [`Error::Truncated`]: crate::Error::Truncated
/// [`Error::InvalidUtf8`]: crate::Error::InvalidUtf8
/// [`Error::NonZeroPadding`]: crate::Error::NonZeroPadding
/// [`Error::BadFooterMagic`]: crate::Error::BadFooterMagic
/// [`Error::BadFooterSize`]: crate::Error::BadFooterSize
/// [`Error::TrailingData`]: crate::Error::TrailingData
pub fn parse_fms_bytes(data: &[u8]) -> Result<Converted<FmsDocument>> {
    let mut reader = ByteReader::new(data);
    let mut warnings = Vec::new();

    // Header (32 bytes)
    let magic = reader.read_magic()?;
    if magic != FMS_HEADER_MAGIC {
        return Err(Error::BadMagic {
            found: String::from_utf8_lossy(&magic).into_owned(),
        });
    }

    let data_size = reader.read_u32_le()?;

    let header_size = reader.read_u32_le()?;
    if header_size != HEADER_SIZE {
        return Err(Error::BadHeaderSize(header_size));
    }

    let unknown1 = reader.read_u32_le()?;
    let unknown2 = reader.read_u32_le()?;
    let string_count = reader.read_u32_le()?;
    let unknown3 = reader.read_u32_le()?;
    let unknown4 = reader.read_u32_le()?;

    if string_count == 0 {
        return Err(Error::ZeroStringCount);
    }

    let actual_data_size = data.len().saturating_sub(FRAME_SIZE);
    if data_size as usize != actual_data_size {
        warnings.push(Warning::DataSizeMismatch {
            declared: data_size,
            actual: actual_data_size,
        });
    }

    for (field, expected, found) in [
        ("unknown1", 0, unknown1),
        ("unknown2", 0, unknown2),
        ("unknown3", 3, unknown3),
        ("unknown4", 0, unknown4),
    ] {
        if found != expected {
            warnings.push(Warning::UnexpectedValue {
                field,
                expected,
                found,
            });
        }
    }

    // Props block: two parallel arrays indexed by string position
    let count = string_count as usize;
    let props_len = count
        .checked_mul(PROPS_ENTRY_SIZE)
        .ok_or(Error::TooManyStrings(count))?;
    if reader.remaining() < props_len {
        return Err(Error::Truncated {
            offset: reader.position(),
            needed: props_len - reader.remaining(),
        });
    }

    let mut props1 = Vec::with_capacity(count);
    let mut props2 = Vec::with_capacity(count);
    for _ in 0..count {
        props1.push(reader.read_u32_le()?);
        props2.push(reader.read_u32_le()?);
    }

    // String table, bounded by the footer at the end of the buffer
    let table_end = data.len().saturating_sub(FOOTER_SIZE as usize);
    let mut texts = Vec::with_capacity(count);
    while texts.len() < count && reader.position() < table_end {
        let index = texts.len();
        texts.push(reader.read_null_terminated_utf8(table_end, index)?);
    }

    if texts.len() != count {
        warnings.push(Warning::StringCountMismatch {
            declared: string_count,
            actual: texts.len(),
        });
    }

    for (index, (&first, &second)) in props1.iter().zip(&props2).enumerate().take(texts.len()) {
        if first != 0 || second != 0 {
            warnings.push(Warning::UnexpectedProps {
                index,
                props1: first,
                props2: second,
            });
        }
    }

    let strings: Vec<StringRecord> = texts
        .into_iter()
        .zip(props1.into_iter().zip(props2))
        .map(|(text, (props1, props2))| StringRecord {
            props1,
            props2,
            text,
        })
        .collect();

    tracing::debug!(
        "Read {} FMS strings, string table ends at {:#x}",
        strings.len(),
        reader.position()
    );

    reader.skip_alignment_padding()?;

    // Footer (16 bytes)
    let footer_magic = reader.read_magic()?;
    if footer_magic != FMS_FOOTER_MAGIC {
        return Err(Error::BadFooterMagic {
            found: String::from_utf8_lossy(&footer_magic).into_owned(),
        });
    }

    let unknown5 = reader.read_u32_le()?;

    let footer_size = reader.read_u32_le()?;
    if footer_size != FOOTER_SIZE {
        return Err(Error::BadFooterSize(footer_size));
    }

    let unknown6 = reader.read_u32_le()?;

    if reader.position() != data.len() {
        return Err(Error::TrailingData {
            expected: reader.position(),
            actual: data.len(),
        });
    }

    for (field, found) in [("unknown5", unknown5), ("unknown6", unknown6)] {
        if found != 0 {
            warnings.push(Warning::UnexpectedValue {
                field,
                expected: 0,
                found,
            });
        }
    }

    let header = FmsHeader {
        data_size,
        unknown1,
        unknown2,
        string_count: strings.len() as u32,
        unknown3,
        unknown4,
    };

    Ok(Converted::with_warnings(
        FmsDocument {
            header,
            strings,
            footer: FmsFooter { unknown5, unknown6 },
        },
        warnings,
    ))
}
