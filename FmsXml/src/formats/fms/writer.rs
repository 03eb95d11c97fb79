//! `.fms` file writing

use super::{
    ByteWriter, FMS_FOOTER_MAGIC, FMS_HEADER_MAGIC, FOOTER_SIZE, FRAME_SIZE, FmsDocument,
    HEADER_SIZE, PROPS_ENTRY_SIZE,
};
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Offset of the data size field, patched once the length is known
const DATA_SIZE_OFFSET: usize = 4;

/// Write a .fms file to disk
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_fms<P: AsRef<Path>>(path: P, document: &FmsDocument) -> Result<()> {
    let bytes = serialize_fms(document)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a document to .fms bytes.
///
/// The string count and data size are derived from the document contents;
/// the values stored in `document.header` are ignored.
///
/// # Errors
/// Returns [`Error::ZeroStringCount`] for a document without strings,
/// [`Error::TooManyStrings`] if the count does not fit in 32 bits,
/// [`Error::DataTooLarge`] if the data size does not fit in 32 bits and
/// [`Error::InvalidStringContent`] if a string contains a NUL character.
///
/// [`Error::ZeroStringCount`]: crate::Error::ZeroStringCount
/// [`Error::TooManyStrings`]: crate::Error::TooManyStrings
/// [`Error::DataTooLarge`]: crate::Error::DataTooLarge
/// [`Error::InvalidStringContent`]: crate::Error::InvalidStringContent
pub fn serialize_fms(document: &FmsDocument) -> Result<Vec<u8>> {
    if document.strings.is_empty() {
        return Err(Error::ZeroStringCount);
    }
    let string_count = u32::try_from(document.strings.len())
        .map_err(|_| Error::TooManyStrings(document.strings.len()))?;

    let table_size: usize = document.strings.iter().map(|s| s.text.len() + 1).sum();
    let capacity = FRAME_SIZE + PROPS_ENTRY_SIZE * document.strings.len() + table_size + 16;
    let mut writer = ByteWriter::with_capacity(capacity);

    // Header
    let header = &document.header;
    writer.write_magic(FMS_HEADER_MAGIC)?;
    writer.write_u32_le(0)?; // data size, patched below
    writer.write_u32_le(HEADER_SIZE)?;
    writer.write_u32_le(header.unknown1)?;
    writer.write_u32_le(header.unknown2)?;
    writer.write_u32_le(string_count)?;
    writer.write_u32_le(header.unknown3)?;
    writer.write_u32_le(header.unknown4)?;

    // Props block
    for record in &document.strings {
        writer.write_u32_le(record.props1)?;
        writer.write_u32_le(record.props2)?;
    }

    // String table
    for (index, record) in document.strings.iter().enumerate() {
        writer.write_null_terminated_utf8(&record.text, index)?;
    }

    writer.align_pad_to_16();

    // Footer
    writer.write_magic(FMS_FOOTER_MAGIC)?;
    writer.write_u32_le(document.footer.unknown5)?;
    writer.write_u32_le(FOOTER_SIZE)?;
    writer.write_u32_le(document.footer.unknown6)?;

    let data_size = data_size_field(writer.position() - FRAME_SIZE)?;
    writer.patch_u32_le(DATA_SIZE_OFFSET, data_size);

    tracing::debug!(
        "Serialized {} FMS strings into {} bytes",
        string_count,
        writer.position()
    );

    Ok(writer.into_inner())
}

fn data_size_field(data_size: usize) -> Result<u32> {
    u32::try_from(data_size).map_err(|_| Error::DataTooLarge(data_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::fms::{FmsFooter, FmsHeader, StringRecord, parse_fms_bytes};

    #[test]
    fn test_layout() {
        let doc = FmsDocument::new(vec![StringRecord::new("Hi"), StringRecord::new("")]);
        let bytes = serialize_fms(&doc).unwrap();

        // 32 header + 16 props + 4 strings = 52, padded to 64, + 16 footer
        assert_eq!(bytes.len(), 80);
        assert_eq!(&bytes[0..4], b"FMSB");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 32);
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 32);
        assert_eq!(u32::from_le_bytes(bytes[0x14..0x18].try_into().unwrap()), 2);
        assert_eq!(u32::from_le_bytes(bytes[0x18..0x1C].try_into().unwrap()), 3);
        assert_eq!(&bytes[48..52], b"Hi\0\0");
        assert!(bytes[52..64].iter().all(|&b| b == 0));
        assert_eq!(&bytes[64..68], b"FEOC");
        assert_eq!(u32::from_le_bytes(bytes[72..76].try_into().unwrap()), 16);
    }

    #[test]
    fn test_recomputes_derived_fields() {
        let mut doc = FmsDocument::new(vec![StringRecord::new("abc")]);
        doc.header.string_count = 99;
        doc.header.data_size = 12345;
        let bytes = serialize_fms(&doc).unwrap();
        assert_eq!(u32::from_le_bytes(bytes[0x14..0x18].try_into().unwrap()), 1);
        assert_eq!(
            u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize,
            bytes.len() - 48
        );
    }

    #[test]
    fn test_padding_invariant() {
        for len in 0..40 {
            let doc = FmsDocument::new(vec![StringRecord::new("x".repeat(len))]);
            let bytes = serialize_fms(&doc).unwrap();
            assert_eq!(bytes.len() % 16, 0, "length {len}");
            let data_size = u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize;
            assert_eq!(data_size, bytes.len() - 48);
        }
    }

    #[test]
    fn test_unknowns_carried() {
        let doc = FmsDocument {
            header: FmsHeader {
                unknown1: 1,
                unknown2: 2,
                unknown3: 4,
                unknown4: 5,
                ..FmsHeader::default()
            },
            strings: vec![StringRecord::with_props("a", 7, 8)],
            footer: FmsFooter {
                unknown5: 9,
                unknown6: 10,
            },
        };
        let bytes = serialize_fms(&doc).unwrap();
        let parsed = parse_fms_bytes(&bytes).unwrap().value;
        assert_eq!(parsed.header.unknown1, 1);
        assert_eq!(parsed.header.unknown4, 5);
        assert_eq!(parsed.footer, doc.footer);
        assert_eq!(parsed.strings, doc.strings);
    }

    #[test]
    fn test_rejects_empty_document() {
        assert!(matches!(
            serialize_fms(&FmsDocument::default()),
            Err(Error::ZeroStringCount)
        ));
    }

    #[test]
    fn test_rejects_embedded_nul() {
        let doc = FmsDocument::new(vec![StringRecord::new("ok"), StringRecord::new("a\0b")]);
        assert!(matches!(
            serialize_fms(&doc),
            Err(Error::InvalidStringContent { index: 1 })
        ));
    }

    #[test]
    fn test_deterministic() {
        let doc = FmsDocument::new(vec![StringRecord::new("same"), StringRecord::default()]);
        assert_eq!(serialize_fms(&doc).unwrap(), serialize_fms(&doc).unwrap());
    }

    #[test]
    fn test_data_size_overflow() {
        assert_eq!(data_size_field(32).unwrap(), 32);
        let too_large = u32::MAX as usize + 1;
        assert!(matches!(
            data_size_field(too_large),
            Err(Error::DataTooLarge(size)) if size == too_large
        ));
    }
}
