//! FMS -> XML -> FMS roundtrip verification

use super::fms_to_xml::{fms_bytes_to_xml, to_xml};
use super::xml_to_fms::{from_xml, xml_to_fms_bytes};
use crate::error::Result;
use crate::formats::fms;
use crate::warning::Warning;
use std::fs;
use std::path::Path;

/// Outcome of a roundtrip check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundtripReport {
    pub original_len: usize,
    pub output_len: usize,
    /// CRC-32 of the original bytes
    pub original_crc32: u32,
    /// CRC-32 of the regenerated bytes
    pub output_crc32: u32,
    /// Offset of the first differing byte, or the shorter length if one
    /// buffer is a prefix of the other
    pub first_mismatch: Option<usize>,
    /// Warnings from both conversion legs
    pub warnings: Vec<Warning>,
}

impl RoundtripReport {
    fn compare(original: &[u8], output: &[u8], warnings: Vec<Warning>) -> Self {
        let first_mismatch = original
            .iter()
            .zip(output)
            .position(|(a, b)| a != b)
            .or_else(|| (original.len() != output.len()).then_some(original.len().min(output.len())));

        Self {
            original_len: original.len(),
            output_len: output.len(),
            original_crc32: crc32fast::hash(original),
            output_crc32: crc32fast::hash(output),
            first_mismatch,
            warnings,
        }
    }

    /// Whether the regenerated file is byte-for-byte identical to the original
    #[must_use]
    pub fn is_identical(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

/// Convert .fms bytes to XML and back, and compare the result with the input.
///
/// A mismatch is reported in the returned [`RoundtripReport`], not as an error.
///
/// # Errors
/// Returns an error if either conversion leg fails.
pub fn verify_roundtrip(data: &[u8]) -> Result<RoundtripReport> {
    let xml = fms_bytes_to_xml(data)?;
    let output = xml_to_fms_bytes(&xml.value)?;

    let mut warnings = xml.warnings;
    warnings.extend(output.warnings);

    let report = RoundtripReport::compare(data, &output.value, warnings);
    tracing::debug!(
        "Roundtrip: {} bytes in, {} bytes out, identical: {}",
        report.original_len,
        report.output_len,
        report.is_identical()
    );
    Ok(report)
}

/// File-based roundtrip: write the intermediate XML and regenerated .fms to disk,
/// then compare the regenerated file against the source.
///
/// # Errors
/// Returns an error if reading, writing or either conversion leg fails.
pub fn verify_roundtrip_file<P: AsRef<Path>>(
    source: P,
    xml_dest: P,
    fms_dest: P,
) -> Result<RoundtripReport> {
    tracing::info!(
        "Verifying FMS roundtrip: {:?} → {:?} → {:?}",
        source.as_ref(),
        xml_dest.as_ref(),
        fms_dest.as_ref()
    );

    let original = fs::read(&source)?;
    let document = fms::parse_fms_bytes(&original)?;
    fs::write(&xml_dest, to_xml(&document.value)?)?;

    let content = fs::read_to_string(&xml_dest)?;
    let rebuilt = from_xml(&content)?;
    fms::write_fms(&fms_dest, &rebuilt.value)?;

    let output = fs::read(&fms_dest)?;
    let mut warnings = document.warnings;
    warnings.extend(rebuilt.warnings);

    let report = RoundtripReport::compare(&original, &output, warnings);
    if report.is_identical() {
        tracing::info!("Roundtrip successful, CRC-32 {:08x}", report.original_crc32);
    } else {
        tracing::info!(
            "Roundtrip mismatch: original CRC-32 {:08x}, output CRC-32 {:08x}",
            report.original_crc32,
            report.output_crc32
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::fms::{FmsDocument, StringRecord, serialize_fms};

    #[test]
    fn test_identical() {
        let mut strings = vec![StringRecord::new("Hi"), StringRecord::new("a & b\n")];
        strings.extend(std::iter::repeat_n(StringRecord::default(), 5));
        strings.push(StringRecord::with_props("", 2, 0));
        let data = serialize_fms(&FmsDocument::new(strings)).unwrap();

        let report = verify_roundtrip(&data).unwrap();
        assert!(report.is_identical());
        assert_eq!(report.original_crc32, report.output_crc32);
        assert_eq!(
            report.warnings,
            vec![Warning::UnexpectedProps {
                index: 7,
                props1: 2,
                props2: 0
            }]
        );
    }

    #[test]
    fn test_mismatch_reported() {
        // A wrong data size field is not preserved, since it is recomputed
        let mut data = serialize_fms(&FmsDocument::new(vec![StringRecord::new("x")])).unwrap();
        data[4] ^= 0xFF;

        let report = verify_roundtrip(&data).unwrap();
        assert!(!report.is_identical());
        assert_eq!(report.first_mismatch, Some(4));
        assert_ne!(report.original_crc32, report.output_crc32);
        assert!(matches!(
            report.warnings[0],
            Warning::DataSizeMismatch { .. }
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let report = RoundtripReport::compare(b"abc", b"abcd", Vec::new());
        assert_eq!(report.first_mismatch, Some(3));
    }
}
