//! Format conversion utilities
//!
//! This module handles conversions between the binary FMS format and its
//! human-editable XML representation:
//! - FMS (binary) -> XML
//! - XML -> FMS (binary)
//! - FMS -> XML -> FMS roundtrip verification

pub mod fms_xml;

/// Stage of a file conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertPhase {
    ReadingSource,
    Parsing,
    Converting,
    WritingOutput,
    Verifying,
    Complete,
}

impl ConvertPhase {
    /// Short label for display
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ReadingSource => "Reading",
            Self::Parsing => "Parsing",
            Self::Converting => "Converting",
            Self::WritingOutput => "Writing",
            Self::Verifying => "Verifying",
            Self::Complete => "Complete",
        }
    }
}

/// Progress update passed to conversion callbacks.
#[derive(Debug, Clone)]
pub struct ConvertProgress {
    pub phase: ConvertPhase,
    /// Current step (1-based)
    pub current: usize,
    /// Total number of steps
    pub total: usize,
    /// Description of the current step, if any
    pub message: Option<String>,
}

impl ConvertProgress {
    #[must_use]
    pub fn new(phase: ConvertPhase, current: usize, total: usize) -> Self {
        Self {
            phase,
            current,
            total,
            message: None,
        }
    }

    #[must_use]
    pub fn with_file(
        phase: ConvertPhase,
        current: usize,
        total: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            current,
            total,
            message: Some(message.into()),
        }
    }
}

/// Progress callback type for conversion operations.
pub type ConvertProgressCallback<'a> = &'a dyn Fn(&ConvertProgress);

// FMS/XML conversion exports
pub use fms_xml::{
    FmsXmlOptions, RoundtripReport, convert_fms_to_xml, convert_fms_to_xml_with_progress,
    convert_xml_to_fms, convert_xml_to_fms_with_progress, fms_bytes_to_xml, fms_from_xml,
    fms_to_xml_string, verify_roundtrip, verify_roundtrip_file, xml_to_fms_bytes,
};
