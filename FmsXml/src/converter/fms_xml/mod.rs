//! FMS and XML string table conversions
//!
//! Handles conversions between the two representations of an FMS file:
//! - FMS (binary) - Fixed-layout string table read by the game
//! - XML - Human-readable form for editing
//!
//! The XML form is lossless: converting FMS -> XML -> FMS reproduces the
//! original bytes.

mod escape;
mod fms_to_xml;
mod metadata;
mod roundtrip;
mod run_collapse;
mod xml_to_fms;

pub use escape::{escape_text, unescape_text};
pub use fms_to_xml::{
    convert_fms_to_xml, convert_fms_to_xml_with_progress, fms_bytes_to_xml,
    to_xml as fms_to_xml_string, to_xml_with_options,
};
pub use metadata::{MetadataFields, ResolvedMetadata};
pub use roundtrip::{RoundtripReport, verify_roundtrip, verify_roundtrip_file};
pub use run_collapse::{CollapsedEntry, collapse_runs, expand_runs};
pub use xml_to_fms::{
    convert_xml_to_fms, convert_xml_to_fms_with_progress, from_xml as fms_from_xml,
    xml_to_fms_bytes,
};

/// Default number of spaces per indentation level
pub const DEFAULT_INDENT_SIZE: usize = 4;

/// Options for writing FMS documents as XML.
///
/// # Example
///
/// ```
/// use fmsxml::converter::FmsXmlOptions;
///
/// let options = FmsXmlOptions::new()
///     .with_collapse_empty_runs(false)
///     .with_indent_size(2);
/// ```
#[derive(Debug, Clone)]
pub struct FmsXmlOptions {
    /// Write runs of empty, zero-props strings as one entry with a
    /// `<nullrepeatcount>`. Default: true
    pub collapse_empty_runs: bool,

    /// Spaces per indentation level. Default: 4
    pub indent_size: usize,
}

impl FmsXmlOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collapse_empty_runs: true,
            indent_size: DEFAULT_INDENT_SIZE,
        }
    }

    #[must_use]
    pub fn with_collapse_empty_runs(mut self, collapse: bool) -> Self {
        self.collapse_empty_runs = collapse;
        self
    }

    #[must_use]
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }
}

impl Default for FmsXmlOptions {
    fn default() -> Self {
        Self::new()
    }
}
