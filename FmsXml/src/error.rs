//! Error types for `FmsXml`

use thiserror::Error;

/// The error type for `FmsXml` operations.
///
/// Every fatal format violation has its own variant so callers can match on
/// the exact invariant that was broken.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== FMS Binary Errors ====================
    /// The buffer ended before a field or string could be read completely.
    #[error("truncated FMS data: needed {needed} more byte(s) at offset {offset:#x}")]
    Truncated {
        /// Offset at which the read was attempted.
        offset: usize,
        /// Number of bytes missing.
        needed: usize,
    },

    /// The header magic word is not `FMSB`.
    #[error("invalid FMS header magic: expected FMSB, found {found:?}")]
    BadMagic {
        /// The magic word that was found.
        found: String,
    },

    /// The header size field is not 32.
    #[error("unsupported FMS header size: {0} (expected 32)")]
    BadHeaderSize(u32),

    /// The string count is zero.
    #[error("FMS string count is zero; a file must contain at least one string")]
    ZeroStringCount,

    /// The footer magic word is not `FEOC`.
    #[error("invalid FMS footer magic: expected FEOC, found {found:?}")]
    BadFooterMagic {
        /// The magic word that was found.
        found: String,
    },

    /// The footer size field is not 16.
    #[error("unsupported FMS footer size: {0} (expected 16)")]
    BadFooterSize(u32),

    /// A string table entry is not valid UTF-8.
    #[error("string {index} is not valid UTF-8")]
    InvalidUtf8 {
        /// Position of the string in the table.
        index: usize,
    },

    /// A byte inside the alignment padding is not zero.
    #[error("non-zero padding byte at offset {offset:#x}")]
    NonZeroPadding {
        /// Offset of the offending byte.
        offset: usize,
    },

    /// Bytes remain after the footer.
    #[error("unexpected data after footer: file ends at {actual:#x}, footer ends at {expected:#x}")]
    TrailingData {
        /// Offset at which the footer ended.
        expected: usize,
        /// Actual length of the buffer.
        actual: usize,
    },

    /// A string to be written contains an embedded NUL character.
    #[error("string {index} contains an embedded NUL character")]
    InvalidStringContent {
        /// Position of the string in the document.
        index: usize,
    },

    /// The document holds more strings than the count field can express.
    #[error("too many strings for an FMS file: {0}")]
    TooManyStrings(usize),

    /// The serialized data section does not fit in the 32-bit data size field.
    #[error("FMS data section too large: {0} bytes")]
    DataTooLarge(usize),

    /// Memory for the expanded string list could not be reserved.
    #[error("cannot allocate {records} string records")]
    AllocationFailed {
        /// Number of records that were requested.
        records: usize,
    },

    // ==================== Structured Text Errors ====================
    /// A `nullrepeatcount` of zero.
    #[error("stringdata entry {entry}: nullrepeatcount must be at least 1")]
    InvalidRepeatCount {
        /// Position of the entry in the string list.
        entry: usize,
    },

    /// A `nullrepeatcount` on an entry whose text is not empty.
    #[error("stringdata entry {entry}: nullrepeatcount is only allowed on empty text")]
    NullRepeatOnNonEmptyText {
        /// Position of the entry in the string list.
        entry: usize,
    },

    /// A `nullrepeatcount` on an entry with non-zero props.
    #[error("stringdata entry {entry}: nullrepeatcount is only allowed when props1 and props2 are 0")]
    NullRepeatWithProps {
        /// Position of the entry in the string list.
        entry: usize,
    },

    /// Text containing a carriage return.
    #[error("string {index} contains a carriage return; only \\n line breaks are supported")]
    UnsupportedCarriageReturn {
        /// Position of the string (record index or entry index).
        index: usize,
    },

    /// A required element is missing from the XML tree.
    #[error("XML is missing the <{0}> element")]
    MissingElement(&'static str),

    /// An element nested inside a field element such as `<text>`.
    #[error("unexpected element <{found}> inside <{parent}>")]
    UnexpectedElement {
        /// The field element that contains it.
        parent: String,
        /// Name of the nested element.
        found: String,
    },

    /// The XML root element is not `<fms>`.
    #[error("unexpected XML root element <{found}>, expected <fms>")]
    UnexpectedRootElement {
        /// The root element name that was found.
        found: String,
    },

    /// A numeric field could not be parsed as an unsigned 32-bit integer.
    #[error("invalid number in <{field}>: {value:?}")]
    InvalidNumber {
        /// Name of the element.
        field: String,
        /// The text that failed to parse.
        value: String,
    },

    // ==================== Parsing Errors ====================
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// UTF-8 error while reading XML text.
    #[error("UTF-8 error in XML text: {0}")]
    XmlUtf8Error(#[from] std::str::Utf8Error),
}

/// A specialized Result type for `FmsXml` operations.
pub type Result<T> = std::result::Result<T, Error>;
