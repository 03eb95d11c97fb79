//! # FmsXml
//!
//! A pure-Rust library for converting Criware `.fms` string tables to an
//! editable XML form and back, bit-for-bit.
//!
//! ## Supported Formats
//!
//! - **FMS** - Binary string table (header, per-string props block, NUL-terminated
//!   UTF-8 strings, padded footer)
//! - **XML** - Human-readable representation with runs of empty strings collapsed
//!
//! ## Quick Start
//!
//! ### Converting Files
//!
//! ```no_run
//! use fmsxml::converter::{convert_fms_to_xml, convert_xml_to_fms};
//!
//! let converted = convert_fms_to_xml("strings.fms", "strings.xml")?;
//! for warning in &converted.warnings {
//!     eprintln!("warning: {warning}");
//! }
//!
//! // ...edit strings.xml...
//! convert_xml_to_fms("strings.xml", "strings.fms")?;
//! # Ok::<(), fmsxml::Error>(())
//! ```
//!
//! ### Checking a Roundtrip
//!
//! ```no_run
//! use fmsxml::converter::verify_roundtrip;
//!
//! let data = std::fs::read("strings.fms")?;
//! let report = verify_roundtrip(&data)?;
//! assert!(report.is_identical());
//! # Ok::<(), fmsxml::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `fmsxml` command-line binary

pub mod converter;
pub mod error;
pub mod formats;
pub mod warning;

// Re-exports for convenience
pub use error::{Error, Result};
pub use warning::{Converted, Warning};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::warning::{Converted, Warning};

    pub use crate::formats::fms::{FmsDocument, FmsFooter, FmsHeader, StringRecord};
    pub use crate::formats::fms::{parse_fms_bytes, read_fms, serialize_fms, write_fms};

    pub use crate::converter::{
        FmsXmlOptions, RoundtripReport, convert_fms_to_xml, convert_xml_to_fms, fms_bytes_to_xml,
        fms_from_xml, fms_to_xml_string, verify_roundtrip, verify_roundtrip_file, xml_to_fms_bytes,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
