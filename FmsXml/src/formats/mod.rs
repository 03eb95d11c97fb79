//! File format handlers
//!
//! Only the binary side lives here; the XML representation is produced by
//! [`crate::converter`].

pub mod fms;

// Re-export main document types
pub use fms::{
    FmsDocument, FmsFooter, FmsHeader, StringRecord, parse_fms_bytes, read_fms, serialize_fms,
    write_fms,
};
