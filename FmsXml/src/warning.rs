//! Non-fatal conversion warnings
//!
//! Malformed input is an [`Error`](crate::Error). Input that is merely
//! inconsistent still converts, and the inconsistency is reported as a
//! [`Warning`] next to the converted value. The library never prints these;
//! presenting them is up to the caller.

use std::fmt;

/// A non-fatal inconsistency found while converting.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The declared string count differs from the number of strings actually present.
    /// The actual count wins.
    StringCountMismatch {
        /// Count found in the header or `<stringcount>`.
        declared: u32,
        /// Number of strings decoded.
        actual: usize,
    },

    /// A `<stringdata>` entry has no `<text>` element; an empty string was used.
    MissingText {
        /// Position of the entry in the string list.
        entry: usize,
    },

    /// A `<stringdata>` entry has no `<props1>` or `<props2>` element; 0 was used.
    MissingProperty {
        /// Position of the entry in the string list.
        entry: usize,
        /// Element name of the missing property.
        property: &'static str,
    },

    /// The header data size does not match the file length.
    DataSizeMismatch {
        /// Value of the header field.
        declared: u32,
        /// File length minus header and footer.
        actual: usize,
    },

    /// An unknown header/footer field differs from the only value seen in real files.
    UnexpectedValue {
        /// Field name as used in the XML metadata.
        field: &'static str,
        /// Value seen in every known sample.
        expected: u32,
        /// Value found.
        found: u32,
    },

    /// A string has non-zero props; every known sample has (0, 0).
    UnexpectedProps {
        /// Position of the string in the table.
        index: usize,
        /// First props word.
        props1: u32,
        /// Second props word.
        props2: u32,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringCountMismatch { declared, actual } => write!(
                f,
                "string count mismatch: {declared} declared, {actual} found; using {actual}"
            ),
            Self::MissingText { entry } => write!(
                f,
                "missing <text> at <stringdata> entry {entry}; assuming an empty string"
            ),
            Self::MissingProperty { entry, property } => write!(
                f,
                "missing <{property}> at <stringdata> entry {entry}; assuming 0"
            ),
            Self::DataSizeMismatch { declared, actual } => write!(
                f,
                "header data size is {declared} but the file holds {actual} data bytes"
            ),
            Self::UnexpectedValue {
                field,
                expected,
                found,
            } => write!(f, "{field} is {found} but {expected} was expected"),
            Self::UnexpectedProps {
                index,
                props1,
                props2,
            } => write!(
                f,
                "props of string {index} are ({props1}, {props2}) but (0, 0) was expected"
            ),
        }
    }
}

/// A converted value together with the warnings raised while producing it.
#[derive(Debug, Clone)]
#[must_use]
pub struct Converted<T> {
    /// The conversion result.
    pub value: T,
    /// Warnings, in the order they were raised.
    pub warnings: Vec<Warning>,
}

impl<T> Converted<T> {
    /// Wrap a value that produced no warnings.
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Wrap a value with its warnings.
    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    /// Whether any warnings were raised.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Transform the value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Converted<U> {
        Converted {
            value: f(self.value),
            warnings: self.warnings,
        }
    }

    /// Discard the warnings.
    pub fn into_inner(self) -> T {
        self.value
    }
}
