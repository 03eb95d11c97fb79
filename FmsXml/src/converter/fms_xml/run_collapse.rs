//! Collapsing of empty string runs
//!
//! Real FMS files often contain long stretches of empty strings. In the XML
//! form, a run of consecutive empty, zero-props records is written as one
//! `<stringdata>` carrying `<nullrepeatcount>`. This only affects the XML; the
//! binary layout always holds every record.

use crate::error::{Error, Result};
use crate::formats::fms::StringRecord;

/// One `<stringdata>` entry of the XML string list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedEntry {
    /// Position of the first record this entry stands for
    pub index: usize,
    pub record: StringRecord,
    /// Set for an entry standing for `n` empty, zero-props records.
    /// Absent means a single record.
    pub null_repeat_count: Option<u32>,
}

impl CollapsedEntry {
    /// Number of records this entry expands to
    #[must_use]
    pub fn span(&self) -> usize {
        self.null_repeat_count.map_or(1, |count| count as usize)
    }
}

/// Collapse runs of null records (see [`StringRecord::is_null`]).
///
/// Runs of two or more records become a single entry with a repeat count;
/// a lone null record is emitted like any other record.
#[must_use]
pub fn collapse_runs(records: &[StringRecord]) -> Vec<CollapsedEntry> {
    let mut entries = Vec::with_capacity(records.len());
    let mut index = 0;

    while index < records.len() {
        let record = &records[index];
        let run = if record.is_null() {
            records[index..]
                .iter()
                .take(u32::MAX as usize)
                .take_while(|r| r.is_null())
                .count()
        } else {
            1
        };

        entries.push(CollapsedEntry {
            index,
            record: record.clone(),
            null_repeat_count: (run > 1).then_some(run as u32),
        });
        index += run;
    }

    tracing::debug!(
        "Collapsed {} records into {} entries",
        records.len(),
        entries.len()
    );
    entries
}

/// Write every record as its own entry
#[must_use]
pub fn uncollapsed(records: &[StringRecord]) -> Vec<CollapsedEntry> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| CollapsedEntry {
            index,
            record: record.clone(),
            null_repeat_count: None,
        })
        .collect()
}

/// Expand entries back into records, preserving order.
///
/// # Errors
/// Returns [`Error::InvalidRepeatCount`] for a count of 0,
/// [`Error::NullRepeatOnNonEmptyText`] when a counted entry has text,
/// [`Error::NullRepeatWithProps`] when a counted entry has non-zero props,
/// [`Error::TooManyStrings`] when the expanded list would exceed `u32::MAX`
/// records and [`Error::AllocationFailed`] when it cannot be allocated.
///
/// [`Error::InvalidRepeatCount`]: crate::Error::InvalidRepeatCount
/// [`Error::NullRepeatOnNonEmptyText`]: crate::Error::NullRepeatOnNonEmptyText
/// [`Error::NullRepeatWithProps`]: crate::Error::NullRepeatWithProps
/// [`Error::TooManyStrings`]: crate::Error::TooManyStrings
/// [`Error::AllocationFailed`]: crate::Error::AllocationFailed
pub fn expand_runs(entries: Vec<CollapsedEntry>) -> Result<Vec<StringRecord>> {
    let total = expanded_len(&entries)?;
    let mut records = Vec::new();
    records
        .try_reserve_exact(total)
        .map_err(|_| Error::AllocationFailed { records: total })?;

    for (entry_index, entry) in entries.into_iter().enumerate() {
        let Some(count) = entry.null_repeat_count else {
            records.push(entry.record);
            continue;
        };

        if count == 0 {
            return Err(Error::InvalidRepeatCount { entry: entry_index });
        }
        if !entry.record.text.is_empty() {
            return Err(Error::NullRepeatOnNonEmptyText { entry: entry_index });
        }
        if entry.record.props1 != 0 || entry.record.props2 != 0 {
            return Err(Error::NullRepeatWithProps { entry: entry_index });
        }

        records.extend(std::iter::repeat_n(StringRecord::default(), count as usize));
    }

    Ok(records)
}

/// Number of records `entries` expand to, capped at `u32::MAX`
fn expanded_len(entries: &[CollapsedEntry]) -> Result<usize> {
    let mut total: u64 = 0;
    for entry in entries {
        total = total.saturating_add(u64::from(entry.null_repeat_count.unwrap_or(1)));
        if total > u64::from(u32::MAX) {
            return Err(Error::TooManyStrings(usize::try_from(total).unwrap_or(usize::MAX)));
        }
    }
    usize::try_from(total).map_err(|_| Error::TooManyStrings(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(record: StringRecord, null_repeat_count: Option<u32>) -> CollapsedEntry {
        CollapsedEntry {
            index: 0,
            record,
            null_repeat_count,
        }
    }

    #[test]
    fn test_collapse_runs() {
        let records = vec![
            StringRecord::new("Alain"),
            StringRecord::default(),
            StringRecord::default(),
            StringRecord::default(),
            StringRecord::new("Brigitte"),
            StringRecord::default(),
        ];
        let entries = collapse_runs(&records);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].null_repeat_count, Some(3));
        assert_eq!(entries[2].index, 4);
        assert_eq!(entries[2].record.text, "Brigitte");
        // A single empty record is not marked
        assert_eq!(entries[3].index, 5);
        assert_eq!(entries[3].null_repeat_count, None);
    }

    #[test]
    fn test_props_break_runs() {
        let records = vec![
            StringRecord::default(),
            StringRecord::with_props("", 1, 0),
            StringRecord::default(),
            StringRecord::default(),
        ];
        let entries = collapse_runs(&records);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].null_repeat_count, None);
        assert_eq!(entries[1].record.props1, 1);
        assert_eq!(entries[2].null_repeat_count, Some(2));
    }

    #[test]
    fn test_expand_repeat() {
        let records = expand_runs(vec![
            entry(StringRecord::new("Alain"), None),
            entry(StringRecord::default(), Some(3)),
        ])
        .unwrap();
        assert_eq!(
            records,
            vec![
                StringRecord::new("Alain"),
                StringRecord::default(),
                StringRecord::default(),
                StringRecord::default(),
            ]
        );
    }

    #[test]
    fn test_count_of_one_equals_absent() {
        let with_count = expand_runs(vec![entry(StringRecord::default(), Some(1))]).unwrap();
        let without = expand_runs(vec![entry(StringRecord::default(), None)]).unwrap();
        assert_eq!(with_count, without);
    }

    #[test]
    fn test_inverse_and_idempotent() {
        let records = vec![
            StringRecord::default(),
            StringRecord::default(),
            StringRecord::new("x"),
            StringRecord::with_props("", 0, 5),
            StringRecord::default(),
            StringRecord::new("y"),
            StringRecord::default(),
            StringRecord::default(),
            StringRecord::default(),
        ];
        let collapsed = collapse_runs(&records);
        let expanded = expand_runs(collapsed.clone()).unwrap();
        assert_eq!(expanded, records);
        assert_eq!(collapse_runs(&expanded), collapsed);
    }

    #[test]
    fn test_uncollapsed_expands_identically() {
        let records = vec![StringRecord::default(), StringRecord::default()];
        let entries = uncollapsed(&records);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert_eq!(expand_runs(entries).unwrap(), records);
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(matches!(
            expand_runs(vec![
                entry(StringRecord::new("a"), None),
                entry(StringRecord::default(), Some(0)),
            ]),
            Err(Error::InvalidRepeatCount { entry: 1 })
        ));
    }

    #[test]
    fn test_count_on_text_rejected() {
        assert!(matches!(
            expand_runs(vec![entry(StringRecord::new("a"), Some(2))]),
            Err(Error::NullRepeatOnNonEmptyText { entry: 0 })
        ));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let huge = || entry(StringRecord::default(), Some(3_000_000_000));
        assert!(matches!(
            expand_runs(vec![huge(), huge()]),
            Err(Error::TooManyStrings(_))
        ));
    }

    #[test]
    fn test_total_at_limit_is_counted() {
        let entries = vec![
            entry(StringRecord::default(), Some(u32::MAX)),
            entry(StringRecord::new("a"), None),
        ];
        assert!(matches!(
            expanded_len(&entries),
            Err(Error::TooManyStrings(_))
        ));
        assert_eq!(
            expanded_len(&[entry(StringRecord::default(), Some(u32::MAX))]).unwrap(),
            u32::MAX as usize
        );
    }

    #[test]
    fn test_count_with_props_rejected() {
        assert!(matches!(
            expand_runs(vec![entry(StringRecord::with_props("", 0, 1), Some(2))]),
            Err(Error::NullRepeatWithProps { entry: 0 })
        ));
    }
}
