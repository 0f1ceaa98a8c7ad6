//! Parsing and validation of the operator's deletion selection.
//!
//! A selection is whitespace-separated catalog numbers, e.g. `"1 4 5"`.
//! Validation is all-or-nothing: the first problem rejects the whole input and
//! no file is touched. Checks run in a fixed order so the reported error is
//! deterministic:
//!
//! 1. blank input
//! 2. a token that is not made of ASCII digits
//! 3. a number given twice
//! 4. a number outside `1..=len`

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

/// Error type for a rejected selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No numbers were entered.
    #[error("no file numbers given")]
    Empty,

    /// A token is not a non-negative integer.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// The same number appears more than once, leading zeros ignored.
    #[error("file number {0} given more than once")]
    DuplicateNumber(String),

    /// A number does not name a catalog entry.
    #[error("file number {number} is out of range (1-{max})")]
    OutOfRange {
        /// Offending token as entered
        number: String,
        /// Largest valid number
        max: usize,
    },
}

/// A validated set of catalog numbers, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    numbers: BTreeSet<usize>,
}

impl Selection {
    /// Number of selected entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// Check if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Check whether `number` is selected.
    #[must_use]
    pub fn contains(&self, number: usize) -> bool {
        self.numbers.contains(&number)
    }

    /// Selected numbers in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.numbers.iter().copied()
    }
}

/// Parse raw selection text against a catalog of `catalog_len` entries.
///
/// # Errors
///
/// Returns the first [`SelectionError`] found, in the order documented at
/// module level.
///
/// # Example
///
/// ```
/// use dupsweep::actions::selection::{parse_selection, SelectionError};
///
/// let selection = parse_selection("3 1", 4).unwrap();
/// assert_eq!(selection.iter().collect::<Vec<_>>(), vec![1, 3]);
///
/// assert_eq!(parse_selection("1 1", 4), Err(SelectionError::DuplicateNumber("1".to_string())));
/// ```
pub fn parse_selection(input: &str, catalog_len: usize) -> Result<Selection, SelectionError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(SelectionError::Empty);
    }

    if let Some(bad) = tokens
        .iter()
        .find(|t| !t.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(SelectionError::NotANumber((*bad).to_string()));
    }

    // Repeats are found on the digit strings themselves so that numbers too
    // large for `usize` still compare equal.
    let mut seen = HashSet::new();
    for token in &tokens {
        let digits = canonical_digits(token);
        if !seen.insert(digits) {
            return Err(SelectionError::DuplicateNumber(digits.to_string()));
        }
    }

    // A parse failure on digits can only mean overflow, which is out of range.
    let mut numbers = BTreeSet::new();
    for token in &tokens {
        match token.parse::<usize>() {
            Ok(n) if (1..=catalog_len).contains(&n) => {
                numbers.insert(n);
            }
            _ => {
                return Err(SelectionError::OutOfRange {
                    number: (*token).to_string(),
                    max: catalog_len,
                })
            }
        }
    }

    log::debug!("Selection accepted: {:?}", numbers);
    Ok(Selection { numbers })
}

/// Digits with leading zeros stripped, keeping a lone `0`.
fn canonical_digits(token: &str) -> &str {
    let trimmed = token.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}
