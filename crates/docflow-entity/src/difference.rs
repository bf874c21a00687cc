//! Difference records produced by the diff engine.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use docflow_core::error::AppError;
use docflow_core::result::AppResult;

/// Kind of change a hunk represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifferenceType {
    /// Lines present only in the new revision.
    Insert,
    /// Lines present only in the previous revision.
    Delete,
    /// Lines replaced by other lines.
    Change,
}

impl DifferenceType {
    /// Classifies a hunk from its section sizes.
    ///
    /// A hunk with no lines on either side is not a hunk; reaching it means
    /// the producing algorithm is broken, so it is reported as an invariant
    /// violation instead of being dropped.
    pub fn classify(previous_size: i64, new_size: i64) -> AppResult<Self> {
        match (previous_size, new_size) {
            (0, 0) => Err(AppError::invariant_violation(
                "Unknown delta type: hunk has no lines on either side",
            )),
            (p, n) if p < 0 || n < 0 => Err(AppError::invariant_violation(format!(
                "Unknown delta type: negative section size ({p}, {n})"
            ))),
            (0, _) => Ok(Self::Insert),
            (_, 0) => Ok(Self::Delete),
            _ => Ok(Self::Change),
        }
    }

    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
            Self::Change => "CHANGE",
        }
    }
}

impl fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hunk of an edit script between two line sequences.
///
/// Starts are 0-based line indices; sizes are line counts. Immutable once
/// built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difference {
    previous_section_start: i64,
    previous_section_size: i64,
    new_section_start: i64,
    new_section_size: i64,
    #[serde(rename = "type")]
    difference_type: DifferenceType,
}

impl Difference {
    /// Builds a difference, classifying it from the section sizes.
    pub fn new(
        previous_section_start: i64,
        previous_section_size: i64,
        new_section_start: i64,
        new_section_size: i64,
    ) -> AppResult<Self> {
        if previous_section_start < 0 || new_section_start < 0 {
            return Err(AppError::invariant_violation(format!(
                "Negative section start ({previous_section_start}, {new_section_start})"
            )));
        }
        let difference_type = DifferenceType::classify(previous_section_size, new_section_size)?;
        Ok(Self {
            previous_section_start,
            previous_section_size,
            new_section_start,
            new_section_size,
            difference_type,
        })
    }

    /// Builds the difference for a hunk covering at least one line, as the
    /// diff engine emits them.
    pub fn hunk(
        previous_start: usize,
        previous_size: usize,
        new_start: usize,
        new_size: usize,
    ) -> Self {
        debug_assert!(previous_size + new_size > 0, "hunk without lines");
        let difference_type = match (previous_size, new_size) {
            (0, _) => DifferenceType::Insert,
            (_, 0) => DifferenceType::Delete,
            _ => DifferenceType::Change,
        };
        Self {
            previous_section_start: previous_start as i64,
            previous_section_size: previous_size as i64,
            new_section_start: new_start as i64,
            new_section_size: new_size as i64,
            difference_type,
        }
    }

    /// Start of the replaced section in the previous revision.
    pub fn previous_section_start(&self) -> i64 {
        self.previous_section_start
    }

    /// Number of lines replaced in the previous revision.
    pub fn previous_section_size(&self) -> i64 {
        self.previous_section_size
    }

    /// Start of the replacing section in the new revision.
    pub fn new_section_start(&self) -> i64 {
        self.new_section_start
    }

    /// Number of replacing lines in the new revision.
    pub fn new_section_size(&self) -> i64 {
        self.new_section_size
    }

    /// Kind of change.
    pub fn difference_type(&self) -> DifferenceType {
        self.difference_type
    }

    /// Line range of the section in the previous revision.
    pub fn previous_range(&self) -> Range<usize> {
        let start = self.previous_section_start as usize;
        start..start + self.previous_section_size as usize
    }

    /// Line range of the section in the new revision.
    pub fn new_range(&self) -> Range<usize> {
        let start = self.new_section_start as usize;
        start..start + self.new_section_size as usize
    }

    /// Re-checks the classification of a record that came from outside
    /// (e.g. deserialized from storage).
    pub fn validate(&self) -> AppResult<()> {
        if self.previous_section_start < 0 || self.new_section_start < 0 {
            return Err(AppError::invariant_violation(format!(
                "Negative section start ({}, {})",
                self.previous_section_start, self.new_section_start
            )));
        }
        let expected =
            DifferenceType::classify(self.previous_section_size, self.new_section_size)?;
        if expected != self.difference_type {
            return Err(AppError::invariant_violation(format!(
                "Difference typed {} but section sizes imply {}",
                self.difference_type, expected
            )));
        }
        Ok(())
    }
}
