//! Confirmation workflow state of a file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a file stands in the confirmation workflow.
///
/// ```text
/// Draft ──mark_to_confirm──▶ MarkedToConfirm ──confirm──▶ Confirmed
/// ```
///
/// Deletion is allowed from every state. A confirmed file stays editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
    /// Freshly created; nobody asked for confirmation yet.
    Draft,
    /// A task member asked the task administrator to confirm the file.
    MarkedToConfirm,
    /// The task administrator confirmed the file.
    Confirmed,
}

impl ConfirmationState {
    /// Derive the state from the persisted flags.
    pub fn from_flags(confirmed: bool, marked_to_confirm: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else if marked_to_confirm {
            Self::MarkedToConfirm
        } else {
            Self::Draft
        }
    }

    /// Returns the string name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::MarkedToConfirm => "marked_to_confirm",
            Self::Confirmed => "confirmed",
        }
    }
}

impl fmt::Display for ConfirmationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
