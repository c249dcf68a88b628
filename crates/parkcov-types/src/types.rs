//! Shared value types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Free-text note attached to a fleet model by the reporting layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Note body
    pub text: String,
    /// Team that owns the follow-up
    pub team: String,
    /// Day the note was last saved
    pub date: NaiveDate,
}

impl Annotation {
    /// Render as a single spreadsheet cell: `[team] text (date)`
    pub fn to_cell(&self) -> String {
        format!("[{}] {} ({})", self.team, self.text, self.date.format("%Y-%m-%d"))
    }
}
