use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Hard upper bound on generated occurrences, independent of the requested
/// count or end date. A longer series is truncated, never an error.
pub const MAX_OCCURRENCES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn to_chrono(self) -> chrono::Weekday {
        match self {
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
            Weekday::Sunday => chrono::Weekday::Sun,
        }
    }
}

/// Exactly one termination mode is active; the wire shape carries two
/// optional fields and is converted (with validation) in the DTO layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Termination {
    Count { max_occurrences: u32 },
    Date { end_date: NaiveDate },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    pub interval: u32,
    /// Required and meaningful only for weekly patterns.
    pub days_of_week: Vec<Weekday>,
    pub termination: Termination,
}

impl RecurrenceRule {
    /// Rejects malformed rules before any expansion or persistence work.
    /// The error names the offending field.
    pub fn validate(&self, anchor: NaiveDate) -> Result<(), AppError> {
        if self.interval < 1 {
            return Err(AppError::Validation("interval must be at least 1".into()));
        }
        if self.pattern == RecurrencePattern::Weekly && self.days_of_week.is_empty() {
            return Err(AppError::Validation(
                "days_of_week must not be empty for a weekly pattern".into(),
            ));
        }
        match self.termination {
            Termination::Count { max_occurrences } => {
                if max_occurrences < 1 {
                    return Err(AppError::Validation("max_occurrences must be at least 1".into()));
                }
            }
            Termination::Date { end_date } => {
                if end_date < anchor {
                    return Err(AppError::Validation("end_date is before the anchor date".into()));
                }
            }
        }
        Ok(())
    }
}
