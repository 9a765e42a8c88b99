use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::recurrence::{RecurrencePattern, RecurrenceRule, Termination, Weekday};
use crate::domain::models::reservation::MatchType;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct CheckConflictsRequest {
    pub court_id: String,
    pub dates: Vec<NaiveDate>,
    /// Local wall-clock start, "HH:MM".
    pub start_time: String,
    pub duration_hours: f64,
}

/// Wire shape of a recurrence rule: termination arrives as two optional
/// fields and is converted to the tagged domain enum here, rejecting
/// both-set and neither-set.
#[derive(Deserialize)]
pub struct RecurrenceDto {
    pub pattern: RecurrencePattern,
    pub interval: Option<u32>,
    pub days_of_week: Option<Vec<Weekday>>,
    pub end_date: Option<NaiveDate>,
    pub max_occurrences: Option<u32>,
}

impl RecurrenceDto {
    pub fn into_rule(self) -> Result<RecurrenceRule, AppError> {
        let termination = match (self.end_date, self.max_occurrences) {
            (Some(end_date), None) => Termination::Date { end_date },
            (None, Some(max_occurrences)) => Termination::Count { max_occurrences },
            _ => {
                return Err(AppError::Validation(
                    "recurrence must set exactly one of end_date or max_occurrences".into(),
                ))
            }
        };

        Ok(RecurrenceRule {
            pattern: self.pattern,
            interval: self.interval.unwrap_or(1),
            days_of_week: self.days_of_week.unwrap_or_default(),
            termination,
        })
    }
}

#[derive(Deserialize)]
pub struct CreateRecurringRequest {
    pub court_id: String,
    pub requester_id: String,
    /// Anchor: RFC3339, or facility-local "YYYY-MM-DDTHH:MM".
    pub start_time: String,
    pub duration_hours: f64,
    pub purpose: String,
    pub match_type: MatchType,
    pub participants: Option<Vec<String>>,
    pub guest_count: Option<i32>,
    pub special_requests: Option<String>,
    pub recurrence: RecurrenceDto,
}
