use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::reservation::CourtReservation;
use crate::domain::services::batch::SkippedOccurrence;

#[derive(Serialize)]
pub struct ConflictEntry {
    pub date: NaiveDate,
    pub time: String,
    /// "overlap" for a booked slot, "invalid_time" for a local start time
    /// that does not exist on that date.
    pub reason: &'static str,
    pub conflicting_reservation_id: Option<String>,
}

#[derive(Serialize)]
pub struct CheckConflictsResponse {
    pub conflicts: Vec<ConflictEntry>,
}

#[derive(Serialize)]
pub struct RecurringCreatedResponse {
    pub created_count: usize,
    pub created: Vec<CourtReservation>,
    pub skipped: Vec<SkippedOccurrence>,
    /// True when the hard occurrence cap shortened the requested series.
    pub truncated: bool,
}
