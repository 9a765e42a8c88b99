use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Singles,
    Doubles,
    MixedDoubles,
    Practice,
    Lesson,
    Other,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Singles => "singles",
            MatchType::Doubles => "doubles",
            MatchType::MixedDoubles => "mixed_doubles",
            MatchType::Practice => "practice",
            MatchType::Lesson => "lesson",
            MatchType::Other => "other",
        }
    }
}

/// Per-occurrence booking content. One template plus a recurrence rule fans
/// out into many reservations differing only in their date.
#[derive(Debug, Clone)]
pub struct BookingTemplate {
    pub court_id: String,
    pub requester_id: String,
    pub start_time: NaiveTime,
    pub duration_min: i64,
    pub purpose: String,
    pub match_type: MatchType,
    pub participants: Vec<String>,
    pub guest_count: i32,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CourtReservation {
    pub id: String,
    pub court_id: String,
    pub requester_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub purpose: String,
    pub match_type: String,
    pub participants: Json<Vec<String>>,
    pub guest_count: i32,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CourtReservation {
    pub fn new(template: &BookingTemplate, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            court_id: template.court_id.clone(),
            requester_id: template.requester_id.clone(),
            start_time: start,
            end_time: end,
            status: "confirmed".to_string(),
            purpose: template.purpose.clone(),
            match_type: template.match_type.as_str().to_string(),
            participants: Json(template.participants.clone()),
            guest_count: template.guest_count,
            special_requests: template.special_requests.clone(),
            created_at: Utc::now(),
        }
    }
}
