use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CheckConflictsRequest, CreateRecurringRequest};
use crate::api::dtos::responses::{CheckConflictsResponse, ConflictEntry, RecurringCreatedResponse};
use crate::domain::models::recurrence::MAX_OCCURRENCES;
use crate::domain::models::reservation::BookingTemplate;
use crate::domain::services::{batch, conflict};
use crate::error::AppError;
use crate::state::AppState;

fn parse_time_of_day(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation("Invalid start_time format (HH:MM)".into()))
}

/// Durations are quantized to the half-hour grid; anything else is rejected
/// rather than rounded.
fn duration_minutes(hours: f64) -> Result<i64, AppError> {
    if !(hours > 0.0 && hours <= 24.0) {
        return Err(AppError::Validation(
            "duration_hours must be greater than 0 and at most 24".into(),
        ));
    }
    let half_steps = hours * 2.0;
    if (half_steps - half_steps.round()).abs() > 1e-9 {
        return Err(AppError::Validation(
            "duration_hours must be a multiple of 0.5".into(),
        ));
    }
    Ok(half_steps.round() as i64 * 30)
}

/// Accepts an RFC3339 instant (converted to facility wall time) or a bare
/// local datetime.
fn parse_anchor(raw: &str, tz: Tz) -> Result<(NaiveDate, NaiveTime), AppError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let local = dt.with_timezone(&tz);
        return Ok((local.date_naive(), local.time()));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| AppError::Validation("Invalid start_time (expected ISO datetime)".into()))?;
    Ok((naive.date(), naive.time()))
}

/// Advisory pre-flight check for a set of candidate dates. Subject to races
/// with concurrent writers; the booking path re-verifies at write time.
pub async fn check_conflicts(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckConflictsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.dates.len() > MAX_OCCURRENCES {
        return Err(AppError::Validation(format!(
            "dates must not exceed {} entries",
            MAX_OCCURRENCES
        )));
    }
    let start_time = parse_time_of_day(&payload.start_time)?;
    let duration_min = duration_minutes(payload.duration_hours)?;
    let tz = state.config.facility_timezone;

    let conflicts = conflict::check(
        state.reservation_repo.as_ref(),
        &payload.court_id,
        start_time,
        duration_min,
        &payload.dates,
        tz,
    )
    .await?;

    let mut entries = Vec::new();
    for c in conflicts {
        match c.cause {
            conflict::ConflictCause::Overlaps(ids) => {
                for id in ids {
                    entries.push(ConflictEntry {
                        date: c.date,
                        time: payload.start_time.clone(),
                        reason: "overlap",
                        conflicting_reservation_id: Some(id),
                    });
                }
            }
            conflict::ConflictCause::InvalidStartTime => {
                entries.push(ConflictEntry {
                    date: c.date,
                    time: payload.start_time.clone(),
                    reason: "invalid_time",
                    conflicting_reservation_id: None,
                });
            }
        }
    }

    Ok(Json(CheckConflictsResponse { conflicts: entries }))
}

pub async fn create_recurring(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateRecurringRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tz = state.config.facility_timezone;
    let (anchor_date, start_time) = parse_anchor(&payload.start_time, tz)?;
    let duration_min = duration_minutes(payload.duration_hours)?;

    let guest_count = payload.guest_count.unwrap_or(0);
    if guest_count < 0 {
        return Err(AppError::Validation("guest_count must not be negative".into()));
    }

    let rule = payload.recurrence.into_rule()?;

    let template = BookingTemplate {
        court_id: payload.court_id,
        requester_id: payload.requester_id,
        start_time,
        duration_min,
        purpose: payload.purpose,
        match_type: payload.match_type,
        participants: payload.participants.unwrap_or_default(),
        guest_count,
        special_requests: payload.special_requests,
    };

    info!(
        court_id = %template.court_id,
        pattern = ?rule.pattern,
        "create_recurring: expanding series anchored at {} {}",
        anchor_date, start_time
    );

    let outcome = batch::create_recurring(
        state.reservation_repo.clone(),
        &template,
        &rule,
        anchor_date,
        tz,
    )
    .await?;

    Ok(Json(RecurringCreatedResponse {
        created_count: outcome.created.len(),
        created: outcome.created,
        skipped: outcome.skipped,
        truncated: outcome.truncated,
    }))
}

pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reservation = state
        .reservation_repo
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound("Reservation not found".into()))?;
    Ok(Json(reservation))
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

pub async fn list_court_reservations(
    State(state): State<Arc<AppState>>,
    Path(court_id): Path<String>,
    Query(range): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    if range.to <= range.from {
        return Err(AppError::Validation("to must be after from".into()));
    }
    let reservations = state
        .reservation_repo
        .list_by_range(&court_id, range.from, range.to)
        .await?;
    Ok(Json(reservations))
}
