use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::domain::models::recurrence::RecurrenceRule;
use crate::domain::models::reservation::{BookingTemplate, CourtReservation};
use crate::domain::ports::ReservationRepository;
use crate::domain::services::conflict::{self, ConflictCause};
use crate::domain::services::recurrence;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Conflict,
    StorageError,
    InvalidTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedOccurrence {
    pub date: NaiveDate,
    pub reason: SkipReason,
    pub conflicting_reservation_id: Option<String>,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub created: Vec<CourtReservation>,
    pub skipped: Vec<SkippedOccurrence>,
    /// Set when the hard occurrence cap shortened the requested series.
    pub truncated: bool,
}

enum Pending {
    Skip(SkippedOccurrence),
    Write(NaiveDate, JoinHandle<Result<CourtReservation, AppError>>),
}

/// Best-effort batch booking: expand the rule, run the advisory conflict
/// check, then attempt one conditional write per bookable occurrence.
///
/// A recurring series is N independent bookings, not one atomic unit: a
/// per-occurrence failure moves that occurrence to `skipped` and never
/// aborts its siblings. Only pre-expansion rule validation fails the whole
/// request. Occurrences already persisted stay valid if the caller goes
/// away mid-batch.
pub async fn create_recurring(
    repo: Arc<dyn ReservationRepository>,
    template: &BookingTemplate,
    rule: &RecurrenceRule,
    anchor_date: NaiveDate,
    tz: Tz,
) -> Result<BatchOutcome, AppError> {
    let expansion = recurrence::expand(rule, anchor_date)?;

    let advisory = conflict::check(
        repo.as_ref(),
        &template.court_id,
        template.start_time,
        template.duration_min,
        &expansion.dates,
        tz,
    )
    .await?;
    let advisory: HashMap<NaiveDate, ConflictCause> =
        advisory.into_iter().map(|c| (c.date, c.cause)).collect();

    // Writes for independent occurrences fan out concurrently; results are
    // still reported in the chronological order of the expansion.
    let mut pending = Vec::with_capacity(expansion.dates.len());
    for &date in &expansion.dates {
        match advisory.get(&date) {
            Some(ConflictCause::Overlaps(ids)) => {
                pending.push(Pending::Skip(SkippedOccurrence {
                    date,
                    reason: SkipReason::Conflict,
                    conflicting_reservation_id: ids.first().cloned(),
                }));
            }
            Some(ConflictCause::InvalidStartTime) => {
                pending.push(Pending::Skip(SkippedOccurrence {
                    date,
                    reason: SkipReason::InvalidTime,
                    conflicting_reservation_id: None,
                }));
            }
            None => {
                // The advisory pass already resolved this date, so the slot
                // computation cannot fail here.
                let Some(slot) =
                    conflict::occurrence_slot(date, template.start_time, template.duration_min, tz)
                else {
                    pending.push(Pending::Skip(SkippedOccurrence {
                        date,
                        reason: SkipReason::InvalidTime,
                        conflicting_reservation_id: None,
                    }));
                    continue;
                };

                let reservation = CourtReservation::new(template, slot.start, slot.end);
                let repo = repo.clone();
                pending.push(Pending::Write(
                    date,
                    tokio::spawn(async move { repo.create_if_free(&reservation).await }),
                ));
            }
        }
    }

    let mut created = Vec::new();
    let mut skipped = Vec::new();
    for entry in pending {
        match entry {
            Pending::Skip(s) => skipped.push(s),
            Pending::Write(date, handle) => match handle.await {
                Ok(Ok(reservation)) => created.push(reservation),
                Ok(Err(e)) if matches!(e, AppError::Conflict(_)) || e.is_overlap_violation() => {
                    // Lost the race to a concurrent writer after the
                    // advisory check passed.
                    skipped.push(SkippedOccurrence {
                        date,
                        reason: SkipReason::Conflict,
                        conflicting_reservation_id: None,
                    });
                }
                Ok(Err(e)) => {
                    warn!("Reservation write failed for {}: {}", date, e);
                    skipped.push(SkippedOccurrence {
                        date,
                        reason: SkipReason::StorageError,
                        conflicting_reservation_id: None,
                    });
                }
                Err(e) => {
                    warn!("Reservation task failed for {}: {}", date, e);
                    skipped.push(SkippedOccurrence {
                        date,
                        reason: SkipReason::StorageError,
                        conflicting_reservation_id: None,
                    });
                }
            },
        }
    }

    info!(
        court_id = %template.court_id,
        created = created.len(),
        skipped = skipped.len(),
        truncated = expansion.truncated,
        "Recurring batch completed"
    );

    Ok(BatchOutcome {
        created,
        skipped,
        truncated: expansion.truncated,
    })
}
