use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::ports::ReservationRepository;
use crate::error::AppError;

/// A candidate reservation interval for one occurrence date, in UTC.
#[derive(Debug, Clone, Copy)]
pub struct OccurrenceSlot {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Why a candidate date cannot be booked as-is.
#[derive(Debug, Clone)]
pub enum ConflictCause {
    /// Ids of confirmed reservations whose intervals overlap the candidate.
    Overlaps(Vec<String>),
    /// The local wall-clock start time does not exist on this date (DST gap)
    /// or is ambiguous.
    InvalidStartTime,
}

#[derive(Debug, Clone)]
pub struct Conflict {
    pub date: NaiveDate,
    pub cause: ConflictCause,
}

/// Resolves an occurrence date plus the template's local start time into a
/// concrete half-open `[start, end)` UTC interval. `None` when the local
/// time cannot be mapped to a single instant.
pub fn occurrence_slot(
    date: NaiveDate,
    start_time: NaiveTime,
    duration_min: i64,
    tz: Tz,
) -> Option<OccurrenceSlot> {
    let start = tz
        .from_local_datetime(&date.and_time(start_time))
        .single()?
        .with_timezone(&Utc);
    Some(OccurrenceSlot {
        date,
        start,
        end: start + Duration::minutes(duration_min),
    })
}

/// Advisory conflict check: partitions candidate dates by whether their
/// interval overlaps an existing confirmed reservation on the court.
///
/// Read-only and subject to races with concurrent writers; the authoritative
/// check is the storage-layer constraint applied at write time.
pub async fn check(
    repo: &dyn ReservationRepository,
    court_id: &str,
    start_time: NaiveTime,
    duration_min: i64,
    dates: &[NaiveDate],
    tz: Tz,
) -> Result<Vec<Conflict>, AppError> {
    let mut conflicts = Vec::new();

    for &date in dates {
        let Some(slot) = occurrence_slot(date, start_time, duration_min, tz) else {
            conflicts.push(Conflict {
                date,
                cause: ConflictCause::InvalidStartTime,
            });
            continue;
        };

        // Half-open overlap test at the storage layer:
        // existing.start < candidate.end AND candidate.start < existing.end.
        let overlapping = repo.list_by_range(court_id, slot.start, slot.end).await?;
        if !overlapping.is_empty() {
            conflicts.push(Conflict {
                date,
                cause: ConflictCause::Overlaps(overlapping.into_iter().map(|r| r.id).collect()),
            });
        }
    }

    Ok(conflicts)
}
