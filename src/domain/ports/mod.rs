use crate::domain::models::reservation::CourtReservation;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Conditional write: inserts the reservation iff no overlapping
    /// confirmed reservation exists for the same court. The check-and-insert
    /// is evaluated inside the storage layer, so two concurrent writers for
    /// the same slot cannot both succeed. Losing the race yields
    /// `AppError::Conflict`.
    async fn create_if_free(&self, reservation: &CourtReservation) -> Result<CourtReservation, AppError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<CourtReservation>, AppError>;

    /// Confirmed reservations on the court whose `[start, end)` interval
    /// intersects the given half-open range, ordered by start time.
    async fn list_by_range(
        &self,
        court_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CourtReservation>, AppError>;
}
