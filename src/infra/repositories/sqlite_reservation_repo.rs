use crate::domain::{models::reservation::CourtReservation, ports::ReservationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteReservationRepo {
    pool: SqlitePool,
}

impl SqliteReservationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for SqliteReservationRepo {
    async fn create_if_free(&self, reservation: &CourtReservation) -> Result<CourtReservation, AppError> {
        // SQLite has no exclusion constraints; a single INSERT..SELECT with
        // the overlap test in the WHERE clause is atomic because SQLite
        // serializes writers. Zero rows inserted means the slot was taken.
        let created = sqlx::query_as::<_, CourtReservation>(
            "INSERT INTO court_reservations (id, court_id, requester_id, start_time, end_time, status, purpose, match_type, participants, guest_count, special_requests, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM court_reservations
                 WHERE court_id = ? AND status = 'confirmed' AND start_time < ? AND end_time > ?
             )
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.court_id).bind(&reservation.requester_id)
            .bind(reservation.start_time).bind(reservation.end_time).bind(&reservation.status)
            .bind(&reservation.purpose).bind(&reservation.match_type).bind(&reservation.participants)
            .bind(reservation.guest_count).bind(&reservation.special_requests).bind(reservation.created_at)
            .bind(&reservation.court_id).bind(reservation.end_time).bind(reservation.start_time)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        created.ok_or_else(|| {
            AppError::Conflict("Court is already booked for this interval".to_string())
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CourtReservation>, AppError> {
        sqlx::query_as::<_, CourtReservation>("SELECT * FROM court_reservations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(
        &self,
        court_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CourtReservation>, AppError> {
        sqlx::query_as::<_, CourtReservation>(
            "SELECT * FROM court_reservations
             WHERE court_id = ? AND status = 'confirmed' AND start_time < ? AND end_time > ?
             ORDER BY start_time ASC"
        )
            .bind(court_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
