use crate::domain::{models::reservation::CourtReservation, ports::ReservationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn create_if_free(&self, reservation: &CourtReservation) -> Result<CourtReservation, AppError> {
        // The no_double_booking exclusion constraint over
        // (court_id, tstzrange(start_time, end_time)) is the authoritative
        // overlap check; a violation (23P01) means a concurrent writer won.
        let result = sqlx::query_as::<_, CourtReservation>(
            "INSERT INTO court_reservations (id, court_id, requester_id, start_time, end_time, status, purpose, match_type, participants, guest_count, special_requests, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.court_id).bind(&reservation.requester_id)
            .bind(reservation.start_time).bind(reservation.end_time).bind(&reservation.status)
            .bind(&reservation.purpose).bind(&reservation.match_type).bind(&reservation.participants)
            .bind(reservation.guest_count).bind(&reservation.special_requests).bind(reservation.created_at)
            .fetch_one(&self.pool).await;

        result.map_err(|e| {
            let err = AppError::Database(e);
            if err.is_overlap_violation() {
                AppError::Conflict("Court is already booked for this interval".to_string())
            } else {
                err
            }
        })
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CourtReservation>, AppError> {
        sqlx::query_as::<_, CourtReservation>("SELECT * FROM court_reservations WHERE id = $1")
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
             WHERE court_id = $1 AND status = 'confirmed' AND start_time < $2 AND end_time > $3
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
