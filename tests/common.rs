use reservation_backend::{
    api::router::create_router,
    config::Config,
    infra::repositories::sqlite_reservation_repo::SqliteReservationRepo,
    state::AppState,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_timezone(chrono_tz::UTC).await
    }

    pub async fn with_timezone(tz: chrono_tz::Tz) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            facility_timezone: tz,
        };

        let state = Arc::new(AppState {
            config,
            reservation_repo: Arc::new(SqliteReservationRepo::new(pool.clone())),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    #[allow(dead_code)]
    pub async fn post_json(&self, uri: &str, payload: &Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[allow(dead_code)]
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Inserts a confirmed reservation directly through the repository, used to
/// seed pre-existing bookings for conflict scenarios.
#[allow(dead_code)]
pub async fn seed_reservation(
    app: &TestApp,
    court_id: &str,
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
) -> reservation_backend::domain::models::reservation::CourtReservation {
    use reservation_backend::domain::models::reservation::{
        BookingTemplate, CourtReservation, MatchType,
    };
    use reservation_backend::domain::ports::ReservationRepository;

    let template = BookingTemplate {
        court_id: court_id.to_string(),
        requester_id: "seed-member".to_string(),
        start_time: start.time(),
        duration_min: (end - start).num_minutes(),
        purpose: "Seeded booking".to_string(),
        match_type: MatchType::Practice,
        participants: vec![],
        guest_count: 0,
        special_requests: None,
    };
    let reservation = CourtReservation::new(&template, start, end);
    app.state
        .reservation_repo
        .create_if_free(&reservation)
        .await
        .expect("Failed to seed reservation")
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
