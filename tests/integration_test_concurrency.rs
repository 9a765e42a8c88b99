mod common;

use axum::http::StatusCode;
use common::{parse_body, TestApp};
use serde_json::json;

/// Two overlapping recurring requests race for the same court and slots.
/// The storage-level conditional insert must let exactly one writer win each
/// slot; the loser sees those dates as skipped conflicts.
#[tokio::test]
async fn test_concurrent_batches_never_double_book() {
    let app = TestApp::new().await;

    let payload_for = |requester: &str| {
        json!({
            "court_id": "court-1",
            "requester_id": requester,
            "start_time": "2025-06-02T09:00",
            "duration_hours": 1.0,
            "purpose": "Morning slot",
            "match_type": "singles",
            "recurrence": { "pattern": "daily", "max_occurrences": 5 }
        })
    };

    let payload_a = payload_for("member-a");
    let payload_b = payload_for("member-b");
    let (res_a, res_b) = tokio::join!(
        app.post_json("/api/v1/court-reservations/recurring", &payload_a),
        app.post_json("/api/v1/court-reservations/recurring", &payload_b),
    );
    assert_eq!(res_a.status(), StatusCode::OK);
    assert_eq!(res_b.status(), StatusCode::OK);

    let body_a = parse_body(res_a).await;
    let body_b = parse_body(res_b).await;

    let created_a = body_a["created_count"].as_u64().unwrap();
    let created_b = body_b["created_count"].as_u64().unwrap();
    assert_eq!(created_a + created_b, 5, "every slot has exactly one winner");

    for body in [&body_a, &body_b] {
        for skip in body["skipped"].as_array().unwrap() {
            assert_eq!(skip["reason"], "conflict");
        }
    }

    // The store holds one reservation per slot, no more.
    let res = app
        .get("/api/v1/courts/court-1/reservations?from=2025-06-01T00:00:00Z&to=2025-06-08T00:00:00Z")
        .await;
    let listed = parse_body(res).await;
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 5);

    let mut starts: Vec<&str> = rows.iter().map(|r| r["start_time"].as_str().unwrap()).collect();
    starts.sort_unstable();
    starts.dedup();
    assert_eq!(starts.len(), 5, "no two reservations share a start instant");
}

/// A partial overlap between two series: the later batch keeps its
/// non-overlapping dates.
#[tokio::test]
async fn test_overlapping_series_keep_disjoint_dates() {
    let app = TestApp::new().await;

    let first = json!({
        "court_id": "court-3",
        "requester_id": "member-a",
        "start_time": "2025-07-07T18:00",
        "duration_hours": 1.0,
        "purpose": "Weekly practice",
        "match_type": "practice",
        "recurrence": { "pattern": "weekly", "days_of_week": ["monday"], "max_occurrences": 2 }
    });
    let body = parse_body(app.post_json("/api/v1/court-reservations/recurring", &first).await).await;
    assert_eq!(body["created_count"], 2);

    // Monday + Thursday, four occurrences; the two Mondays are taken.
    let second = json!({
        "court_id": "court-3",
        "requester_id": "member-b",
        "start_time": "2025-07-07T18:00",
        "duration_hours": 1.0,
        "purpose": "League night",
        "match_type": "doubles",
        "recurrence": { "pattern": "weekly", "days_of_week": ["monday", "thursday"], "max_occurrences": 4 }
    });
    let body = parse_body(app.post_json("/api/v1/court-reservations/recurring", &second).await).await;

    assert_eq!(body["created_count"], 2);
    let skipped = body["skipped"].as_array().unwrap();
    assert_eq!(skipped.len(), 2);
    assert_eq!(skipped[0]["date"], "2025-07-07");
    assert_eq!(skipped[1]["date"], "2025-07-14");
    for skip in skipped {
        assert_eq!(skip["reason"], "conflict");
        assert!(skip["conflicting_reservation_id"].is_string());
    }
}
