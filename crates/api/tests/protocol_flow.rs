//! End-to-end drive-through over HTTP: request entry, confirm at the gate,
//! settle into a spot, pay, request exit, confirm at the exit gate.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};

use parkgate_core::protocol::SPOTS;
use parkgate_events::ChangeEvent;
use parkgate_store::DocumentStore;
use tokio::sync::broadcast;

/// Wait for the next change event for `collection`, with a real-time cap.
async fn next_change(rx: &mut broadcast::Receiver<ChangeEvent>, collection: &str) -> ChangeEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let ev = rx.recv().await.expect("change bus closed");
            if ev.collection == collection {
                return ev;
            }
        }
    })
    .await
    .expect("timed out waiting for change event")
}

#[tokio::test]
async fn full_drive_through() {
    let harness = common::test_app().await;
    let app = &harness.app;
    let token = common::bearer("driver-juno");

    // 1. The driver asks to enter.
    let (status, body) = common::send(
        app,
        Method::POST,
        "/api/v1/entry/request",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["status"], "pending");

    // 2. The entry gate trigger fires.
    let (status, body) = common::send(app, Method::POST, "/api/v1/gate/entry/confirm", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let ticket_id = body["data"]["ticket_id"]
        .as_str()
        .expect("confirmation carries a ticket id")
        .to_string();
    assert!(ticket_id.starts_with("TKT-"));

    // 3. The sensor reports the car settling into spot 2.
    let (status, body) = common::send(
        app,
        Method::POST,
        "/api/v1/gate/spot",
        None,
        Some(serde_json::json!({ "spot": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ticket_id"], ticket_id.as_str());
    assert_eq!(body["data"]["spot_id"], "spot2");

    // The driver's ticket list shows the active, resolved ticket.
    let (status, body) =
        common::send(app, Method::GET, "/api/v1/tickets", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["status"], "active");
    assert_eq!(body["data"][0]["spot_id"], "spot2");

    // The spot grid shows spot 2 taken.
    let (status, body) = common::send(app, Method::GET, "/api/v1/spots", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let spot2 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "spot2")
        .expect("spot2 is in the grid");
    assert_eq!(spot2["occupied"], true);
    assert_eq!(spot2["assigned_user"], "driver-juno");

    // 4. The driver pays; within the first hour the fare is one hour flat.
    let mut spot_events = harness.store.subscribe();
    let (status, body) = common::send(
        app,
        Method::POST,
        &format!("/api/v1/tickets/{ticket_id}/pay"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "paid");
    assert_eq!(body["data"]["amount_cents"], 250);
    assert!(body["data"]["ended_at"].is_string());

    // The consistency rule frees the spot.
    next_change(&mut spot_events, SPOTS).await;
    let (_, body) = common::send(app, Method::GET, "/api/v1/spots", Some(&token), None).await;
    let spot2 = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == "spot2")
        .unwrap();
    assert_eq!(spot2["occupied"], false);
    assert_eq!(spot2["assigned_user"], serde_json::Value::Null);

    // 5. The driver asks to leave.
    let (status, _) = common::send(
        app,
        Method::POST,
        "/api/v1/exit/request",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    // 6. The exit gate trigger fires.
    let (status, body) = common::send(app, Method::POST, "/api/v1/gate/exit/confirm", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ticket_id"], ticket_id.as_str());

    // The ticket is completed and keeps its history.
    let (status, body) = common::send(
        app,
        Method::GET,
        &format!("/api/v1/tickets/{ticket_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["amount_cents"], 250);
    assert!(body["data"]["ended_at"].is_string());
}

#[tokio::test]
async fn exit_request_without_paid_ticket_is_conflict() {
    let harness = common::test_app().await;
    let token = common::bearer("driver-solo");

    let (status, body) = common::send(
        &harness.app,
        Method::POST,
        "/api/v1/exit/request",
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FAILED_PRECONDITION");
}
