// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

// Integration tests for the notes API and the config-at endpoint, driving
// the router directly without binding a socket. The robot service is either
// absent or a canned in-memory feed.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use sandlog_client::{ClientError, RobotApi};
use sandlog_core::{ChangeHistoryEntry, PartSnapshot};
use sandlog_server::api::AppState;
use sandlog_server::build_router;
use sandlog_storage::NoteStore;

fn app() -> Router {
    let state = AppState {
        store: Arc::new(NoteStore::temporary().unwrap()),
        robot: None,
    };
    build_router(state)
}

/// Two-change feed, newest-first. The newer entry's snapshot carries a
/// fragment mod so expansion is observable through the endpoint.
struct FakeRobot {
    fail: bool,
}

#[async_trait]
impl RobotApi for FakeRobot {
    async fn change_history(
        &self,
        _part_id: &str,
    ) -> Result<Vec<ChangeHistoryEntry>, ClientError> {
        if self.fail {
            return Err(ClientError::Api {
                status: 503,
                message: "robot service down".into(),
            });
        }

        let newer: ChangeHistoryEntry = serde_json::from_value(json!({
            "when": "2025-06-01T00:00:00Z",
            "edited_by": "op@example.com",
            "old": {
                "config": {
                    "components": [
                        {"name": "sander", "attributes": {"grit": 80}},
                    ],
                    "fragment_mods": [
                        {"mods": [{"set": {"components.sander.attributes.grit": 120}}]},
                    ],
                },
            },
        }))
        .unwrap();
        let older: ChangeHistoryEntry =
            serde_json::from_value(json!({"when": "2025-05-01T00:00:00Z"})).unwrap();

        Ok(vec![newer, older])
    }

    async fn current_part(&self, _part_id: &str) -> Result<PartSnapshot, ClientError> {
        Ok(serde_json::from_value(json!({
            "config": {"components": []},
        }))
        .unwrap())
    }
}

fn app_with_robot(fail: bool) -> Router {
    let state = AppState {
        store: Arc::new(NoteStore::temporary().unwrap()),
        robot: Some(Arc::new(FakeRobot { fail })),
    };
    build_router(state)
}

fn post_note_request(robot_id: &str, pass_id: &str, text: &str) -> Request<Body> {
    let body = json!({
        "organization_id": "org-1",
        "location_id": "loc-1",
        "robot_id": robot_id,
        "pass_id": pass_id,
        "note": text,
    });
    Request::builder()
        .method("POST")
        .uri("/api/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn upsert_then_fetch_single_note() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_note_request("robot-a", "pass-1", "burn mark near seam"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stored = body_json(response).await;
    assert_eq!(stored["note"], json!("burn mark near seam"));
    assert!(stored["updated_at"].is_string());

    let response = app
        .oneshot(get_request(
            "/api/notes?organization_id=org-1&location_id=loc-1&robot_id=robot-a&pass_id=pass-1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["note"], json!("burn mark near seam"));
    assert_eq!(fetched["pass_id"], json!("pass-1"));
}

#[tokio::test]
async fn missing_note_is_404() {
    let response = app()
        .oneshot(get_request(
            "/api/notes?organization_id=org-1&location_id=loc-1&robot_id=robot-a&pass_id=nope",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_tuple_field_is_rejected() {
    let response = app()
        .oneshot(post_note_request("", "pass-1", "text"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_returns_only_the_addressed_robot() {
    let app = app();

    for (robot, pass) in [("robot-a", "pass-1"), ("robot-a", "pass-2"), ("robot-b", "pass-1")] {
        let response = app
            .clone()
            .oneshot(post_note_request(robot, pass, "text"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get_request(
            "/api/notes?organization_id=org-1&location_id=loc-1&robot_id=robot-a",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listing = body_json(response).await;
    assert_eq!(listing["total"], json!(2));
    for note in listing["notes"].as_array().unwrap() {
        assert_eq!(note["robot_id"], json!("robot-a"));
    }
}

#[tokio::test]
async fn delete_reports_whether_anything_was_removed() {
    let app = app();

    app.clone()
        .oneshot(post_note_request("robot-a", "pass-1", "text"))
        .await
        .unwrap();

    let uri =
        "/api/notes?organization_id=org-1&location_id=loc-1&robot_id=robot-a&pass_id=pass-1";

    let response = app.clone().oneshot(delete_request(uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], json!(true));

    let response = app.oneshot(delete_request(uri)).await.unwrap();
    assert_eq!(body_json(response).await["deleted"], json!(false));
}

#[tokio::test]
async fn prune_removes_notes_before_the_cutoff() {
    let app = app();

    app.clone()
        .oneshot(post_note_request("robot-a", "pass-1", "text"))
        .await
        .unwrap();

    // A cutoff in the past touches nothing.
    let response = app
        .clone()
        .oneshot(delete_request("/api/notes/old?before=2000-01-01T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], json!(0));

    // A cutoff in the far future removes the lot.
    let response = app
        .clone()
        .oneshot(delete_request("/api/notes/old?before=2099-01-01T00:00:00Z"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["deleted"], json!(1));

    let response = app
        .oneshot(get_request(
            "/api/notes?organization_id=org-1&location_id=loc-1&robot_id=robot-a",
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["total"], json!(0));
}

#[tokio::test]
async fn prune_without_cutoff_is_rejected() {
    let response = app()
        .oneshot(delete_request("/api/notes/old"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn config_endpoint_without_robot_service_is_503() {
    let response = app()
        .oneshot(get_request(
            "/api/config?part_id=part-1&at=2025-03-01T12:00:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn config_endpoint_returns_the_expanded_configuration() {
    let response = app_with_robot(false)
        .oneshot(get_request(
            "/api/config?part_id=part-1&at=2025-05-15T00:00:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let resolved = body_json(response).await;
    assert_eq!(
        resolved["config"]["components"][0]["attributes"]["grit"],
        json!(120)
    );
    assert_eq!(
        resolved["metadata"]["config_timestamp"],
        json!("2025-05-01T00:00:00Z")
    );
    assert_eq!(resolved["metadata"]["has_old_config"], json!(true));
}

#[tokio::test]
async fn config_endpoint_is_404_before_recorded_history() {
    let response = app_with_robot(false)
        .oneshot(get_request(
            "/api/config?part_id=part-1&at=2020-01-01T00:00:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upstream_failure_surfaces_as_502() {
    let response = app_with_robot(true)
        .oneshot(get_request(
            "/api/config?part_id=part-1&at=2025-05-15T00:00:00Z",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}
