// ABOUTME: End-to-end HTTP tests over the full router with an in-memory database
// ABOUTME: Covers authentication, problem details, CRUD status codes, joins and the profile endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

fn admin_token() -> String {
    common::mint_token("admin-1", &["admin"])
}

fn user_token(subject: &str) -> String {
    common::mint_token(subject, &[])
}

fn id_of(value: &Value) -> &str {
    value["id"].as_str().expect("id")
}

fn stamp_of(value: &Value) -> &str {
    value["concurrency_stamp"].as_str().expect("concurrency_stamp")
}

async fn create_exercise_type(app: &TestApp, name: &str) -> Value {
    let (status, body) = app
        .post(
            "/api/exercise-types",
            &admin_token(),
            json!({ "name": name, "description": "compound lift" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn test_missing_token_is_problem_json_401() {
    let app = TestApp::new().await;
    let request = Request::builder()
        .uri("/api/exercise-types")
        .header("x-request-id", "trace-401")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/problem+json"
    );
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-401");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["type"], "about:blank");
    assert_eq!(body["status"], 401);
    assert_eq!(body["code"], "AUTH_REQUIRED");
    assert_eq!(body["request_id"], "trace-401");
}

#[tokio::test]
async fn test_bad_and_expired_tokens() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/exercise-types", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_INVALID");

    let expired = common::mint_token_with(json!({
        "sub": "late",
        "exp": (Utc::now() - Duration::hours(2)).timestamp(),
    }));
    let (status, body) = app.get("/api/exercise-types", &expired).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTH_EXPIRED");
}

#[tokio::test]
async fn test_reference_data_writes_require_admin() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/muscle-groups",
            &user_token("lifter"),
            json!({ "name": "Chest" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PERMISSION_DENIED");

    let (status, _) = app
        .post("/api/muscle-groups", &admin_token(), json!({ "name": "Chest" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Reads stay open to every authenticated caller
    let (status, body) = app.get("/api/muscle-groups", &user_token("lifter")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["name"], "Chest");
}

#[tokio::test]
async fn test_crud_lifecycle_with_concurrency_stamps() {
    let app = TestApp::new().await;
    let token = admin_token();
    let created = create_exercise_type(&app, "Deadlift").await;
    let uri = format!("/api/exercise-types/{}", id_of(&created));

    let (status, fetched) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = app
        .put(
            &uri,
            &token,
            json!({
                "concurrency_stamp": stamp_of(&created),
                "name": "Conventional Deadlift",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["name"], "Conventional Deadlift");
    assert_eq!(updated["description"], Value::Null);
    assert_ne!(stamp_of(&updated), stamp_of(&created));

    let (status, conflict) = app
        .put(
            &uri,
            &token,
            json!({
                "concurrency_stamp": stamp_of(&created),
                "name": "Sumo Deadlift",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "CONCURRENCY_CONFLICT");

    let (status, conflict) = app
        .delete(
            &format!("{uri}?concurrency_stamp={}", stamp_of(&created)),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["code"], "CONCURRENCY_CONFLICT");

    let (status, body) = app
        .delete(
            &format!("{uri}?concurrency_stamp={}", stamp_of(&updated)),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = app.get(&uri, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_duplicate_and_in_use_are_conflicts() {
    let app = TestApp::new().await;
    let token = admin_token();

    let (_, group) = app
        .post("/api/equipment-groups", &token, json!({ "name": "Machines" }))
        .await;
    let (status, body) = app
        .post("/api/equipment-groups", &token, json!({ "name": "MACHINES" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RESOURCE_ALREADY_EXISTS");

    let (status, _) = app
        .post(
            "/api/equipment",
            &token,
            json!({ "name": "Leg press", "equipment_group_id": id_of(&group) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .delete(&format!("/api/equipment-groups/{}", id_of(&group)), &token)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "RESOURCE_IN_USE");
}

#[tokio::test]
async fn test_malformed_requests_are_invalid_input() {
    let app = TestApp::new().await;
    let token = admin_token();

    let (status, body) = app.get("/api/exercise-types/not-a-uuid", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, body) = app.get("/api/exercise-types?page=-1", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/exercise-types")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Updates without a stamp cannot be deserialized
    let created = create_exercise_type(&app, "Row").await;
    let (status, body) = app
        .put(
            &format!("/api/exercise-types/{}", id_of(&created)),
            &token,
            json!({ "name": "Barbell Row" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_validation_failures_list_every_field() {
    let app = TestApp::new().await;
    let token = admin_token();

    let (status, body) = app
        .post(
            "/api/exercise-types",
            &token,
            json!({ "name": "   ", "description": "x".repeat(5000) }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["description"].is_array());
    assert!(body["request_id"].is_string());

    let (status, body) = app
        .get("/api/exercise-types?sort_by=password&page_size=500", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["errors"]["sort_by"].is_array());
    assert!(body["errors"]["page_size"].is_array());
}

#[tokio::test]
async fn test_list_query_parameters() {
    let app = TestApp::new().await;
    let token = admin_token();
    for name in ["Squat", "Front Squat", "Bench Press"] {
        create_exercise_type(&app, name).await;
    }

    let (status, body) = app
        .get(
            "/api/exercise-types?search=squat&sort_by=name&sort_direction=dEsC&page_size=1",
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["has_next_page"], true);
    assert_eq!(body["items"][0]["name"], "Squat");
}

#[tokio::test]
async fn test_reference_joins() {
    let app = TestApp::new().await;
    let token = admin_token();
    let squat = create_exercise_type(&app, "Squat").await;
    let (_, quads) = app
        .post("/api/muscle-groups", &token, json!({ "name": "Quadriceps" }))
        .await;
    let (_, primary) = app
        .post("/api/muscle-functions", &token, json!({ "name": "Primary" }))
        .await;

    let (status, link) = app
        .post(
            "/api/exercise-muscle-groups",
            &token,
            json!({
                "exercise_type_id": id_of(&squat),
                "muscle_group_id": id_of(&quads),
                "muscle_function_id": id_of(&primary),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{link}");

    let (status, details) = app
        .get(
            &format!("/api/exercise-types/{}/muscle-groups", id_of(&squat)),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details[0]["muscle_group"]["name"], "Quadriceps");
    assert_eq!(details[0]["muscle_function"]["name"], "Primary");

    let (status, page) = app
        .get(
            &format!("/api/muscle-groups/{}/exercise-types", id_of(&quads)),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["items"][0]["name"], "Squat");

    let missing = uuid::Uuid::new_v4();
    let (status, body) = app
        .get(&format!("/api/equipment-groups/{missing}/equipment"), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");

    let (status, body) = app
        .post(
            "/api/exercise-muscle-groups",
            &token,
            json!({
                "exercise_type_id": id_of(&squat),
                "muscle_group_id": missing,
                "muscle_function_id": id_of(&primary),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn test_training_records_are_private_to_their_owner() {
    let app = TestApp::new().await;
    let alice = user_token("alice");
    let bob = user_token("bob");
    let bench = create_exercise_type(&app, "Bench Press").await;

    let (status, config) = app
        .post(
            "/api/user-exercises",
            &alice,
            json!({ "exercise_type_id": id_of(&bench), "target_sets": 5, "target_reps": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{config}");

    let uri = format!("/api/user-exercises/{}", id_of(&config));
    let (status, _) = app.get(&uri, &alice).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&uri, &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");

    let (status, body) = app.get("/api/user-exercises", &bob).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 0);

    let (status, body) = app
        .post(
            "/api/user-exercise-history",
            &bob,
            json!({
                "user_exercise_id": id_of(&config),
                "performed_at": Utc::now(),
                "sets": 3,
                "reps": 5,
                "weight": 60.0,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REFERENCE");

    let (status, body) = app.get(&format!("{uri}/history"), &bob).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "RESOURCE_NOT_FOUND");
}

#[tokio::test]
async fn test_workout_session_flow() {
    let app = TestApp::new().await;
    let token = user_token("runner");
    let bench = create_exercise_type(&app, "Bench Press").await;
    let (_, config) = app
        .post(
            "/api/user-exercises",
            &token,
            json!({ "exercise_type_id": id_of(&bench) }),
        )
        .await;

    let (status, session) = app
        .post(
            "/api/workout-sessions",
            &token,
            json!({ "name": "Push", "started_at": Utc::now() - Duration::hours(1) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{session}");
    assert_eq!(session["completed_at"], Value::Null);

    let (status, entry) = app
        .post(
            "/api/user-exercise-history",
            &token,
            json!({
                "user_exercise_id": id_of(&config),
                "workout_session_id": id_of(&session),
                "performed_at": Utc::now(),
                "sets": 5,
                "reps": 5,
                "weight": 80.0,
                "rpe": 8,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{entry}");

    let (status, page) = app
        .get(
            &format!("/api/workout-sessions/{}/history", id_of(&session)),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);
    assert_eq!(page["items"][0]["id"], entry["id"]);

    let (status, page) = app
        .get(
            &format!("/api/user-exercises/{}/history", id_of(&config)),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total_count"], 1);

    let complete_uri = format!("/api/workout-sessions/{}/complete", id_of(&session));
    let (status, completed) = app
        .post(
            &complete_uri,
            &token,
            json!({ "concurrency_stamp": stamp_of(&session) }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{completed}");
    assert!(completed["completed_at"].is_string());

    let (status, body) = app
        .post(
            &complete_uri,
            &token,
            json!({ "concurrency_stamp": stamp_of(&completed) }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONCURRENCY_CONFLICT");
}

#[tokio::test]
async fn test_current_user_profile() {
    let app = TestApp::new().await;
    let token = user_token("profile-user");

    let (status, me) = app.get("/api/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["subject"], "profile-user");
    assert_eq!(me["email"], "profile-user@example.com");
    assert_eq!(me["preferred_weight_unit"], "kg");

    let (status, again) = app.get("/api/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again["id"], me["id"]);

    let (status, updated) = app
        .put(
            "/api/users/me",
            &token,
            json!({
                "concurrency_stamp": stamp_of(&me),
                "display_name": "Heavy Lifter",
                "preferred_weight_unit": "lb",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{updated}");
    assert_eq!(updated["display_name"], "Heavy Lifter");
    assert_eq!(updated["preferred_weight_unit"], "lb");

    let (status, body) = app
        .put(
            "/api/users/me",
            &token,
            json!({
                "concurrency_stamp": stamp_of(&me),
                "preferred_weight_unit": "kg",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONCURRENCY_CONFLICT");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_oversized_body_is_problem_json_413() {
    let mut config = common::test_config();
    config.http.max_body_bytes = 256;
    let app = TestApp::with_config(config).await;

    let payload = json!({ "name": "Squat", "description": "x".repeat(1024) }).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/exercise-types")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .header("x-request-id", "big-body-1")
        .body(Body::from(payload))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    assert_eq!(response.headers()["x-request-id"], "big-body-1");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], 413);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["request_id"], "big-body-1");
}
