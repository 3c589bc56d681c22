// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sl_core::{ManualClock, TransitionPolicy};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
}

fn app_with(policy: TransitionPolicy, token: Option<&str>) -> TestApp {
    let clock = Arc::new(ManualClock::new(start()));
    let db = Database::open_in_memory().unwrap();
    let tracker = Tracker::with_clock(db, clock.clone()).with_policy(policy);
    let state = Arc::new(AppState::new(
        TrackerHandle::new(tracker),
        token.map(str::to_string),
    ));
    TestApp {
        router: build_router(state, &Config::default().cors_origins),
        clock,
    }
}

fn app() -> TestApp {
    app_with(TransitionPolicy::Permissive, None)
}

impl TestApp {
    async fn request(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(req).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn create_project(&self, name: &str) -> String {
        let (status, body) = self
            .send("POST", "/projects", Some(json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_issue(&self, body: Value) -> Value {
        let (status, body) = self.send("POST", "/issues", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    serde_json::from_value(value.clone()).unwrap()
}

#[tokio::test]
async fn health_check() {
    let (status, body) = app().get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn issue_lifecycle_end_to_end() {
    let app = app();
    let project = app.create_project("Tower A").await;

    let issue = app
        .create_issue(json!({
            "projectId": project,
            "title": "Leak in basement",
            "type": "execution",
            "priority": "p2_high",
            "isRfi": false,
        }))
        .await;
    assert_eq!(issue["status"], "open");
    assert_eq!(issue["referenceCode"], "ISS-20260301-0001");
    assert_eq!(issue["type"], "execution");
    assert_eq!(issue["attachments"], json!([]));
    let id = issue["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/issues/{id}/status"),
            Some(json!({ "status": "awaiting_response", "slaMinutes": 120 })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, detail) = app.get(&format!("/issues/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "awaiting_response");
    assert_eq!(detail["slaMinutes"], 120);
    assert_eq!(
        timestamp(&detail["responseDueDate"]),
        start() + Duration::minutes(120)
    );

    app.clock.advance(Duration::minutes(45));
    let (status, _) = app
        .send(
            "PATCH",
            &format!("/issues/{id}/status"),
            Some(json!("resolved")),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, detail) = app.get(&format!("/issues/{id}")).await;
    assert_eq!(detail["status"], "resolved");
    assert_eq!(
        timestamp(&detail["resolvedAt"]),
        start() + Duration::minutes(45)
    );
    assert!(detail.get("respondedAt").is_none());
}

#[tokio::test]
async fn rfi_resolution_records_response() {
    let app = app();
    let project = app.create_project("Tower A").await;

    let issue = app
        .create_issue(json!({
            "projectId": project,
            "title": "Rebar spacing",
            "isRfi": true,
            "rfiQuestion": "Confirm rebar spec",
        }))
        .await;
    assert_eq!(issue["isRfi"], true);
    assert_eq!(issue["rfiQuestion"], "Confirm rebar spec");
    assert_eq!(issue["priority"], "p3_medium");
    let id = issue["id"].as_str().unwrap();

    app.clock.advance(Duration::hours(2));
    let (status, _) = app
        .send(
            "PATCH",
            &format!("/issues/{id}/status"),
            Some(json!("resolved")),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, detail) = app.get(&format!("/issues/{id}")).await;
    let expected = start() + Duration::hours(2);
    assert_eq!(timestamp(&detail["resolvedAt"]), expected);
    assert_eq!(timestamp(&detail["respondedAt"]), expected);
}

#[tokio::test]
async fn same_day_codes_are_sequential_per_project() {
    let app = app();
    let tower = app.create_project("Tower A").await;
    let garage = app.create_project("Garage").await;

    for expected in ["ISS-20260301-0001", "ISS-20260301-0002"] {
        let issue = app
            .create_issue(json!({ "projectId": tower, "title": "Crack" }))
            .await;
        assert_eq!(issue["referenceCode"], expected);
    }

    let issue = app
        .create_issue(json!({ "projectId": garage, "title": "Crack" }))
        .await;
    assert_eq!(issue["referenceCode"], "ISS-20260301-0001");

    app.clock.advance(Duration::days(1));
    let issue = app
        .create_issue(json!({ "projectId": tower, "title": "Crack" }))
        .await;
    assert_eq!(issue["referenceCode"], "ISS-20260302-0001");
}

#[tokio::test]
async fn list_filters_by_rfi_flag() {
    let app = app();
    let project = app.create_project("Tower A").await;
    app.create_issue(json!({ "projectId": project, "title": "Defect" }))
        .await;
    app.clock.advance(Duration::minutes(1));
    app.create_issue(json!({
        "projectId": project,
        "title": "Question",
        "isRfi": true,
        "rfiQuestion": "Which grout?",
    }))
    .await;

    let (status, all) = app.get(&format!("/issues/project/{project}")).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Question", "Defect"]);

    let (_, rfis) = app
        .get(&format!("/issues/project/{project}?isRfi=true"))
        .await;
    assert_eq!(rfis.as_array().unwrap().len(), 1);
    assert_eq!(rfis[0]["title"], "Question");

    let (_, issues) = app
        .get(&format!("/issues/project/{project}?isRfi=false"))
        .await;
    assert_eq!(issues.as_array().unwrap().len(), 1);
    assert_eq!(issues[0]["title"], "Defect");
}

#[tokio::test]
async fn soft_deleted_issue_is_hidden() {
    let app = app();
    let project = app.create_project("Tower A").await;
    let issue = app
        .create_issue(json!({ "projectId": project, "title": "Leak" }))
        .await;
    let id = issue["id"].as_str().unwrap();

    let (status, _) = app.send("DELETE", &format!("/issues/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/issues/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("issue not found"));

    let (_, list) = app.get(&format!("/issues/project/{project}")).await;
    assert_eq!(list, json!([]));

    let (status, _) = app.send("DELETE", &format!("/issues/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_thread_with_attachments() {
    let app = app();
    let project = app.create_project("Tower A").await;
    let (status, user) = app
        .send(
            "POST",
            "/users",
            Some(json!({ "email": "ana@site.test", "firstName": "Ana", "lastName": "Reyes" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let user_id = user["id"].as_str().unwrap();

    let issue = app
        .create_issue(json!({ "projectId": project, "title": "Leak" }))
        .await;
    let id = issue["id"].as_str().unwrap();

    let (status, comment) = app
        .send(
            "POST",
            &format!("/issues/{id}/comments"),
            Some(json!({
                "message": "Photos attached",
                "authorId": user_id,
                "attachments": [
                    { "fileName": "north.jpg", "fileUrl": "https://files.test/north.jpg", "contentType": "image/jpeg", "fileSize": 2048 },
                    { "fileName": "south.jpg", "fileUrl": "https://files.test/south.jpg" },
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["authorName"], "Ana Reyes");
    let comment_id = comment["id"].as_str().unwrap();
    let attachments = comment["attachments"].as_array().unwrap();
    assert_eq!(attachments.len(), 2);
    for attachment in attachments {
        assert_eq!(attachment["commentId"], comment_id);
        assert_eq!(attachment["issueId"], id);
    }
    assert_eq!(attachments[1]["contentType"], "application/octet-stream");

    let (status, _) = app
        .send(
            "POST",
            &format!("/issues/{id}/attachments"),
            Some(json!({ "fileName": "plan.pdf", "fileUrl": "https://files.test/plan.pdf" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, comments) = app.get(&format!("/issues/{id}/comments")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["attachments"].as_array().unwrap().len(), 2);

    let (_, detail) = app.get(&format!("/issues/{id}")).await;
    assert_eq!(detail["attachments"].as_array().unwrap().len(), 1);
    assert_eq!(detail["attachments"][0]["fileName"], "plan.pdf");
}

#[tokio::test]
async fn link_removal_requires_matching_issue() {
    let app = app();
    let project = app.create_project("Tower A").await;
    let first = app
        .create_issue(json!({ "projectId": project, "title": "Leak" }))
        .await;
    let second = app
        .create_issue(json!({ "projectId": project, "title": "Crack" }))
        .await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    let (status, link) = app
        .send(
            "POST",
            &format!("/issues/{first_id}/links"),
            Some(json!({ "linkType": "document", "externalReference": "DWG-A-101", "label": "Drawing" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(link["linkType"], "document");
    let link_id = link["id"].as_str().unwrap();

    let (status, _) = app
        .send(
            "DELETE",
            &format!("/issues/{second_id}/links/{link_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, detail) = app.get(&format!("/issues/{first_id}")).await;
    assert_eq!(detail["links"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .send("DELETE", &format!("/issues/{first_id}/links/{link_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, detail) = app.get(&format!("/issues/{first_id}")).await;
    assert_eq!(detail["links"], json!([]));
}

#[tokio::test]
async fn full_update_replaces_fields_and_records_answer() {
    let app = app();
    let project = app.create_project("Tower A").await;
    let issue = app
        .create_issue(json!({
            "projectId": project,
            "title": "Rebar spacing",
            "isRfi": true,
            "rfiQuestion": "Confirm rebar spec",
        }))
        .await;
    let id = issue["id"].as_str().unwrap();

    app.clock.advance(Duration::minutes(10));
    let (status, _) = app
        .send(
            "PUT",
            &format!("/issues/{id}"),
            Some(json!({
                "title": "Rebar spacing at grid C",
                "type": "design",
                "priority": "p1_critical",
                "status": "in_analysis",
                "rfiAnswer": "Use #5 bars at 200mm",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, detail) = app.get(&format!("/issues/{id}")).await;
    assert_eq!(detail["title"], "Rebar spacing at grid C");
    assert_eq!(detail["priority"], "p1_critical");
    assert_eq!(detail["status"], "in_analysis");
    assert_eq!(detail["rfiAnswer"], "Use #5 bars at 200mm");
    assert!(detail.get("rfiQuestion").is_none());
    assert_eq!(
        timestamp(&detail["respondedAt"]),
        start() + Duration::minutes(10)
    );

    let (status, body) = app
        .send(
            "PUT",
            &format!("/issues/{id}"),
            Some(json!({ "title": "No status", "type": "design", "priority": "p1_critical" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn strict_policy_rejects_reopening() {
    let strict = app_with(TransitionPolicy::Strict, None);
    let project = strict.create_project("Tower A").await;
    let issue = strict
        .create_issue(json!({ "projectId": project, "title": "Leak" }))
        .await;
    let id = issue["id"].as_str().unwrap();

    let uri = format!("/issues/{id}/status");
    let (status, _) = strict.send("PATCH", &uri, Some(json!("closed"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = strict.send("PATCH", &uri, Some(json!("open"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("cannot go from closed to open"));

    let permissive = app();
    let project = permissive.create_project("Tower A").await;
    let issue = permissive
        .create_issue(json!({ "projectId": project, "title": "Leak" }))
        .await;
    let uri = format!("/issues/{}/status", issue["id"].as_str().unwrap());
    let (status, _) = permissive.send("PATCH", &uri, Some(json!("closed"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = permissive.send("PATCH", &uri, Some(json!("open"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn inactive_project_rejects_new_issues() {
    let app = app();
    let project = app.create_project("Tower A").await;

    let (status, _) = app
        .send("DELETE", &format!("/projects/{project}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/projects/{project}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isDeleted"], true);

    let (status, _) = app
        .send(
            "POST",
            "/issues",
            Some(json!({ "projectId": project, "title": "Leak" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            &format!("/projects/{project}/tasks"),
            Some(json!({ "title": "Pour slab" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn work_task_title_is_projected() {
    let app = app();
    let project = app.create_project("Tower A").await;
    let (status, task) = app
        .send(
            "POST",
            &format!("/projects/{project}/tasks"),
            Some(json!({ "title": "Pour slab L2" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let issue = app
        .create_issue(json!({
            "projectId": project,
            "title": "Honeycombing",
            "workTaskId": task["id"],
        }))
        .await;
    assert_eq!(issue["workTaskTitle"], "Pour slab L2");
}

#[tokio::test]
async fn malformed_requests_are_bad_requests() {
    let app = app();

    let (status, body) = app.get("/issues/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let req = Request::builder()
        .method("POST")
        .uri("/projects")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let (status, body) = app.request(req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let project = app.create_project("Tower A").await;
    let (status, _) = app
        .send(
            "POST",
            "/issues",
            Some(json!({ "projectId": project, "title": "Leak", "priority": "urgent" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "POST",
            "/issues",
            Some(json!({ "projectId": project, "title": "   " })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title cannot be empty");
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();
    let missing = uuid::Uuid::new_v4();

    let (status, _) = app.get(&format!("/issues/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/projects/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/issues/{missing}/status"),
            Some(json!("resolved")),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&format!("/issues/{missing}/comments")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bearer_token_guards_api_routes() {
    let app = app_with(TransitionPolicy::Permissive, Some("s3cret"));

    let (status, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send("POST", "/projects", Some(json!({ "name": "Tower A" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let wrong = Request::builder()
        .method("POST")
        .uri("/projects")
        .header("content-type", "application/json")
        .header("authorization", "Bearer nope")
        .body(Body::from(json!({ "name": "Tower A" }).to_string()))
        .unwrap();
    let (status, _) = app.request(wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let right = Request::builder()
        .method("POST")
        .uri("/projects")
        .header("content-type", "application/json")
        .header("authorization", "Bearer s3cret")
        .body(Body::from(json!({ "name": "Tower A" }).to_string()))
        .unwrap();
    let (status, body) = app.request(right).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Tower A");
}

#[tokio::test]
async fn cors_allows_configured_origin() {
    let app = app();
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/issues")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:5173"
    );
}
