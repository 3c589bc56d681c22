// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the issue/RFI API.
//!
//! Each handler moves its owned inputs into [`TrackerHandle::call`] and maps
//! the result to a status code. Request and response bodies are camelCase JSON.

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use sl_core::{
    IssueUpdate, NewAttachment, NewComment, NewIssue, NewLink, NewProject, NewUser, NewWorkTask,
    Status, StatusChange,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::handle::TrackerHandle;

pub struct AppState {
    pub tracker: TrackerHandle,
    /// Bearer token required on every route except `/health`.
    pub api_token: Option<String>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(tracker: TrackerHandle, api_token: Option<String>) -> Self {
        AppState { tracker, api_token }
    }
}

/// JSON body extractor whose rejections render as `ApiError::BadRequest`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Path extractor whose rejections render as `ApiError::BadRequest`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub is_rfi: Option<bool>,
}

/// Status patch body: a bare status string or a `{status, slaMinutes}` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StatusPatch {
    Bare(Status),
    Change(StatusChange),
}

impl From<StatusPatch> for StatusChange {
    fn from(patch: StatusPatch) -> Self {
        match patch {
            StatusPatch::Bare(status) => StatusChange::to(status),
            StatusPatch::Change(change) => change,
        }
    }
}

/// Routes that sit behind the bearer-token guard.
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects/{id}", get(get_project).delete(deactivate_project))
        .route("/projects/{id}/tasks", post(create_work_task))
        .route("/users", post(create_user))
        .route("/issues", post(create_issue))
        .route("/issues/project/{project_id}", get(list_issues))
        .route(
            "/issues/{id}",
            get(get_issue).put(update_issue).delete(delete_issue),
        )
        .route("/issues/{id}/status", patch(update_status))
        .route("/issues/{id}/attachments", post(add_attachment))
        .route(
            "/issues/{id}/comments",
            get(list_comments).post(add_comment),
        )
        .route("/issues/{id}/links", post(add_link))
        .route("/issues/{id}/links/{link_id}", delete(remove_link))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Rejects requests without the configured bearer token.
pub async fn require_token(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_token.as_deref() {
        let presented = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim);
        if presented != Some(expected) {
            return Err(ApiError::Unauthorized);
        }
    }
    Ok(next.run(req).await)
}

// -- Projects, users and work tasks --

async fn create_project(
    State(state): State<SharedState>,
    AppJson(req): AppJson<NewProject>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.tracker.call(move |t| t.create_project(&req)).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.tracker.call(move |t| t.get_project(id)).await?;
    Ok(Json(project))
}

async fn deactivate_project(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tracker.call(move |t| t.deactivate_project(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_work_task(
    State(state): State<SharedState>,
    AppPath(project_id): AppPath<Uuid>,
    AppJson(req): AppJson<NewWorkTask>,
) -> Result<impl IntoResponse, ApiError> {
    let task = state
        .tracker
        .call(move |t| t.create_work_task(project_id, &req))
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn create_user(
    State(state): State<SharedState>,
    AppJson(req): AppJson<NewUser>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.tracker.call(move |t| t.create_user(&req)).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

// -- Issues --

async fn list_issues(
    State(state): State<SharedState>,
    AppPath(project_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let issues = state
        .tracker
        .call(move |t| t.list_issues(project_id, query.is_rfi))
        .await?;
    Ok(Json(issues))
}

async fn get_issue(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.tracker.call(move |t| t.get_issue(id)).await?;
    Ok(Json(detail))
}

async fn create_issue(
    State(state): State<SharedState>,
    AppJson(req): AppJson<NewIssue>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.tracker.call(move |t| t.create_issue(&req)).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

async fn update_status(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<StatusPatch>,
) -> Result<StatusCode, ApiError> {
    let change = StatusChange::from(patch);
    state
        .tracker
        .call(move |t| t.update_status(id, change))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_issue(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<IssueUpdate>,
) -> Result<StatusCode, ApiError> {
    state
        .tracker
        .call(move |t| t.update_issue(id, &req))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_issue(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.tracker.call(move |t| t.delete_issue(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// -- Threads and links --

async fn add_attachment(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<NewAttachment>,
) -> Result<impl IntoResponse, ApiError> {
    let attachment = state
        .tracker
        .call(move |t| t.add_attachment(id, &req))
        .await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

async fn add_comment(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<NewComment>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state.tracker.call(move |t| t.add_comment(id, &req)).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn list_comments(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let comments = state.tracker.call(move |t| t.get_comments(id)).await?;
    Ok(Json(comments))
}

async fn add_link(
    State(state): State<SharedState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<NewLink>,
) -> Result<impl IntoResponse, ApiError> {
    let link = state.tracker.call(move |t| t.add_link(id, &req)).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

async fn remove_link(
    State(state): State<SharedState>,
    AppPath((id, link_id)): AppPath<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .tracker
        .call(move |t| t.remove_link(id, link_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
