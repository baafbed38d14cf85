use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::error::{OutlineError, StoreError};
use crate::models::*;
use crate::outline::{self, EffectiveDates, Timeline};
use crate::render::render_outline;
use crate::store::DocumentStore;

// ============================================================
// Error Handling
// ============================================================

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Map a store failure to a response.
///
/// Conflicts carry the current document so the client can rebase. Edit
/// validation errors are exposed as-is; anything else is logged server-side
/// and returned as a generic 500.
fn store_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Conflict { current, .. } => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "conflict", "current": current })),
        ),
        StoreError::Outline(err @ OutlineError::UnknownTask(_)) => {
            tracing::warn!("Validation error: {}", err);
            error_response(StatusCode::NOT_FOUND, err.to_string())
        }
        StoreError::Outline(err @ OutlineError::UnknownParent(_)) => {
            tracing::warn!("Validation error: {}", err);
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        other => {
            tracing::error!("Internal error: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
        }
    }
}

fn bad_body(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::JsonSyntaxError(_) => "Invalid JSON".to_string(),
        other => other.body_text(),
    };
    tracing::warn!("Rejected request body: {}", message);
    error_response(StatusCode::BAD_REQUEST, message)
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

pub async fn not_found() -> ApiError {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

// ============================================================
// Document
// ============================================================

pub async fn get_doc(State(store): State<DocumentStore>) -> Json<StoredDocument> {
    Json(store.current())
}

pub async fn put_doc(
    State(store): State<DocumentStore>,
    payload: Result<Json<PutDocumentInput>, JsonRejection>,
) -> Result<Json<StoredDocument>, ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    store
        .replace(input.base_revision, input.doc)
        .map(Json)
        .map_err(store_error)
}

pub async fn get_effective_dates(State(store): State<DocumentStore>) -> Json<EffectiveDates> {
    let snapshot = store.current();
    Json(outline::resolve(&snapshot.doc.tasks))
}

/// Either the padded grid or `{"empty": true}` when nothing visible is dated.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TimelineResponse {
    Grid(Timeline),
    Empty { empty: bool },
}

pub async fn get_timeline(State(store): State<DocumentStore>) -> Json<TimelineResponse> {
    let snapshot = store.current();
    Json(match outline::build_timeline(&snapshot.doc.tasks) {
        Some(timeline) => TimelineResponse::Grid(timeline),
        None => TimelineResponse::Empty { empty: true },
    })
}

pub async fn get_outline(State(store): State<DocumentStore>) -> impl IntoResponse {
    let snapshot = store.current();
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_outline(&snapshot.doc.tasks),
    )
}

// ============================================================
// Tasks
// ============================================================

pub async fn list_in_progress(State(store): State<DocumentStore>) -> Json<Vec<Task>> {
    let snapshot = store.current();
    Json(
        snapshot
            .doc
            .tasks
            .into_iter()
            .filter(|t| !t.done)
            .collect(),
    )
}

pub async fn create_task(
    State(store): State<DocumentStore>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskCreated>), ApiError> {
    let Json(input) = payload.map_err(bad_body)?;

    let mut task_id = None;
    let document = store
        .update(|tasks| {
            let (next, id) = outline::insert_task(tasks, input.parent_id.as_deref(), &input.title)?;
            task_id = Some(id);
            Ok(Some(next))
        })
        .map_err(store_error)?;

    let task_id = task_id.ok_or_else(|| {
        tracing::error!("Insert committed without producing a task id");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
    })?;
    Ok((StatusCode::CREATED, Json(TaskCreated { task_id, document })))
}

pub async fn delete_task(
    State(store): State<DocumentStore>,
    Path(id): Path<String>,
) -> Result<Json<StoredDocument>, ApiError> {
    store
        .update(|tasks| outline::delete_subtree(tasks, &id).map(Some))
        .map(Json)
        .map_err(store_error)
}

pub async fn sort_children(
    State(store): State<DocumentStore>,
    payload: Result<Json<SortChildrenInput>, JsonRejection>,
) -> Result<Json<StoredDocument>, ApiError> {
    let Json(input) = payload.map_err(bad_body)?;
    store
        .update(|tasks| outline::sort_children_by_date(tasks, input.parent_id.as_deref()))
        .map(Json)
        .map_err(store_error)
}
