//! Bug submission endpoints
//!
//! Both flows classify first and persist only after classification has
//! completed successfully. Nothing is written when classification fails.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use sevtrack_common::models::resolve_severity;
use sevtrack_common::{BugRecord, BugReport, NewBug};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Title and description are required.";
pub const INVALID_BATCH_MESSAGE: &str = "Invalid bug data. Expected an array of bugs.";

/// Response for POST /api/bugs/single
#[derive(Debug, Serialize)]
pub struct SingleBugResponse {
    pub message: String,
    pub bug: BugRecord,
}

/// Response for POST /api/bugs/upload
#[derive(Debug, Serialize)]
pub struct BatchUploadResponse {
    pub message: String,
    pub count: usize,
}

/// Build bug routes
pub fn bug_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bugs/single", post(submit_single))
        .route("/api/bugs/upload", post(submit_batch))
        .route("/api/bugs/:id", get(get_bug))
}

/// POST /api/bugs/single
///
/// Body: `{"title": "...", "description": "..."}`
pub async fn submit_single(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SingleBugResponse>)> {
    let Json(body) = payload.map_err(invalid_json)?;
    let report = report_from_value(&body)
        .ok_or_else(|| ApiError::Validation(REQUIRED_FIELDS_MESSAGE.to_string()))?;

    let label = state.classifier.classify_one(&report).await?;
    let bug = state.store.save_one(NewBug::classified(report, Some(label))).await?;

    info!(id = %bug.id, severity = ?bug.severity, "Saved bug report");

    Ok((
        StatusCode::CREATED,
        Json(SingleBugResponse {
            message: "Bug report saved successfully!".to_string(),
            bug,
        }),
    ))
}

/// POST /api/bugs/upload
///
/// Body: non-empty array of `{"title": "...", "description": "..."}` objects.
/// The whole batch goes to the classifier in one call.
pub async fn submit_batch(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BatchUploadResponse>)> {
    let Json(body) = payload.map_err(invalid_json)?;
    let items = match body {
        Value::Array(items) if !items.is_empty() => items,
        _ => return Err(ApiError::Validation(INVALID_BATCH_MESSAGE.to_string())),
    };

    let pairs: Vec<[Option<String>; 2]> = items
        .iter()
        .map(|item| [batch_field(item, "title"), batch_field(item, "description")])
        .collect();

    let labels = state.classifier.classify_batch(&pairs).await?;
    let bugs = merge_severities(pairs, &labels);
    let count = state.store.save_many(bugs).await?;

    info!(count, labels = labels.len(), "Saved bug report batch");

    Ok((
        StatusCode::CREATED,
        Json(BatchUploadResponse {
            message: format!("{} bug reports saved successfully!", count),
            count,
        }),
    ))
}

/// GET /api/bugs/:id
pub async fn get_bug(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BugRecord>> {
    let not_found = || ApiError::NotFound(format!("Bug not found: {}", id));

    let uuid = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let bug = state.store.find_by_id(uuid).await?.ok_or_else(not_found)?;

    Ok(Json(bug))
}

/// Pair each projected report with the label at the same index
///
/// A missing index or an empty label yields the `"Unknown"` sentinel; the
/// batch is never failed for an incomplete classifier response.
pub fn merge_severities(pairs: Vec<[Option<String>; 2]>, labels: &[Option<String>]) -> Vec<NewBug> {
    pairs
        .into_iter()
        .enumerate()
        .map(|(i, [title, description])| NewBug {
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            severity: Some(resolve_severity(labels.get(i).cloned().flatten())),
        })
        .collect()
}

fn report_from_value(body: &Value) -> Option<BugReport> {
    let title = text_field(body, "title").filter(|t| !t.is_empty())?;
    let description = text_field(body, "description").filter(|d| !d.is_empty())?;
    Some(BugReport { title, description })
}

/// String field of a JSON object; absent for non-objects and non-strings
fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Batch element field as text: numbers and booleans keep their JSON text,
/// `null`, objects and arrays are absent
fn batch_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn invalid_json(rejection: JsonRejection) -> ApiError {
    ApiError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
}
