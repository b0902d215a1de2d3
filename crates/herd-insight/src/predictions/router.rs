use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{MeasurementRecord, OwnerId, PredictionId};
use super::report::ExportFormat;
use super::repository::PredictionRepository;
use super::service::{PredictionService, PredictionServiceError};
use crate::config::IdentityConfig;
use crate::error::AppError;

/// Shared handler state: the service plus the header carrying the caller identity.
pub struct PredictionRouterState<R> {
    pub(crate) service: Arc<PredictionService<R>>,
    pub(crate) owner_header: HeaderName,
}

impl<R> Clone for PredictionRouterState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            owner_header: self.owner_header.clone(),
        }
    }
}

impl<R> PredictionRouterState<R> {
    pub fn new(service: Arc<PredictionService<R>>, identity: &IdentityConfig) -> Self {
        Self {
            service,
            owner_header: identity.owner_header.clone(),
        }
    }

    fn owner(&self, headers: &HeaderMap) -> Option<OwnerId> {
        headers
            .get(&self.owner_header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| OwnerId(value.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub(crate) format: Option<ExportFormat>,
}

/// Router builder exposing prediction, history, and export endpoints.
pub fn prediction_router<R>(
    service: Arc<PredictionService<R>>,
    identity: &IdentityConfig,
) -> Router
where
    R: PredictionRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/predictions",
            post(create_handler::<R>)
                .get(list_handler::<R>)
                .delete(clear_handler::<R>),
        )
        .route("/api/v1/predictions/summary", get(summary_handler::<R>))
        .route("/api/v1/predictions/export", get(export_handler::<R>))
        .route("/api/v1/predictions/report", get(report_handler::<R>))
        .route(
            "/api/v1/predictions/:prediction_id",
            delete(delete_handler::<R>),
        )
        .with_state(PredictionRouterState::new(service, identity))
}

pub(crate) async fn create_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
    axum::Json(record): axum::Json<MeasurementRecord>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    match state.service.predict(owner.as_ref(), record) {
        Ok(stored) => (StatusCode::CREATED, axum::Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    match state.service.history(owner.as_ref()) {
        Ok(history) => (StatusCode::OK, axum::Json(history)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
    Path(prediction_id): Path<String>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    let id = PredictionId(prediction_id);
    match state.service.delete(owner.as_ref(), &id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn clear_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    match state.service.clear(owner.as_ref()) {
        Ok(deleted) => {
            (StatusCode::OK, axum::Json(json!({ "deleted": deleted }))).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn summary_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    match state.service.summary(owner.as_ref()) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn export_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
    Query(query): Query<ExportQuery>,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    let format = query.format.unwrap_or_default();
    match state.service.export(owner.as_ref(), format) {
        Ok(csv) => {
            let filename = format!(
                "attachment; filename=\"{}-{}.csv\"",
                format.file_stem(),
                Utc::now().date_naive()
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, filename),
                ],
                csv,
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn report_handler<R>(
    State(state): State<PredictionRouterState<R>>,
    headers: HeaderMap,
) -> Response
where
    R: PredictionRepository + 'static,
{
    let owner = state.owner(&headers);
    match state
        .service
        .farm_report(owner.as_ref(), Utc::now().date_naive())
    {
        Ok(report) => {
            let disposition = format!("attachment; filename=\"{}\"", report.file_name());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                report.render_html(),
            )
                .into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: PredictionServiceError) -> Response {
    AppError::from(err).into_response()
}
