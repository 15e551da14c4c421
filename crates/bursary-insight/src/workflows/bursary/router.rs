use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::report::views::{BursaryReport, DatasetOverview};
use super::report::ProvinceFilter;
use super::service::{BursaryReportService, ReportServiceError};
use crate::error::AppError;

/// Body shared by the report and export endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Omitted selects every province.
    #[serde(default)]
    pub provinces: Option<Vec<String>>,
    #[serde(default)]
    pub generated_on: Option<NaiveDate>,
}

impl ReportRequest {
    /// An empty body is the default request: every province, dated today.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }

    fn filter(&self) -> ProvinceFilter {
        ProvinceFilter::from_selection(self.provinces.clone())
    }
}

/// Router builder exposing the dashboard, export, and reload endpoints.
pub fn bursary_router(service: Arc<BursaryReportService>) -> Router {
    Router::new()
        .route("/api/v1/provinces", get(provinces_handler))
        .route("/api/v1/report", post(report_handler))
        .route("/api/v1/export", post(export_handler))
        .route("/api/v1/dataset/reload", post(reload_handler))
        .with_state(service)
}

/// Dataset loads touch the filesystem, so they run off the async workers.
async fn blocking<T, F>(task: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ReportServiceError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(task).await??)
}

pub(crate) async fn provinces_handler(
    State(service): State<Arc<BursaryReportService>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let provinces = blocking(move || service.provinces()).await?;
    Ok(Json(json!({ "provinces": provinces })))
}

pub(crate) async fn report_handler(
    State(service): State<Arc<BursaryReportService>>,
    body: Bytes,
) -> Result<Json<BursaryReport>, AppError> {
    let request = ReportRequest::from_body(&body).map_err(AppError::InvalidRequest)?;
    let filter = request.filter();
    let generated_on = request
        .generated_on
        .unwrap_or_else(|| Local::now().date_naive());
    let report = blocking(move || service.report(&filter, generated_on)).await?;
    Ok(Json(report))
}

pub(crate) async fn export_handler(
    State(service): State<Arc<BursaryReportService>>,
    body: Bytes,
) -> Result<Response, AppError> {
    let request = ReportRequest::from_body(&body).map_err(AppError::InvalidRequest)?;
    let filter = request.filter();
    let disposition = format!("attachment; filename=\"{}\"", service.export_file_name());
    let body = blocking(move || service.export_csv(&filter)).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub(crate) async fn reload_handler(
    State(service): State<Arc<BursaryReportService>>,
) -> Result<Json<DatasetOverview>, AppError> {
    let overview = blocking(move || service.reload()).await?;
    Ok(Json(overview))
}
