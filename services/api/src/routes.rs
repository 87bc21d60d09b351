use crate::infra::{deserialize_optional_date, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sprint_report::error::AppError;
use sprint_report::workflows::jira::JiraExportImporter;
use sprint_report::workflows::sprint::{
    ExportOverview, Hierarchy, ReportBuilder, SprintAnalysis, SprintKpis, SprintMetadata,
    XLSX_CONTENT_TYPE,
};
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct SprintAnalysisRequest {
    /// Raw text of the Jira CSV export.
    pub(crate) csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SprintAnalysisResponse {
    pub(crate) overview: ExportOverview,
    pub(crate) hierarchy: Hierarchy,
    pub(crate) kpis: SprintKpis,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SprintReportRequest {
    pub(crate) sprint: SprintMetadata,
    pub(crate) csv: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn sprint_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/sprint/analysis",
            axum::routing::post(sprint_analysis_endpoint),
        )
        .route(
            "/api/v1/sprint/report",
            axum::routing::post(sprint_report_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn sprint_analysis_endpoint(
    Json(payload): Json<SprintAnalysisRequest>,
) -> Result<Json<SprintAnalysisResponse>, AppError> {
    let rows = JiraExportImporter::from_reader(Cursor::new(payload.csv.into_bytes()))?;
    let overview = ExportOverview::from_rows(&rows);
    let SprintAnalysis { hierarchy, kpis } = SprintAnalysis::from_rows(&rows);

    Ok(Json(SprintAnalysisResponse {
        overview,
        hierarchy,
        kpis,
    }))
}

pub(crate) async fn sprint_report_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<SprintReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let SprintReportRequest { sprint, csv, today } = payload;

    let metadata = sprint.normalized();
    metadata.validate()?;

    let rows = JiraExportImporter::from_reader(Cursor::new(csv.into_bytes()))?;
    let analysis = SprintAnalysis::from_rows(&rows);
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let report = ReportBuilder::new(state.report.as_ref().clone()).build(
        &metadata,
        &analysis,
        today,
    )?;
    info!(
        sprint = metadata.sprint_number,
        rows = rows.len(),
        file = %report.file_name,
        "sprint report served"
    );

    let disposition = format!("attachment; filename=\"{}\"", report.file_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.bytes,
    ))
}
