//! Report API handlers
//!
//! Reports are computed on every request against the current instant, so
//! open operations report more hours each time they are fetched.

use ag_core::types::ReportWindow;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::export::{self, ReportSheet};
use crate::extractors::AppState;
use crate::response::ApiResponse;

#[derive(Debug, Default, Deserialize)]
pub struct DailyQuery {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyQuery {
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YearlyQuery {
    pub year: Option<String>,
}

fn render(sheet: &ReportSheet<'_>, state: &AppState) -> ApiResult<Response> {
    let bytes = export::report_workbook(sheet, state.config.reports.hours_precision).map_err(|e| {
        tracing::error!(error = %e, report = sheet.title, "Failed to write Excel file");
        ApiError::internal("Failed to write Excel file")
    })?;
    Ok(export::download(&sheet.filename(), bytes))
}

/// GET /reports/daily?date=YYYY-MM-DD
pub async fn daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let window = ReportWindow::parse_day(query.date.as_deref(), now.date_naive())?;
    let report = state.reports().daily(&window, now).await?;
    Ok(ApiResponse::ok("Daily report generated successfully", report))
}

/// GET /reports/daily/export?date=YYYY-MM-DD
pub async fn export_daily_report(
    State(state): State<AppState>,
    Query(query): Query<DailyQuery>,
) -> ApiResult<Response> {
    let now = Utc::now();
    let window = ReportWindow::parse_day(query.date.as_deref(), now.date_naive())?;
    let report = state.reports().daily(&window, now).await?;
    render(&ReportSheet::daily(&report), &state)
}

/// GET /reports/monthly?month=YYYY-MM
pub async fn monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let window = ReportWindow::parse_month(query.month.as_deref(), now.date_naive())?;
    let report = state.reports().period(&window, now).await?;
    Ok(ApiResponse::ok("Monthly report generated successfully", report))
}

/// GET /reports/monthly/export?month=YYYY-MM
pub async fn export_monthly_report(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<Response> {
    let now = Utc::now();
    let window = ReportWindow::parse_month(query.month.as_deref(), now.date_naive())?;
    let report = state.reports().period(&window, now).await?;
    render(&ReportSheet::monthly(&report), &state)
}

/// GET /reports/yearly?year=YYYY
pub async fn yearly_report(
    State(state): State<AppState>,
    Query(query): Query<YearlyQuery>,
) -> ApiResult<impl IntoResponse> {
    let now = Utc::now();
    let window = ReportWindow::parse_year(query.year.as_deref(), now.date_naive())?;
    let report = state.reports().period(&window, now).await?;
    Ok(ApiResponse::ok("Yearly report generated successfully", report))
}

/// GET /reports/yearly/export?year=YYYY
pub async fn export_yearly_report(
    State(state): State<AppState>,
    Query(query): Query<YearlyQuery>,
) -> ApiResult<Response> {
    let now = Utc::now();
    let window = ReportWindow::parse_year(query.year.as_deref(), now.date_naive())?;
    let report = state.reports().period(&window, now).await?;
    render(&ReportSheet::yearly(&report), &state)
}
