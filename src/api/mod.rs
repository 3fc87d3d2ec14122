use axum::{
    Router,
    extract::Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::core::{
    BaselinePolicy, EmployerSummary, InflationSeries, RecordKind, SalaryRecord,
    build_employer_summaries, build_future_targets, build_gap_report, build_timeline, month_range,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiBaselineMode {
    #[serde(alias = "wholeHistory", alias = "whole_history", alias = "GLOBAL")]
    WholeHistory,
    #[serde(alias = "perEmployer", alias = "per_employer", alias = "PER_EMPLOYER")]
    PerEmployer,
    #[serde(alias = "lastIncrease", alias = "last_increase", alias = "LAST_INCREASE")]
    LastIncrease,
    #[serde(alias = "MANUAL")]
    Manual,
}

/// One request's worth of engine input, read as a single snapshot: the salary
/// records, baseline preferences, and the CPI series to project against.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SnapshotPayload {
    records: Vec<SalaryRecord>,
    baseline_mode: Option<ApiBaselineMode>,
    manual_record_id: Option<u64>,
    inflation_series: Option<InflationSeries>,
    today: Option<NaiveDate>,
}

#[derive(Debug)]
pub struct SnapshotRequest {
    pub records: Vec<SalaryRecord>,
    pub policy: BaselinePolicy,
    pub manual_record_id: Option<u64>,
    pub series: Option<InflationSeries>,
    pub today: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    summaries: Vec<EmployerSummary>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn parse_snapshot(json: &str) -> Result<SnapshotRequest, String> {
    let payload = serde_json::from_str::<SnapshotPayload>(json)
        .map_err(|e| format!("Invalid snapshot JSON: {e}"))?;
    build_snapshot(payload)
}

fn build_snapshot(payload: SnapshotPayload) -> Result<SnapshotRequest, String> {
    for (index, record) in payload.records.iter().enumerate() {
        if !record.amount.is_finite() || record.amount < 0.0 {
            return Err(format!(
                "records[{index}]: amount must be a finite value >= 0"
            ));
        }
        if record.kind == RecordKind::Bonus && record.end_date.is_none() {
            return Err(format!(
                "records[{index}]: bonus records require an end date so they can be amortized"
            ));
        }
        if let Some(end) = record.end_date {
            if end < record.effective_date {
                return Err(format!(
                    "records[{index}]: end date must be on or after the effective date"
                ));
            }
        }
    }

    // Duplicate effective dates are resolved deterministically downstream
    // (most recently created record wins), so a warning is enough here.
    let mut regular_dates: Vec<NaiveDate> = payload
        .records
        .iter()
        .filter(|record| record.kind == RecordKind::Regular)
        .map(|record| record.effective_date)
        .collect();
    regular_dates.sort();
    if regular_dates.windows(2).any(|pair| pair[0] == pair[1]) {
        warn!("snapshot contains regular records with identical effective dates");
    }

    let policy = match payload
        .baseline_mode
        .unwrap_or(ApiBaselineMode::WholeHistory)
    {
        ApiBaselineMode::WholeHistory => BaselinePolicy::WholeHistory,
        ApiBaselineMode::PerEmployer => BaselinePolicy::PerEmployer,
        ApiBaselineMode::LastIncrease => BaselinePolicy::LastIncrease,
        ApiBaselineMode::Manual => BaselinePolicy::Manual {
            record_id: payload.manual_record_id,
        },
    };

    Ok(SnapshotRequest {
        records: payload.records,
        policy,
        manual_record_id: payload.manual_record_id,
        series: payload.inflation_series,
        today: payload.today.unwrap_or_else(|| Utc::now().date_naive()),
    })
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/timeline", post(timeline_handler))
        .route("/api/summary", post(summary_handler))
        .route("/api/gaps", post(gaps_handler))
        .route("/api/targets", post(targets_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("paywatch HTTP API listening on http://{addr}");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, serde_json::json!({ "status": "ok" }))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn timeline_handler(Json(payload): Json<SnapshotPayload>) -> Response {
    let request = match build_snapshot(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let timeline = build_timeline(
        &request.records,
        &request.policy,
        request.series.as_ref(),
        request.today,
    );
    json_response(StatusCode::OK, timeline)
}

async fn summary_handler(Json(payload): Json<SnapshotPayload>) -> Response {
    let request = match build_snapshot(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let timeline = build_timeline(
        &request.records,
        &request.policy,
        request.series.as_ref(),
        request.today,
    );
    let summaries = build_employer_summaries(&timeline, &request.records);
    json_response(StatusCode::OK, SummaryResponse { summaries })
}

async fn gaps_handler(Json(payload): Json<SnapshotPayload>) -> Response {
    let request = match build_snapshot(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let Some(series) = request.series.as_ref() else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "inflationSeries is required for a gap report",
        );
    };
    let range = month_range(&request.records, request.today);
    json_response(StatusCode::OK, build_gap_report(&range, series))
}

async fn targets_handler(Json(payload): Json<SnapshotPayload>) -> Response {
    let request = match build_snapshot(payload) {
        Ok(request) => request,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };
    let targets = build_future_targets(
        &request.records,
        request.series.as_ref(),
        request.manual_record_id,
    );
    json_response(StatusCode::OK, targets)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
