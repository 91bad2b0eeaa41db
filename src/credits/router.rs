use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::calculator::CreditSummary;
use super::delivery::DeliveryError;
use super::directory::{DirectoryError, IdentityDirectory};
use super::domain::{CourseCategory, CreditSheet, NationalId};
use super::extraction::ExtractionError;
use super::report::CreditReportView;
use super::service::{CreditService, CreditServiceError};
use super::{ResultNotifier, UsageLog};

/// Router builder exposing the credit endpoints over one service instance.
pub fn credit_router<D, N, L>(service: Arc<CreditService<D, N, L>>) -> Router
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    Router::new()
        .route("/api/v1/credits/report", post(report_handler::<D, N, L>))
        .route("/api/v1/credits/extract", post(extract_handler::<D, N, L>))
        .route("/api/v1/credits/results", post(send_results_handler::<D, N, L>))
        .route(
            "/api/v1/credits/verification/:member_id",
            get(verification_handler::<D, N, L>),
        )
        .route(
            "/api/v1/credits/verification/:member_id/register",
            post(register_handler::<D, N, L>),
        )
        .route(
            "/api/v1/credits/verification/:member_id/confirm",
            post(confirm_handler::<D, N, L>),
        )
        .route(
            "/api/v1/credits/recommendations/:category",
            get(recommendations_handler::<D, N, L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportRequest {
    #[serde(default)]
    pub(crate) sheet: CreditSheet,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReportResponse {
    pub(crate) summary: CreditSummary,
    pub(crate) report: CreditReportView,
}

pub(crate) async fn report_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Json(payload): Json<ReportRequest>,
) -> Json<ReportResponse>
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    let (summary, report) = service.report(&payload.sheet);
    Json(ReportResponse { summary, report })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractRequest {
    pub(crate) document_base64: String,
    #[serde(default)]
    pub(crate) sheet: CreditSheet,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtractResponse {
    pub(crate) sheet: CreditSheet,
    pub(crate) summary: CreditSummary,
}

pub(crate) async fn extract_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Json(payload): Json<ExtractRequest>,
) -> Response
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    // Accept either raw base64 or a full data URL.
    let encoded = payload
        .document_base64
        .split_once("base64,")
        .map(|(_, tail)| tail)
        .unwrap_or(&payload.document_base64);

    let document = match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(_) => {
            let payload = json!({ "error": "document_base64 is not valid base64" });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match service.extract_and_merge(&document, payload.sheet) {
        Ok((sheet, summary)) => {
            (StatusCode::OK, Json(ExtractResponse { sheet, summary })).into_response()
        }
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendResultsRequest {
    pub(crate) national_id: String,
    #[serde(default)]
    pub(crate) sheet: CreditSheet,
    #[serde(default)]
    pub(crate) snapshot_jpeg_base64: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendResultsResponse {
    pub(crate) national_id: String,
    pub(crate) email: String,
    pub(crate) total_points: f64,
    pub(crate) recorded_at: chrono::DateTime<chrono::Utc>,
}

pub(crate) async fn send_results_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Json(payload): Json<SendResultsRequest>,
) -> Response
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    let member_id = match NationalId::parse(&payload.national_id) {
        Ok(id) => id,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.send_results(member_id, payload.sheet, payload.snapshot_jpeg_base64) {
        Ok(export) => {
            let body = SendResultsResponse {
                national_id: export.member_id.to_string(),
                email: export.email.clone(),
                total_points: export.summary.total_points,
                recorded_at: export.recorded_at,
            };
            (StatusCode::ACCEPTED, Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn verification_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Path(member_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    let member_id = match NationalId::parse(&member_id) {
        Ok(id) => id,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.verification_status(&member_id) {
        Ok(status) => {
            let payload = json!({
                "national_id": member_id.to_string(),
                "status": status.label(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn register_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Path(member_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    let member_id = match NationalId::parse(&member_id) {
        Ok(id) => id,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.register_member(&member_id) {
        Ok(()) => {
            let payload = json!({
                "national_id": member_id.to_string(),
                "status": "pending",
            });
            (StatusCode::ACCEPTED, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn confirm_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Path(member_id): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    let member_id = match NationalId::parse(&member_id) {
        Ok(id) => id,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.confirm_member(&member_id) {
        Ok(()) => {
            let payload = json!({
                "national_id": member_id.to_string(),
                "status": "verified",
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn recommendations_handler<D, N, L>(
    State(service): State<Arc<CreditService<D, N, L>>>,
    Path(category): Path<String>,
) -> Response
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    let Some(category) = parse_category(&category) else {
        let payload = json!({ "error": "unknown course category" });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };

    match service.recommendations(category) {
        Ok(courses) => {
            let payload = json!({
                "category": category.label(),
                "courses": courses,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn parse_category(raw: &str) -> Option<CourseCategory> {
    match raw {
        "professional" => Some(CourseCategory::Professional),
        "quality_ethics_regulations" => Some(CourseCategory::QualityEthicsRegulations),
        "core" => Some(CourseCategory::Core),
        "cultural_new" => Some(CourseCategory::CulturalNew),
        _ => None,
    }
}

fn error_response(err: CreditServiceError) -> Response {
    let status = match &err {
        CreditServiceError::Extraction(ExtractionError::TooLarge { .. }) => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        CreditServiceError::Extraction(ExtractionError::NotPdf) => StatusCode::BAD_REQUEST,
        CreditServiceError::Extraction(_) => StatusCode::BAD_GATEWAY,
        CreditServiceError::Directory(DirectoryError::NotRegistered) => StatusCode::NOT_FOUND,
        CreditServiceError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        CreditServiceError::Delivery(DeliveryError::NoEmailOnFile)
        | CreditServiceError::Delivery(DeliveryError::InvalidEmail) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        CreditServiceError::Delivery(_) => StatusCode::BAD_GATEWAY,
        CreditServiceError::Catalog(_) => StatusCode::BAD_GATEWAY,
        CreditServiceError::MemberNotVerified { .. } => StatusCode::FORBIDDEN,
    };

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
