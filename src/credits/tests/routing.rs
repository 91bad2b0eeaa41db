use std::sync::Arc;

use axum::body::to_bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::Value;

use super::common::*;
use crate::credits::extraction::{PartialCreditSheet, PartialModeSplit};
use crate::credits::router::{
    confirm_handler, extract_handler, recommendations_handler, register_handler, report_handler,
    send_results_handler, verification_handler, ExtractRequest, ReportRequest, SendResultsRequest,
};

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

#[tokio::test]
async fn report_endpoint_returns_summary_and_view() {
    let fixture = default_fixture();

    let Json(body) = report_handler(
        State(fixture.service.clone()),
        Json(ReportRequest {
            sheet: double_capped_sheet(),
        }),
    )
    .await;

    assert_eq!(body.summary.total_points, 50.0);
    assert_eq!(body.report.qer.counted_toward_total, 36.0);
}

#[tokio::test]
async fn send_results_endpoint_accepts_a_rostered_member() {
    let fixture = default_fixture();

    let response = send_results_handler(
        State(fixture.service.clone()),
        Json(SendResultsRequest {
            national_id: "A123456789".to_string(),
            sheet: fully_eligible_sheet(),
            snapshot_jpeg_base64: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    assert_eq!(body["email"], "mei.chen@example.com");
    assert_eq!(body["total_points"], 120.0);
}

#[tokio::test]
async fn send_results_endpoint_rejects_malformed_ids() {
    let fixture = default_fixture();

    let response = send_results_handler(
        State(fixture.service.clone()),
        Json(SendResultsRequest {
            national_id: "not-an-id".to_string(),
            sheet: Default::default(),
            snapshot_jpeg_base64: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn send_results_endpoint_forbids_unverified_members() {
    let fixture = default_fixture();

    let response = send_results_handler(
        State(fixture.service.clone()),
        Json(SendResultsRequest {
            national_id: "C198765432".to_string(),
            sheet: Default::default(),
            snapshot_jpeg_base64: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn verification_endpoints_walk_the_registration_flow() {
    let fixture = default_fixture();
    let id = "C198765432".to_string();

    let response =
        verification_handler(State(fixture.service.clone()), Path(id.clone())).await;
    assert_eq!(body_json(response).await["status"], "unknown");

    let response = register_handler(State(fixture.service.clone()), Path(id.clone())).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = confirm_handler(State(fixture.service.clone()), Path(id.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = verification_handler(State(fixture.service.clone()), Path(id)).await;
    assert_eq!(body_json(response).await["status"], "verified");
}

#[tokio::test]
async fn confirm_endpoint_404s_without_a_registration() {
    let fixture = default_fixture();

    let response =
        confirm_handler(State(fixture.service.clone()), Path("D212345678".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recommendations_endpoint_filters_by_category() {
    let fixture = default_fixture();

    let response =
        recommendations_handler(State(fixture.service.clone()), Path("core".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["category"], "core");
    assert!(!body["courses"].as_array().expect("courses array").is_empty());
}

#[tokio::test]
async fn recommendations_endpoint_404s_on_unknown_categories() {
    let fixture = default_fixture();

    let response =
        recommendations_handler(State(fixture.service.clone()), Path("unknown".to_string()))
            .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn extract_endpoint_merges_extracted_fields() {
    let fixture = service_fixture(Arc::new(StubExtractor {
        partial: PartialCreditSheet {
            quality: Some(PartialModeSplit {
                physical: Some(12.0),
                online: None,
            }),
            ..PartialCreditSheet::default()
        },
    }));

    let response = extract_handler(
        State(fixture.service.clone()),
        Json(ExtractRequest {
            document_base64: BASE64.encode(PDF_BYTES),
            sheet: Default::default(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["sheet"]["quality"]["physical"], 12.0);
    assert_eq!(body["summary"]["quality_ethics_regulations_sum"], 12.0);
}

#[tokio::test]
async fn extract_endpoint_accepts_data_urls() {
    let fixture = service_fixture(Arc::new(StubExtractor {
        partial: PartialCreditSheet::default(),
    }));

    let response = extract_handler(
        State(fixture.service.clone()),
        Json(ExtractRequest {
            document_base64: format!("data:application/pdf;base64,{}", BASE64.encode(PDF_BYTES)),
            sheet: Default::default(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn extract_endpoint_rejects_bad_base64() {
    let fixture = default_fixture();

    let response = extract_handler(
        State(fixture.service.clone()),
        Json(ExtractRequest {
            document_base64: "@@not-base64@@".to_string(),
            sheet: Default::default(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extract_endpoint_rejects_non_pdf_documents() {
    let fixture = default_fixture();

    let response = extract_handler(
        State(fixture.service.clone()),
        Json(ExtractRequest {
            document_base64: BASE64.encode(b"plain text"),
            sheet: Default::default(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
