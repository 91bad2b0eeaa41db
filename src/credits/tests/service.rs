use std::sync::Arc;

use super::common::*;
use crate::credits::delivery::DeliveryError;
use crate::credits::domain::{CourseCategory, CreditSheet, VerificationStatus};
use crate::credits::extraction::{
    ExtractionError, PartialCreditSheet, PartialModeSplit,
};
use crate::credits::service::CreditServiceError;

#[test]
fn send_results_delivers_and_archives_for_a_rostered_member() {
    let fixture = default_fixture();
    let sheet = fully_eligible_sheet();

    let export = fixture
        .service
        .send_results(member_id("A123456789"), sheet, None)
        .expect("delivery succeeds");

    assert_eq!(export.email, "mei.chen@example.com");
    assert_eq!(export.summary.total_points, 120.0);

    let deliveries = fixture.notifier.deliveries.lock().expect("lock");
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0], export);

    let rows = fixture.usage_log.rows.lock().expect("lock");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1], "A123456789");
}

#[test]
fn send_results_refuses_unverified_members() {
    let fixture = default_fixture();

    let err = fixture
        .service
        .send_results(member_id("C198765432"), CreditSheet::default(), None)
        .expect_err("unknown member is refused");

    match err {
        CreditServiceError::MemberNotVerified { status } => {
            assert_eq!(status, VerificationStatus::Unknown);
        }
        other => panic!("expected MemberNotVerified, got {other:?}"),
    }
    assert!(fixture.notifier.deliveries.lock().expect("lock").is_empty());
}

#[test]
fn send_results_requires_an_email_on_file() {
    let fixture = default_fixture();

    let err = fixture
        .service
        .send_results(member_id("B287654321"), CreditSheet::default(), None)
        .expect_err("missing email is refused");

    match err {
        CreditServiceError::Delivery(DeliveryError::NoEmailOnFile) => {}
        other => panic!("expected NoEmailOnFile, got {other:?}"),
    }
    assert!(fixture.usage_log.rows.lock().expect("lock").is_empty());
}

#[test]
fn extract_and_merge_folds_partial_fields_into_the_sheet() {
    let fixture = service_fixture(Arc::new(StubExtractor {
        partial: PartialCreditSheet {
            professional: Some(PartialModeSplit {
                physical: Some(42.0),
                online: None,
            }),
            infection_control: Some(2.0),
            ..PartialCreditSheet::default()
        },
    }));

    let current = CreditSheet {
        professional: crate::credits::domain::ModeSplit::new(10.0, 8.0),
        ..CreditSheet::default()
    };

    let (merged, summary) = fixture
        .service
        .extract_and_merge(PDF_BYTES, current)
        .expect("extraction succeeds");

    assert_eq!(merged.professional.physical, 42.0);
    assert_eq!(merged.professional.online, 8.0);
    assert_eq!(merged.infection_control, 2.0);
    assert_eq!(summary.professional_sum, 50.0);
}

#[test]
fn extract_and_merge_rejects_non_pdf_uploads_before_calling_out() {
    // The failing extractor would error if reached; the guard must fire
    // first.
    let fixture = service_fixture(Arc::new(FailingExtractor));

    let err = fixture
        .service
        .extract_and_merge(b"plain text", CreditSheet::default())
        .expect_err("guard rejects");

    match err {
        CreditServiceError::Extraction(ExtractionError::NotPdf) => {}
        other => panic!("expected NotPdf, got {other:?}"),
    }
}

#[test]
fn extractor_outages_surface_as_unavailable() {
    let fixture = service_fixture(Arc::new(FailingExtractor));

    let err = fixture
        .service
        .extract_and_merge(PDF_BYTES, CreditSheet::default())
        .expect_err("outage surfaces");

    match err {
        CreditServiceError::Extraction(ExtractionError::Unavailable(_)) => {}
        other => panic!("expected Unavailable, got {other:?}"),
    }
}

#[test]
fn verification_flow_round_trips_through_the_service() {
    let fixture = default_fixture();
    let id = member_id("C198765432");

    assert_eq!(
        fixture.service.verification_status(&id).expect("status"),
        VerificationStatus::Unknown
    );

    fixture.service.register_member(&id).expect("registers");
    assert_eq!(
        fixture.service.verification_status(&id).expect("status"),
        VerificationStatus::Pending
    );

    fixture.service.confirm_member(&id).expect("confirms");
    assert_eq!(
        fixture.service.verification_status(&id).expect("status"),
        VerificationStatus::Verified
    );
}

#[test]
fn recommendations_filter_to_the_requested_category() {
    let fixture = default_fixture();

    let courses = fixture
        .service
        .recommendations(CourseCategory::Core)
        .expect("catalog available");

    assert!(!courses.is_empty());
    assert!(courses
        .iter()
        .all(|course| course.category == CourseCategory::Core));
}

#[test]
fn report_exposes_summary_and_view_together() {
    let fixture = default_fixture();
    let (summary, view) = fixture.service.report(&double_capped_sheet());

    assert_eq!(summary.total_points, 50.0);
    assert_eq!(view.total.points, 50.0);
    assert_eq!(view.qer.counted_toward_total, 36.0);
}
