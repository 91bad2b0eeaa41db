use std::sync::{Arc, Mutex};

use crate::credits::calculator::{EligibilityCalculator, RuleSet};
use crate::credits::delivery::{DeliveryError, ResultExport, ResultNotifier, UsageLog};
use crate::credits::directory::CsvRoster;
use crate::credits::domain::{CreditSheet, CulturalNewPoints, ModeSplit, NationalId};
use crate::credits::extraction::{DocumentExtractor, ExtractionError, PartialCreditSheet};
use crate::credits::recommendations::StaticCatalog;
use crate::credits::service::CreditService;

pub(super) const ROSTER_CSV: &str = "\
National Id,Name,Email
A123456789,Mei-Ling Chen,mei.chen@example.com
B287654321,Chia-Hao Lin,
";

pub(super) const PDF_BYTES: &[u8] = b"%PDF-1.4\nminimal test document";

pub(super) fn roster() -> CsvRoster {
    CsvRoster::from_reader(ROSTER_CSV.as_bytes()).expect("roster parses")
}

pub(super) fn member_id(raw: &str) -> NationalId {
    NationalId::parse(raw).expect("valid id")
}

pub(super) fn calculator() -> EligibilityCalculator {
    EligibilityCalculator::new(RuleSet::current())
}

/// Under the QER threshold, under the online cap: plain additive totals.
pub(super) fn steady_progress_sheet() -> CreditSheet {
    CreditSheet {
        professional: ModeSplit::new(60.0, 20.0),
        quality: ModeSplit::new(6.0, 0.0),
        ethics: ModeSplit::new(6.0, 0.0),
        regulations: ModeSplit::new(6.0, 0.0),
        ..CreditSheet::default()
    }
}

/// Exercises both caps at once: the category cap on QER drains online
/// credit first, and the surviving online contribution then blows through
/// the global online ceiling.
pub(super) fn double_capped_sheet() -> CreditSheet {
    CreditSheet {
        professional: ModeSplit::new(0.0, 50.0),
        quality: ModeSplit::new(0.0, 30.0),
        ethics: ModeSplit::new(10.0, 0.0),
        regulations: ModeSplit::new(0.0, 0.0),
        ..CreditSheet::default()
    }
}

pub(super) fn fully_eligible_sheet() -> CreditSheet {
    CreditSheet {
        professional: ModeSplit::new(80.0, 10.0),
        quality: ModeSplit::new(10.0, 0.0),
        ethics: ModeSplit::new(10.0, 0.0),
        regulations: ModeSplit::new(10.0, 0.0),
        fire_safety: 3.0,
        emergency_response: 3.0,
        infection_control: 3.0,
        gender_sensitivity: 3.0,
        cultural_old: 1.0,
        cultural_new: CulturalNewPoints {
            indigenous: 1.0,
            multicultural: 1.0,
        },
    }
}

#[derive(Default)]
pub(super) struct RecordingNotifier {
    pub(super) deliveries: Mutex<Vec<ResultExport>>,
}

impl ResultNotifier for RecordingNotifier {
    fn deliver(&self, export: &ResultExport) -> Result<(), DeliveryError> {
        self.deliveries
            .lock()
            .expect("notifier lock")
            .push(export.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryUsageLog {
    pub(super) rows: Mutex<Vec<Vec<String>>>,
}

impl UsageLog for MemoryUsageLog {
    fn append(&self, export: &ResultExport) -> Result<(), DeliveryError> {
        self.rows.lock().expect("log lock").push(export.audit_row());
        Ok(())
    }
}

pub(super) struct StubExtractor {
    pub(super) partial: PartialCreditSheet,
}

impl DocumentExtractor for StubExtractor {
    fn extract(&self, _document: &[u8]) -> Result<PartialCreditSheet, ExtractionError> {
        Ok(self.partial)
    }
}

pub(super) struct FailingExtractor;

impl DocumentExtractor for FailingExtractor {
    fn extract(&self, _document: &[u8]) -> Result<PartialCreditSheet, ExtractionError> {
        Err(ExtractionError::Unavailable("stub outage".to_string()))
    }
}

pub(super) type TestService = CreditService<CsvRoster, RecordingNotifier, MemoryUsageLog>;

pub(super) struct ServiceFixture {
    pub(super) service: Arc<TestService>,
    pub(super) notifier: Arc<RecordingNotifier>,
    pub(super) usage_log: Arc<MemoryUsageLog>,
}

pub(super) fn service_fixture(extractor: Arc<dyn DocumentExtractor>) -> ServiceFixture {
    let notifier = Arc::new(RecordingNotifier::default());
    let usage_log = Arc::new(MemoryUsageLog::default());
    let service = Arc::new(CreditService::new(
        RuleSet::current(),
        Arc::new(roster()),
        notifier.clone(),
        usage_log.clone(),
        extractor,
        Arc::new(StaticCatalog::standard()),
    ));

    ServiceFixture {
        service,
        notifier,
        usage_log,
    }
}

pub(super) fn default_fixture() -> ServiceFixture {
    service_fixture(Arc::new(StubExtractor {
        partial: PartialCreditSheet::default(),
    }))
}
