use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::calculator::{CreditSummary, EligibilityCalculator, RuleSet};
use super::delivery::{email_is_valid, DeliveryError, ResultExport, ResultNotifier, UsageLog};
use super::directory::{DirectoryError, IdentityDirectory};
use super::domain::{CourseCategory, CreditSheet, NationalId, RecommendedCourse, VerificationStatus};
use super::extraction::{check_document, DocumentExtractor, ExtractionError};
use super::recommendations::{CatalogError, CourseCatalog};
use super::report::CreditReportView;

/// Facade composing the calculator with the injected collaborators:
/// identity directory, result notifier, usage log, document extractor, and
/// course catalog. The calculator itself stays pure; every side effect lives
/// here.
pub struct CreditService<D, N, L> {
    calculator: Arc<EligibilityCalculator>,
    directory: Arc<D>,
    notifier: Arc<N>,
    usage_log: Arc<L>,
    extractor: Arc<dyn DocumentExtractor>,
    catalog: Arc<dyn CourseCatalog>,
}

impl<D, N, L> CreditService<D, N, L>
where
    D: IdentityDirectory + 'static,
    N: ResultNotifier + 'static,
    L: UsageLog + 'static,
{
    pub fn new(
        rules: RuleSet,
        directory: Arc<D>,
        notifier: Arc<N>,
        usage_log: Arc<L>,
        extractor: Arc<dyn DocumentExtractor>,
        catalog: Arc<dyn CourseCatalog>,
    ) -> Self {
        Self {
            calculator: Arc::new(EligibilityCalculator::new(rules)),
            directory,
            notifier,
            usage_log,
            extractor,
            catalog,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        self.calculator.rules()
    }

    /// Recompute the full summary for a sheet. Cheap and side-effect free;
    /// callers invoke it on every change.
    pub fn summarize(&self, sheet: &CreditSheet) -> CreditSummary {
        self.calculator.summarize(sheet)
    }

    /// Summary plus the display-level reading of it.
    pub fn report(&self, sheet: &CreditSheet) -> (CreditSummary, CreditReportView) {
        let summary = self.calculator.summarize(sheet);
        let view = CreditReportView::from_summary(&summary, self.calculator.rules());
        (summary, view)
    }

    /// Run a certificate document through the extraction collaborator and
    /// fold whatever fields came back into the member's current sheet.
    pub fn extract_and_merge(
        &self,
        document: &[u8],
        current: CreditSheet,
    ) -> Result<(CreditSheet, CreditSummary), CreditServiceError> {
        check_document(document)?;
        let extracted = self.extractor.extract(document)?;
        let merged = extracted.merged_with(&current);
        let summary = self.calculator.summarize(&merged);
        Ok((merged, summary))
    }

    /// Deliver a member's results by email and archive the delivery.
    ///
    /// The email comes from the roster, never from the request, so results
    /// can only go to the address on file.
    pub fn send_results(
        &self,
        member_id: NationalId,
        sheet: CreditSheet,
        snapshot_jpeg_base64: Option<String>,
    ) -> Result<ResultExport, CreditServiceError> {
        let status = self.directory.lookup(&member_id)?;
        if status != VerificationStatus::Verified {
            return Err(CreditServiceError::MemberNotVerified { status });
        }

        let email = self
            .directory
            .email_for(&member_id)?
            .ok_or(DeliveryError::NoEmailOnFile)?;
        if !email_is_valid(&email) {
            return Err(DeliveryError::InvalidEmail.into());
        }

        let summary = self.calculator.summarize(&sheet);
        let export = ResultExport {
            member_id,
            email,
            sheet,
            summary,
            snapshot_jpeg_base64,
            recorded_at: Utc::now(),
        };

        self.notifier.deliver(&export)?;
        self.usage_log.append(&export)?;
        info!(member = %export.member_id, total = export.summary.total_points, "results delivered");

        Ok(export)
    }

    pub fn verification_status(
        &self,
        member_id: &NationalId,
    ) -> Result<VerificationStatus, CreditServiceError> {
        Ok(self.directory.lookup(member_id)?)
    }

    pub fn register_member(&self, member_id: &NationalId) -> Result<(), CreditServiceError> {
        self.directory.register_pending(member_id)?;
        info!(member = %member_id, "registration recorded, awaiting confirmation");
        Ok(())
    }

    pub fn confirm_member(&self, member_id: &NationalId) -> Result<(), CreditServiceError> {
        self.directory.confirm_registration(member_id)?;
        info!(member = %member_id, "registration confirmed");
        Ok(())
    }

    /// Courses to suggest for one category.
    pub fn recommendations(
        &self,
        category: CourseCategory,
    ) -> Result<Vec<RecommendedCourse>, CreditServiceError> {
        let mut courses = self.catalog.courses()?;
        courses.retain(|course| course.category == category);
        Ok(courses)
    }
}

/// Error raised by the credit service facade.
#[derive(Debug, thiserror::Error)]
pub enum CreditServiceError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("member is not verified (status: {})", status.label())]
    MemberNotVerified { status: VerificationStatus },
}
