//! Credit eligibility: the pure calculator plus the collaborator boundaries
//! around it (document extraction, identity roster, result delivery, course
//! catalog) and the HTTP/service glue that wires them together.

pub mod calculator;
pub mod delivery;
pub mod directory;
pub mod domain;
pub mod extraction;
pub mod recommendations;
pub mod report;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use calculator::{CreditSummary, EligibilityCalculator, RuleSet, RuleVersion};
pub use delivery::{
    email_is_valid, CsvUsageLog, DeliveryError, LoggingNotifier, ResultExport, ResultNotifier,
    UsageLog,
};
pub use directory::{CsvRoster, DirectoryError, IdentityDirectory, MemberRecord};
pub use domain::{
    CourseCategory, CreditSheet, CulturalNewPoints, InvalidNationalId, ModeSplit, NationalId,
    RecommendedCourse, VerificationStatus, CULTURAL_RULE_CUTOVER,
};
pub use extraction::{
    check_document, DocumentExtractor, ExtractionError, PartialCreditSheet,
    PartialCulturalNewPoints, PartialModeSplit, UnconfiguredExtractor, MAX_DOCUMENT_BYTES,
};
pub use recommendations::{
    categorize_title, looks_like_course_title, normalize_title, CatalogError, CourseCatalog,
    StaticCatalog,
};
pub use report::{
    CoreRequirementView, CreditReportView, CulturalView, QerRequirementView, TotalProgressView,
};
pub use router::credit_router;
pub use service::{CreditService, CreditServiceError};
