use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calculator::CreditSummary;
use super::domain::{CreditSheet, NationalId};

/// Outbound boundary for the notification/record-keeping service that mails
/// members their results.
pub trait ResultNotifier: Send + Sync {
    fn deliver(&self, export: &ResultExport) -> Result<(), DeliveryError>;
}

/// Append-only record of every delivered result.
pub trait UsageLog: Send + Sync {
    fn append(&self, export: &ResultExport) -> Result<(), DeliveryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("no email on file for this member; contact an administrator")]
    NoEmailOnFile,
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("usage log unavailable: {0}")]
    Log(String),
}

/// Everything the delivery service needs to mail and archive one result:
/// the raw sheet, the derived summary, and a rendered snapshot image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultExport {
    pub member_id: NationalId,
    pub email: String,
    pub sheet: CreditSheet,
    pub summary: CreditSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_jpeg_base64: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

pub(crate) const AUDIT_HEADERS: [&str; 19] = [
    "Recorded At",
    "National Id",
    "Email",
    "Professional Physical",
    "Professional Online",
    "Quality Physical",
    "Quality Online",
    "Ethics Physical",
    "Ethics Online",
    "Regulations Physical",
    "Regulations Online",
    "Fire Safety",
    "Emergency Response",
    "Infection Control",
    "Gender Sensitivity",
    "Cultural Old",
    "Cultural New Indigenous",
    "Cultural New Multicultural",
    "Total Points",
];

impl ResultExport {
    /// One archive row per delivery, column order fixed by the long-standing
    /// administrative sheet.
    pub fn audit_row(&self) -> Vec<String> {
        let sheet = &self.sheet;
        vec![
            self.recorded_at.format("%Y/%m/%d %H:%M:%S").to_string(),
            self.member_id.to_string(),
            self.email.clone(),
            sheet.professional.physical.to_string(),
            sheet.professional.online.to_string(),
            sheet.quality.physical.to_string(),
            sheet.quality.online.to_string(),
            sheet.ethics.physical.to_string(),
            sheet.ethics.online.to_string(),
            sheet.regulations.physical.to_string(),
            sheet.regulations.online.to_string(),
            sheet.fire_safety.to_string(),
            sheet.emergency_response.to_string(),
            sheet.infection_control.to_string(),
            sheet.gender_sensitivity.to_string(),
            sheet.cultural_old.to_string(),
            sheet.cultural_new.indigenous.to_string(),
            sheet.cultural_new.multicultural.to_string(),
            self.summary.total_points.to_string(),
        ]
    }
}

/// Minimal shape check matching what the delivery backend will accept:
/// exactly one `@`, no whitespace, and a dotted domain.
pub fn email_is_valid(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Notifier for deployments without a mail backend: the delivery is traced
/// and treated as sent.
pub struct LoggingNotifier;

impl ResultNotifier for LoggingNotifier {
    fn deliver(&self, export: &ResultExport) -> Result<(), DeliveryError> {
        tracing::info!(
            member = %export.member_id,
            email = %export.email,
            total = export.summary.total_points,
            "result notification dispatched"
        );
        Ok(())
    }
}

/// Usage log writing one CSV row per delivered result.
pub struct CsvUsageLog {
    path: PathBuf,
}

impl CsvUsageLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl UsageLog for CsvUsageLog {
    fn append(&self, export: &ResultExport) -> Result<(), DeliveryError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| DeliveryError::Log(err.to_string()))?;

        let is_new = file
            .metadata()
            .map(|meta| meta.len() == 0)
            .unwrap_or(false);

        let mut writer = csv::Writer::from_writer(file);
        if is_new {
            writer
                .write_record(AUDIT_HEADERS)
                .map_err(|err| DeliveryError::Log(err.to_string()))?;
        }
        writer
            .write_record(export.audit_row())
            .map_err(|err| DeliveryError::Log(err.to_string()))?;
        writer
            .flush()
            .map_err(|err| DeliveryError::Log(err.to_string()))?;
        Ok(())
    }
}
