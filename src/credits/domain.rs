use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Credits for one category tracked separately by delivery mode, because
/// online-delivered credit is subject to an additional global ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeSplit {
    #[serde(default)]
    pub physical: f64,
    #[serde(default)]
    pub online: f64,
}

impl ModeSplit {
    pub fn new(physical: f64, online: f64) -> Self {
        Self { physical, online }
    }
}

/// Cultural-sensitivity credit earned under the current rule, split by the
/// two tracked populations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CulturalNewPoints {
    #[serde(default)]
    pub indigenous: f64,
    #[serde(default)]
    pub multicultural: f64,
}

/// Raw category point inputs for one member, as entered on the form or merged
/// from document extraction. Missing fields deserialize to zero; the
/// calculator treats non-finite values as zero and otherwise takes the sheet
/// as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditSheet {
    #[serde(default)]
    pub professional: ModeSplit,
    #[serde(default)]
    pub quality: ModeSplit,
    #[serde(default)]
    pub ethics: ModeSplit,
    #[serde(default)]
    pub regulations: ModeSplit,
    #[serde(default)]
    pub fire_safety: f64,
    #[serde(default)]
    pub emergency_response: f64,
    #[serde(default)]
    pub infection_control: f64,
    #[serde(default)]
    pub gender_sensitivity: f64,
    #[serde(default)]
    pub cultural_old: f64,
    #[serde(default)]
    pub cultural_new: CulturalNewPoints,
}

/// Date the cultural-sensitivity requirement switched from the legacy single
/// bucket to the per-population scheme. Credit earned before this date lands
/// in `cultural_old`, credit earned after in `cultural_new`.
pub const CULTURAL_RULE_CUTOVER: NaiveDate = match NaiveDate::from_ymd_opt(2024, 6, 3) {
    Some(date) => date,
    None => panic!("cutover date is valid"),
};

/// National identification number used to look members up in the roster.
///
/// Normalized to uppercase on parse. The format is one letter, a second
/// character of 1, 2, or 9, then eight digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    pub fn parse(raw: &str) -> Result<Self, InvalidNationalId> {
        let normalized = raw.trim().to_ascii_uppercase();
        let bytes = normalized.as_bytes();

        let well_formed = bytes.len() == 10
            && bytes[0].is_ascii_uppercase()
            && matches!(bytes[1], b'1' | b'2' | b'9')
            && bytes[2..].iter().all(u8::is_ascii_digit);

        if well_formed {
            Ok(Self(normalized))
        } else {
            Err(InvalidNationalId {
                raw: raw.trim().to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NationalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NationalId {
    type Error = InvalidNationalId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalId> for String {
    fn from(value: NationalId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("'{raw}' is not a valid national id")]
pub struct InvalidNationalId {
    pub raw: String,
}

/// Roster standing for a member id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Present in the roster, or registered and confirmed by staff.
    Verified,
    /// Registered but awaiting confirmation.
    Pending,
    /// Never seen.
    Unknown,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Pending => "pending",
            VerificationStatus::Unknown => "unknown",
        }
    }
}

/// Course buckets used when recommending remedial courses for an unmet
/// requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseCategory {
    Professional,
    QualityEthicsRegulations,
    Core,
    CulturalNew,
}

impl CourseCategory {
    pub const fn label(self) -> &'static str {
        match self {
            CourseCategory::Professional => "professional",
            CourseCategory::QualityEthicsRegulations => "quality_ethics_regulations",
            CourseCategory::Core => "core",
            CourseCategory::CulturalNew => "cultural_new",
        }
    }
}

/// Catalog entry surfaced to members whose requirements are unmet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedCourse {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub category: CourseCategory,
}
