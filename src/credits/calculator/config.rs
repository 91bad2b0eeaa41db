use serde::{Deserialize, Serialize};

/// Identifies which generation of the accreditation rules a [`RuleSet`]
/// encodes. Only one generation is in force today; the enum exists so a
/// future cap or cutover change ships as data, not as new arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVersion {
    V2024,
}

/// Thresholds and ceilings for one generation of the accreditation rules.
///
/// The calculator reads every limit from here; nothing is hard-coded in the
/// arithmetic itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: RuleVersion,
    /// Combined quality/ethics/regulations credit required (raw sum).
    pub qer_threshold: f64,
    /// Ceiling on how much quality/ethics/regulations credit counts toward
    /// the grand total.
    pub qer_cap: f64,
    /// Combined credit required across the four core categories.
    pub core_threshold: f64,
    /// Minimum credit required in each core category individually.
    pub core_category_minimum: f64,
    /// Ceiling on legacy cultural-sensitivity credit.
    pub cultural_old_cap: f64,
    /// Grand total required for eligibility.
    pub total_points_goal: f64,
    /// Global ceiling on online-delivered credit counted toward the total.
    pub online_cap: f64,
    /// Certificate validity note shown with results. The engine performs no
    /// date arithmetic; members are pointed at their own certificate.
    pub expiry_note: String,
}

impl RuleSet {
    /// The rule generation currently in force.
    pub fn current() -> Self {
        Self {
            version: RuleVersion::V2024,
            qer_threshold: 24.0,
            qer_cap: 36.0,
            core_threshold: 10.0,
            core_category_minimum: 1.0,
            cultural_old_cap: 2.0,
            total_points_goal: 120.0,
            online_cap: 40.0,
            expiry_note: "Refer to the expiry date printed on your certificate.".to_string(),
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::current()
    }
}
