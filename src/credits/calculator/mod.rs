//! Point aggregation and eligibility-rule engine.
//!
//! [`EligibilityCalculator::summarize`] is a total, deterministic function of
//! the input sheet: no I/O, no state, no failure modes. Callers recompute the
//! full summary on every change rather than patching a previous one.

mod config;
mod rules;

pub use config::{RuleSet, RuleVersion};

use crate::credits::domain::CreditSheet;
use serde::{Deserialize, Serialize};

/// Stateless engine applying one [`RuleSet`] generation to credit sheets.
pub struct EligibilityCalculator {
    rules: RuleSet,
}

impl EligibilityCalculator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Aggregate a raw sheet into capped sums, threshold checks, and the
    /// final determination. Cap order is load-bearing: the category cap on
    /// quality/ethics/regulations runs first and its surviving online
    /// contribution is what the global online ceiling applies to.
    pub fn summarize(&self, sheet: &CreditSheet) -> CreditSummary {
        let rules = &self.rules;
        let sheet = rules::coerce_sheet(sheet);

        let qer_physical =
            sheet.quality.physical + sheet.ethics.physical + sheet.regulations.physical;
        let qer_online = sheet.quality.online + sheet.ethics.online + sheet.regulations.online;

        // Raw online figure for display, before any cap engages.
        let total_online_sum = sheet.professional.online + qer_online;

        let qer = rules::qer_breakdown(qer_physical, qer_online, rules);
        let is_qer_sum_met = qer.raw_sum >= rules.qer_threshold;

        let professional_sum = sheet.professional.physical + sheet.professional.online;
        let total_before_online_cap = professional_sum + qer.capped_sum;

        let total_online_contribution = sheet.professional.online + qer.online_contribution;
        let online = rules::apply_online_cap(total_online_contribution, rules);

        let total_points = total_before_online_cap - online.overflow;

        let core_courses_sum = sheet.fire_safety
            + sheet.emergency_response
            + sheet.infection_control
            + sheet.gender_sensitivity;
        let minimum = rules.core_category_minimum;
        let are_all_core_courses_taken = sheet.fire_safety >= minimum
            && sheet.emergency_response >= minimum
            && sheet.infection_control >= minimum
            && sheet.gender_sensitivity >= minimum;

        CreditSummary {
            professional_sum,
            quality_ethics_regulations_sum: qer.raw_sum,
            capped_quality_ethics_regulations_sum: qer.capped_sum,
            is_quality_ethics_regulations_sum_met: is_qer_sum_met,
            core_courses_sum,
            is_core_courses_sum_met: core_courses_sum >= rules.core_threshold,
            are_all_core_courses_taken,
            cultural_old_capped: sheet.cultural_old.min(rules.cultural_old_cap),
            cultural_new_total: sheet.cultural_new.indigenous + sheet.cultural_new.multicultural,
            total_points,
            is_total_points_met: total_points >= rules.total_points_goal,
            expiry_date: rules.expiry_note.clone(),
            online_cap: rules.online_cap,
            total_online_sum,
            online_points_counted: online.counted,
        }
    }
}

impl Default for EligibilityCalculator {
    fn default() -> Self {
        Self::new(RuleSet::current())
    }
}

/// Derived figures for one sheet under one rule generation.
///
/// `is_core_courses_sum_met` and `are_all_core_courses_taken` are exposed
/// separately on purpose: the core requirement counts as satisfied only when
/// both hold, and composing them is the consumer's job (see the report view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSummary {
    pub professional_sum: f64,
    /// Raw quality/ethics/regulations total; feeds the threshold check only.
    pub quality_ethics_regulations_sum: f64,
    /// Quality/ethics/regulations total after the category cap; feeds the
    /// grand total.
    pub capped_quality_ethics_regulations_sum: f64,
    pub is_quality_ethics_regulations_sum_met: bool,
    pub core_courses_sum: f64,
    pub is_core_courses_sum_met: bool,
    pub are_all_core_courses_taken: bool,
    pub cultural_old_capped: f64,
    pub cultural_new_total: f64,
    pub total_points: f64,
    pub is_total_points_met: bool,
    pub expiry_date: String,
    pub online_cap: f64,
    /// Raw online credit across categories, before any cap. Informational.
    pub total_online_sum: f64,
    /// Online credit actually counted toward the total after the global
    /// ceiling.
    pub online_points_counted: f64,
}
