use chrono::NaiveDate;
use serde::Serialize;

use super::calculator::{CreditSummary, RuleSet};
use super::domain::{CourseCategory, CULTURAL_RULE_CUTOVER};

/// Progress toward the grand total.
#[derive(Debug, Clone, Serialize)]
pub struct TotalProgressView {
    pub points: f64,
    pub goal: f64,
    /// Rounded and clamped to 0..=100 for progress bars.
    pub percent: u8,
    pub remaining: f64,
    pub met: bool,
}

/// Quality/ethics/regulations requirement as presented to members. The
/// threshold compares the raw sum; the footnote carries what actually counts
/// toward the total after the category cap.
#[derive(Debug, Clone, Serialize)]
pub struct QerRequirementView {
    pub points: f64,
    pub threshold: f64,
    pub shortfall: f64,
    pub met: bool,
    pub counted_toward_total: f64,
    pub cap: f64,
}

/// Core-category requirement. `met` is the AND of the sum threshold and the
/// every-category-taken check; a sheet can clear the sum while still failing
/// overall.
#[derive(Debug, Clone, Serialize)]
pub struct CoreRequirementView {
    pub points: f64,
    pub threshold: f64,
    pub shortfall: f64,
    pub sum_met: bool,
    pub all_categories_taken: bool,
    pub met: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_category_reminder: Option<&'static str>,
}

/// The two cultural-sensitivity tracks, presented side by side.
#[derive(Debug, Clone, Serialize)]
pub struct CulturalView {
    pub legacy_capped: f64,
    pub legacy_cap: f64,
    pub current_total: f64,
    /// Credit earned before this date falls under the legacy rule.
    pub cutover_date: NaiveDate,
    pub annual_minimum_reminder: &'static str,
}

const CORE_PER_CATEGORY_REMINDER: &str = "Fire safety, emergency response, infection control, \
     and gender sensitivity each need at least one point before the requirement counts as met.";

const CULTURAL_ANNUAL_REMINDER: &str = "Since 2024-06-03, one point is required every year in \
     each of the indigenous and multicultural categories. This is a yearly rule the calculator \
     does not verify; please confirm it yourself.";

/// Display-level reading of a [`CreditSummary`], with the shortfalls,
/// composed flags, and recommendation triggers the result screen and email
/// template consume.
#[derive(Debug, Clone, Serialize)]
pub struct CreditReportView {
    pub total: TotalProgressView,
    pub professional_points: f64,
    pub qer: QerRequirementView,
    pub core: CoreRequirementView,
    pub cultural: CulturalView,
    pub online_cap: f64,
    pub online_points_counted: f64,
    pub total_online_sum: f64,
    pub expiry_note: String,
    /// Categories whose requirement is currently unmet, in display order.
    pub recommended_categories: Vec<CourseCategory>,
}

impl CreditReportView {
    pub fn from_summary(summary: &CreditSummary, rules: &RuleSet) -> Self {
        let goal = rules.total_points_goal;
        let percent = if goal > 0.0 {
            ((summary.total_points / goal) * 100.0).clamp(0.0, 100.0).round() as u8
        } else {
            0
        };

        let core_met = summary.is_core_courses_sum_met && summary.are_all_core_courses_taken;
        let per_category_reminder = (!summary.are_all_core_courses_taken
            && summary.core_courses_sum > 0.0)
            .then_some(CORE_PER_CATEGORY_REMINDER);

        let mut recommended_categories = Vec::new();
        if !summary.is_quality_ethics_regulations_sum_met {
            recommended_categories.push(CourseCategory::QualityEthicsRegulations);
        }
        if !core_met {
            recommended_categories.push(CourseCategory::Core);
        }

        Self {
            total: TotalProgressView {
                points: summary.total_points,
                goal,
                percent,
                remaining: (goal - summary.total_points).max(0.0),
                met: summary.is_total_points_met,
            },
            professional_points: summary.professional_sum,
            qer: QerRequirementView {
                points: summary.quality_ethics_regulations_sum,
                threshold: rules.qer_threshold,
                shortfall: (rules.qer_threshold - summary.quality_ethics_regulations_sum)
                    .max(0.0),
                met: summary.is_quality_ethics_regulations_sum_met,
                counted_toward_total: summary.capped_quality_ethics_regulations_sum,
                cap: rules.qer_cap,
            },
            core: CoreRequirementView {
                points: summary.core_courses_sum,
                threshold: rules.core_threshold,
                shortfall: (rules.core_threshold - summary.core_courses_sum).max(0.0),
                sum_met: summary.is_core_courses_sum_met,
                all_categories_taken: summary.are_all_core_courses_taken,
                met: core_met,
                per_category_reminder,
            },
            cultural: CulturalView {
                legacy_capped: summary.cultural_old_capped,
                legacy_cap: rules.cultural_old_cap,
                current_total: summary.cultural_new_total,
                cutover_date: CULTURAL_RULE_CUTOVER,
                annual_minimum_reminder: CULTURAL_ANNUAL_REMINDER,
            },
            online_cap: summary.online_cap,
            online_points_counted: summary.online_points_counted,
            total_online_sum: summary.total_online_sum,
            expiry_note: summary.expiry_date.clone(),
            recommended_categories,
        }
    }
}
