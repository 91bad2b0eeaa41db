use super::config::RuleSet;
use crate::credits::domain::{CreditSheet, CulturalNewPoints, ModeSplit};

/// Zero out anything that is not a finite real number. Negative values pass
/// through; the engine propagates them rather than second-guessing the
/// caller.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn coerce_split(split: ModeSplit) -> ModeSplit {
    ModeSplit {
        physical: finite_or_zero(split.physical),
        online: finite_or_zero(split.online),
    }
}

/// Copy of the sheet with every leaf coerced to a finite number.
pub(crate) fn coerce_sheet(sheet: &CreditSheet) -> CreditSheet {
    CreditSheet {
        professional: coerce_split(sheet.professional),
        quality: coerce_split(sheet.quality),
        ethics: coerce_split(sheet.ethics),
        regulations: coerce_split(sheet.regulations),
        fire_safety: finite_or_zero(sheet.fire_safety),
        emergency_response: finite_or_zero(sheet.emergency_response),
        infection_control: finite_or_zero(sheet.infection_control),
        gender_sensitivity: finite_or_zero(sheet.gender_sensitivity),
        cultural_old: finite_or_zero(sheet.cultural_old),
        cultural_new: CulturalNewPoints {
            indigenous: finite_or_zero(sheet.cultural_new.indigenous),
            multicultural: finite_or_zero(sheet.cultural_new.multicultural),
        },
    }
}

/// Quality/ethics/regulations figures after the category cap.
///
/// Overflow above the cap is removed from the online contribution first and
/// spills into physical only when online alone cannot absorb it. The
/// surviving online contribution matters downstream: it is what the global
/// online ceiling sees.
pub(crate) struct QerBreakdown {
    pub raw_sum: f64,
    pub online_contribution: f64,
    pub physical_contribution: f64,
    pub capped_sum: f64,
}

pub(crate) fn qer_breakdown(qer_physical: f64, qer_online: f64, rules: &RuleSet) -> QerBreakdown {
    let raw_sum = qer_physical + qer_online;
    let overflow = (raw_sum - rules.qer_cap).max(0.0);
    let online_contribution = (qer_online - overflow).max(0.0);
    let physical_contribution = (qer_physical - (overflow - qer_online).max(0.0)).max(0.0);

    QerBreakdown {
        raw_sum,
        online_contribution,
        physical_contribution,
        capped_sum: online_contribution + physical_contribution,
    }
}

/// Outcome of the global online-credit ceiling.
pub(crate) struct OnlineCapOutcome {
    pub counted: f64,
    pub overflow: f64,
}

pub(crate) fn apply_online_cap(contribution: f64, rules: &RuleSet) -> OnlineCapOutcome {
    let counted = contribution.min(rules.online_cap);
    OnlineCapOutcome {
        counted,
        overflow: contribution - counted,
    }
}
