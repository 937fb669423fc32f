//! Additive CHA2DS2-VASc and HAS-BLED scores
//!
//! Both scores are plain sums of indicator terms. Neither is clamped; the
//! bounds below follow from the term weights.

use crate::factors::RiskFactors;

/// Highest attainable CHA2DS2-VASc score
pub const MAX_STROKE_SCORE: u32 = 9;

/// Highest attainable HAS-BLED score
pub const MAX_BLEED_SCORE: u32 = 7;

fn point(flag: bool) -> u32 {
    u32::from(flag)
}

/// CHA2DS2-VASc stroke score
///
/// Score = (age >= 75) + (age >= 65) + female + hypertension + diabetes
///       + 2 * stroke/TIA + heart failure + vascular disease
///
/// The two age checks are independent, so age 75+ contributes two points.
pub fn compute_stroke_score(factors: &RiskFactors) -> u32 {
    point(factors.age >= 75)
        + point(factors.age >= 65)
        + point(factors.female)
        + point(factors.hypertension_stroke)
        + point(factors.diabetes)
        + 2 * point(factors.stroke_history)
        + point(factors.heart_failure)
        + point(factors.vascular_disease)
}

/// HAS-BLED bleeding score
///
/// Score = uncontrolled hypertension + renal + liver + stroke
///       + prior major bleed + (age >= 65) + antiplatelet/alcohol
pub fn compute_bleed_score(factors: &RiskFactors) -> u32 {
    point(factors.uncontrolled_hypertension_bleed)
        + point(factors.renal_impairment)
        + point(factors.liver_impairment)
        + point(factors.stroke_history)
        + point(factors.prior_major_bleed)
        + point(factors.age >= 65)
        + point(factors.antiplatelet_or_alcohol)
}
