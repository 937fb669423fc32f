//! Clinical risk-factor input record
//!
//! One record describes one patient at one point in time. Records are
//! immutable per evaluation; "new patient" means dropping the record and
//! starting from `RiskFactors::default()`.

use crate::error::{Result, ScoreError};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Clinically valid age range in years
pub const AGE_RANGE: RangeInclusive<u32> = 18..=100;

/// Age preselected for a fresh record
pub const DEFAULT_AGE: u32 = 65;

/// Risk factors feeding the CHA2DS2-VASc and HAS-BLED scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct RiskFactors {
    pub age: u32,
    pub female: bool,
    /// Hypertension history (stroke score)
    pub hypertension_stroke: bool,
    pub heart_failure: bool,
    pub diabetes: bool,
    /// Prior stroke/TIA: two points for stroke, one for bleed
    pub stroke_history: bool,
    /// Prior MI or peripheral artery disease
    pub vascular_disease: bool,
    /// Uncontrolled systolic hypertension (bleed score)
    pub uncontrolled_hypertension_bleed: bool,
    pub renal_impairment: bool,
    pub liver_impairment: bool,
    pub prior_major_bleed: bool,
    pub antiplatelet_or_alcohol: bool,
}

impl Default for RiskFactors {
    fn default() -> Self {
        RiskFactors::new(DEFAULT_AGE)
    }
}

impl RiskFactors {
    /// Record with the given age and every flag cleared
    pub fn new(age: u32) -> Self {
        RiskFactors {
            age,
            female: false,
            hypertension_stroke: false,
            heart_failure: false,
            diabetes: false,
            stroke_history: false,
            vascular_disease: false,
            uncontrolled_hypertension_bleed: false,
            renal_impairment: false,
            liver_impairment: false,
            prior_major_bleed: false,
            antiplatelet_or_alcohol: false,
        }
    }

    /// Legacy single hypertension flag that feeds both scores.
    ///
    /// Sets `hypertension_stroke` and `uncontrolled_hypertension_bleed` to the
    /// same value. HAS-BLED asks for uncontrolled pressure, which is stricter
    /// than a hypertension history, so prefer setting the two fields apart.
    pub fn with_shared_hypertension(mut self, hypertension: bool) -> Self {
        self.hypertension_stroke = hypertension;
        self.uncontrolled_hypertension_bleed = hypertension;
        self
    }

    /// Reject records whose age is outside `AGE_RANGE`
    pub fn validate(&self) -> Result<()> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(ScoreError::invalid_input(
                "age",
                format!(
                    "must be within [{}, {}] (got {})",
                    AGE_RANGE.start(),
                    AGE_RANGE.end(),
                    self.age
                ),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON record.
    ///
    /// Every field is required. Non-boolean flags, non-integer ages and
    /// unknown keys are rejected as `InvalidInput`.
    pub fn from_json(json: &str) -> Result<Self> {
        let factors: RiskFactors = serde_json::from_str(json)
            .map_err(|e| ScoreError::invalid_input("record", e.to_string()))?;
        factors.validate()?;
        Ok(factors)
    }
}
