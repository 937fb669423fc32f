//! Net-benefit evaluation and recommendation classification
//!
//! Global invariants enforced:
//! - Evaluation is pure: identical factors yield bit-identical results
//! - Invalid input fails before any score is computed
//! - Both threshold boundaries belong to the equivocal band

use crate::error::Result;
use crate::factors::RiskFactors;
use crate::scoring::{compute_bleed_score, compute_stroke_score};
use crate::tables::ReferenceTables;
use serde::{Deserialize, Serialize};

/// Three-way anticoagulation recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    FavorsAnticoagulation,
    Equivocal,
    FavorsObservation,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::FavorsAnticoagulation => "favors-anticoagulation",
            Recommendation::Equivocal => "equivocal",
            Recommendation::FavorsObservation => "favors-observation",
        }
    }
}

/// Net-benefit cut points for classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecisionThresholds {
    /// Net benefit strictly above this favors anticoagulation (default: 1.5)
    pub anticoagulation: f64,
    /// Net benefit strictly below this favors observation (default: 0.0)
    pub observation: f64,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        DecisionThresholds {
            anticoagulation: 1.5,
            observation: 0.0,
        }
    }
}

/// Classify a net benefit (percentage points) against the thresholds
pub fn classify(net_benefit_pct: f64, thresholds: &DecisionThresholds) -> Recommendation {
    if net_benefit_pct > thresholds.anticoagulation {
        Recommendation::FavorsAnticoagulation
    } else if net_benefit_pct < thresholds.observation {
        Recommendation::FavorsObservation
    } else {
        Recommendation::Equivocal
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoreResult {
    pub stroke_score: u32,
    pub bleed_score: u32,
    pub stroke_risk_pct: f64,
    pub bleed_risk_pct: f64,
    pub net_benefit_pct: f64,
    pub recommendation: Recommendation,
    /// Version of the reference tables the risks came from
    pub table_version: String,
}

/// Scorer bound to a set of reference tables and decision thresholds.
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RiskScorer {
    pub tables: ReferenceTables,
    pub thresholds: DecisionThresholds,
}

impl RiskScorer {
    pub fn new(tables: ReferenceTables, thresholds: DecisionThresholds) -> Self {
        RiskScorer { tables, thresholds }
    }

    /// Validate, score, look up and classify one record
    pub fn evaluate(&self, factors: &RiskFactors) -> Result<ScoreResult> {
        factors.validate()?;

        let stroke_score = compute_stroke_score(factors);
        let bleed_score = compute_bleed_score(factors);
        let stroke_risk_pct = self.tables.stroke.lookup(stroke_score);
        let bleed_risk_pct = self.tables.bleed.lookup(bleed_score);
        let net_benefit_pct = stroke_risk_pct - bleed_risk_pct;
        let recommendation = classify(net_benefit_pct, &self.thresholds);

        log::debug!(
            "stroke score {} ({}%), bleed score {} ({}%), net {:.3} -> {}",
            stroke_score,
            stroke_risk_pct,
            bleed_score,
            bleed_risk_pct,
            net_benefit_pct,
            recommendation.as_str()
        );

        Ok(ScoreResult {
            stroke_score,
            bleed_score,
            stroke_risk_pct,
            bleed_risk_pct,
            net_benefit_pct,
            recommendation,
            table_version: self.tables.version.clone(),
        })
    }
}

/// Evaluate with the published tables and default thresholds
pub fn evaluate(factors: &RiskFactors) -> Result<ScoreResult> {
    RiskScorer::default().evaluate(factors)
}
