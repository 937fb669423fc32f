//! chadsbled core library - CHA2DS2-VASc / HAS-BLED net-benefit scoring

#![deny(warnings)]

// Global invariants enforced in this crate:
// - Scoring is a pure function of one RiskFactors record
// - No global mutable state; reference tables are immutable values
// - No randomness, clocks, threads, or async
// - Invalid input is rejected before any score is produced
// - Identical input yields bit-identical output

pub mod config;
pub mod error;
pub mod factors;
pub mod report;
pub mod risk;
pub mod scoring;
pub mod tables;

pub use config::ResolvedConfig;
pub use error::ScoreError;
pub use factors::RiskFactors;
pub use report::{format_clinical_note, render_json, render_text};
pub use risk::{classify, evaluate, DecisionThresholds, Recommendation, RiskScorer, ScoreResult};
pub use scoring::{compute_bleed_score, compute_stroke_score};
pub use tables::{lookup_bleed_risk, lookup_stroke_risk, ReferenceTables, RiskTable};
