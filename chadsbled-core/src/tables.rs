//! Published score-to-risk reference tables
//!
//! Global invariants enforced:
//! - Default tables reproduce the published cohort values verbatim,
//!   including their non-monotonic entries
//! - A score without a table entry resolves to the table's fallback value,
//!   never to an error

use serde::Serialize;

/// Annual stroke risk (%) by CHA2DS2-VASc score 0..=9
pub const CHA2DS2_VASC_RISK_PCT: [f64; 10] = [0.0, 1.3, 2.2, 3.2, 4.0, 6.7, 9.8, 9.6, 6.7, 15.2];

/// Annual major-bleed risk (%) by HAS-BLED score 0..=5
pub const HAS_BLED_RISK_PCT: [f64; 6] = [1.1, 1.0, 1.9, 3.7, 8.7, 12.5];

/// Stroke risk used for scores without a table entry
pub const CHA2DS2_VASC_FALLBACK_PCT: f64 = 15.2;

/// Bleed risk used for scores without a table entry (HAS-BLED 6 and 7)
pub const HAS_BLED_FALLBACK_PCT: f64 = 12.5;

/// Version label of the built-in reference data
pub const DEFAULT_TABLE_VERSION: &str = "lip-2010/pisters-2010";

/// Shown alongside every result
pub const DISCLAIMER: &str =
    "This tool is for clinical decision support and does not replace professional judgment.";

/// Score-indexed risk table with a fallback for scores past its last entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskTable {
    entries: Vec<f64>,
    fallback: f64,
}

impl RiskTable {
    pub fn new(entries: Vec<f64>, fallback: f64) -> Self {
        RiskTable { entries, fallback }
    }

    /// Built-in CHA2DS2-VASc table
    pub fn cha2ds2_vasc() -> Self {
        RiskTable::new(CHA2DS2_VASC_RISK_PCT.to_vec(), CHA2DS2_VASC_FALLBACK_PCT)
    }

    /// Built-in HAS-BLED table
    pub fn has_bled() -> Self {
        RiskTable::new(HAS_BLED_RISK_PCT.to_vec(), HAS_BLED_FALLBACK_PCT)
    }

    /// Exact-match lookup; scores past the last entry get the fallback
    pub fn lookup(&self, score: u32) -> f64 {
        match self.entries.get(score as usize) {
            Some(pct) => *pct,
            None => {
                log::debug!(
                    "score {} outside table domain 0..={}, using fallback {}",
                    score,
                    self.max_score(),
                    self.fallback
                );
                self.fallback
            }
        }
    }

    /// Highest score with an explicit entry
    pub fn max_score(&self) -> u32 {
        self.entries.len().saturating_sub(1) as u32
    }

    pub fn entries(&self) -> &[f64] {
        &self.entries
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }
}

/// Literature reference for one of the scoring systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub score: &'static str,
    pub source: &'static str,
}

/// Sources of the built-in tables
pub const CITATIONS: &[Citation] = &[
    Citation {
        score: "CHA2DS2-VASc",
        source: "Lip GY, et al. (2010)",
    },
    Citation {
        score: "HAS-BLED",
        source: "Pisters R, et al. (2010)",
    },
];

/// A versioned pair of stroke and bleed tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceTables {
    pub version: String,
    pub stroke: RiskTable,
    pub bleed: RiskTable,
}

impl Default for ReferenceTables {
    fn default() -> Self {
        ReferenceTables {
            version: DEFAULT_TABLE_VERSION.to_string(),
            stroke: RiskTable::cha2ds2_vasc(),
            bleed: RiskTable::has_bled(),
        }
    }
}

impl ReferenceTables {
    /// True when these are the built-in published tables
    pub fn is_published(&self) -> bool {
        *self == ReferenceTables::default()
    }
}

/// Annual stroke risk for a CHA2DS2-VASc score using the published table
pub fn lookup_stroke_risk(score: u32) -> f64 {
    CHA2DS2_VASC_RISK_PCT
        .get(score as usize)
        .copied()
        .unwrap_or(CHA2DS2_VASC_FALLBACK_PCT)
}

/// Annual bleed risk for a HAS-BLED score using the published table
pub fn lookup_bleed_risk(score: u32) -> f64 {
    HAS_BLED_RISK_PCT
        .get(score as usize)
        .copied()
        .unwrap_or(HAS_BLED_FALLBACK_PCT)
}
