//! Clinical note and result rendering
//!
//! Global invariants enforced:
//! - Byte-for-byte identical output for identical results
//! - Risk percentages keep one decimal place ("4.0", never "4")

use crate::risk::{Recommendation, ScoreResult};
use crate::tables::DISCLAIMER;
use serde::Serialize;

/// Single-line note for pasting into a chart
///
/// Format:
/// `CHA2DS2-VASc {s} ({sr}%/yr); HAS-BLED {b} ({br}%/yr). Net Benefit: {+net}%.`
pub fn format_clinical_note(result: &ScoreResult) -> String {
    format!(
        "CHA2DS2-VASc {} ({:.1}%/yr); HAS-BLED {} ({:.1}%/yr). Net Benefit: {:+.1}%.",
        result.stroke_score,
        result.stroke_risk_pct,
        result.bleed_score,
        result.bleed_risk_pct,
        result.net_benefit_pct
    )
}

impl Recommendation {
    /// Banner line describing the net benefit for this recommendation
    pub fn headline(&self, net_benefit_pct: f64) -> String {
        match self {
            Recommendation::FavorsAnticoagulation => {
                format!("Net Benefit for Anticoagulation: {:+.1}%", net_benefit_pct)
            }
            Recommendation::FavorsObservation => format!(
                "Warning: Bleed risk exceeds stroke risk ({:.1}%)",
                net_benefit_pct
            ),
            Recommendation::Equivocal => format!("Equivocal Benefit: {:.1}%", net_benefit_pct),
        }
    }
}

/// Render a result as human-readable text
pub fn render_text(result: &ScoreResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:<22} {:>2}  ({:.1}% risk/yr)\n",
        "CHA2DS2-VASc Score", result.stroke_score, result.stroke_risk_pct
    ));
    output.push_str(&format!(
        "{:<22} {:>2}  ({:.1}% risk/yr)\n",
        "HAS-BLED Score", result.bleed_score, result.bleed_risk_pct
    ));
    output.push('\n');
    output.push_str(&format!(
        "[{}] {}\n",
        result.recommendation.as_str(),
        result.recommendation.headline(result.net_benefit_pct)
    ));
    output.push('\n');
    output.push_str("Clinical Note:\n");
    output.push_str(&format!("  {}\n", format_clinical_note(result)));
    output.push('\n');
    output.push_str(DISCLAIMER);
    output.push('\n');

    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a ScoreResult,
    clinical_note: String,
}

/// Render a result and its clinical note as JSON
pub fn render_json(result: &ScoreResult) -> String {
    let report = JsonReport {
        result,
        clinical_note: format_clinical_note(result),
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
}
