//! Configuration file support for chadsbled
//!
//! Loads decision thresholds and replacement reference tables from JSON.
//!
//! Search order:
//! 1. Explicit path (--config CLI flag)
//! 2. `.chadsbledrc.json` in the working directory
//! 3. `chadsbled.config.json` in the working directory
//!
//! All fields are optional. Omitted values fall back to the published tables
//! and the default thresholds.

use crate::risk::{DecisionThresholds, RiskScorer};
use crate::tables::{ReferenceTables, RiskTable};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names probed during discovery, in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &[".chadsbledrc.json", "chadsbled.config.json"];

/// chadsbled configuration loaded from a JSON config file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChadsBledConfig {
    /// Net-benefit cut points for the recommendation
    #[serde(default)]
    pub thresholds: Option<ThresholdConfig>,

    /// Replacement reference tables
    #[serde(default)]
    pub tables: Option<TableConfig>,
}

/// Custom decision thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Net benefit above which anticoagulation is favored (default: 1.5)
    pub anticoagulation: Option<f64>,
    /// Net benefit below which observation is favored (default: 0.0)
    pub observation: Option<f64>,
}

/// Custom reference tables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Label identifying this reference data (required)
    pub version: String,
    /// Stroke risk % indexed by CHA2DS2-VASc score (default: published table)
    pub stroke: Option<Vec<f64>>,
    /// Stroke risk for scores past the table (default: last stroke entry)
    pub stroke_fallback: Option<f64>,
    /// Bleed risk % indexed by HAS-BLED score (default: published table)
    pub bleed: Option<Vec<f64>>,
    /// Bleed risk for scores past the table (default: last bleed entry)
    pub bleed_fallback: Option<f64>,
}

/// Resolved configuration ready for evaluation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub scorer: RiskScorer,
    /// Path the config was loaded from (None if defaults)
    pub config_path: Option<PathBuf>,
}

fn check_pct(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        anyhow::bail!("{} must be finite (got {})", name, value);
    }
    if value < 0.0 {
        anyhow::bail!("{} must be non-negative (got {})", name, value);
    }
    if value > 100.0 {
        anyhow::bail!("{} must be at most 100 (got {})", name, value);
    }
    // the clinical note prints risks with one decimal place
    let tenths = value * 10.0;
    if (tenths - tenths.round()).abs() > 1e-9 {
        anyhow::bail!(
            "{} must have at most one decimal place (got {})",
            name,
            value
        );
    }
    Ok(())
}

fn check_table(name: &str, entries: Option<&[f64]>, fallback: Option<f64>) -> Result<()> {
    if let Some(entries) = entries {
        if entries.is_empty() {
            anyhow::bail!("tables.{} must have at least one entry", name);
        }
        for (score, pct) in entries.iter().enumerate() {
            check_pct(&format!("tables.{}[{}]", name, score), *pct)?;
        }
    }
    if let Some(fb) = fallback {
        check_pct(&format!("tables.{}_fallback", name), fb)?;
    }
    Ok(())
}

fn resolve_table(
    entries: Option<&[f64]>,
    fallback: Option<f64>,
    published: RiskTable,
) -> RiskTable {
    match entries {
        Some(entries) => {
            // validate() guarantees at least one entry
            let last = entries.last().copied().unwrap_or(published.fallback());
            RiskTable::new(entries.to_vec(), fallback.unwrap_or(last))
        }
        None => match fallback {
            Some(fb) => RiskTable::new(published.entries().to_vec(), fb),
            None => published,
        },
    }
}

impl ChadsBledConfig {
    /// Validate the configuration for logical errors
    pub fn validate(&self) -> Result<()> {
        if let Some(ref t) = self.thresholds {
            let defaults = DecisionThresholds::default();
            let anticoagulation = t.anticoagulation.unwrap_or(defaults.anticoagulation);
            let observation = t.observation.unwrap_or(defaults.observation);

            if !anticoagulation.is_finite() {
                anyhow::bail!(
                    "thresholds.anticoagulation must be finite (got {})",
                    anticoagulation
                );
            }
            if !observation.is_finite() {
                anyhow::bail!("thresholds.observation must be finite (got {})", observation);
            }
            if observation > 0.0 {
                anyhow::bail!(
                    "thresholds.observation must not be positive (got {})",
                    observation
                );
            }
            if anticoagulation < 0.0 {
                anyhow::bail!(
                    "thresholds.anticoagulation must be non-negative (got {})",
                    anticoagulation
                );
            }
        }

        if let Some(ref t) = self.tables {
            if t.version.trim().is_empty() {
                anyhow::bail!("tables.version must not be empty");
            }
            check_table("stroke", t.stroke.as_deref(), t.stroke_fallback)?;
            check_table("bleed", t.bleed.as_deref(), t.bleed_fallback)?;
        }

        Ok(())
    }

    /// Resolve config into a scorer
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let defaults = DecisionThresholds::default();
        let thresholds = match &self.thresholds {
            Some(t) => DecisionThresholds {
                anticoagulation: t.anticoagulation.unwrap_or(defaults.anticoagulation),
                observation: t.observation.unwrap_or(defaults.observation),
            },
            None => defaults,
        };

        let tables = match &self.tables {
            Some(t) => ReferenceTables {
                version: t.version.clone(),
                stroke: resolve_table(
                    t.stroke.as_deref(),
                    t.stroke_fallback,
                    RiskTable::cha2ds2_vasc(),
                ),
                bleed: resolve_table(t.bleed.as_deref(), t.bleed_fallback, RiskTable::has_bled()),
            },
            None => ReferenceTables::default(),
        };

        Ok(ResolvedConfig {
            scorer: RiskScorer::new(tables, thresholds),
            config_path: None,
        })
    }
}

impl ResolvedConfig {
    /// Build a ResolvedConfig with all defaults (no config file)
    pub fn defaults() -> Result<Self> {
        ChadsBledConfig::default().resolve()
    }
}

/// Discover and load a config file from a directory
///
/// Returns `None` if no config file is found (use defaults).
pub fn discover_config(dir: &Path) -> Result<Option<(ChadsBledConfig, PathBuf)>> {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if path.exists() {
            let config = load_config_file(&path)?;
            return Ok(Some((config, path)));
        }
    }
    Ok(None)
}

/// Load config from an explicit file path
pub fn load_config_file(path: &Path) -> Result<ChadsBledConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    let config: ChadsBledConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("invalid config in: {}", path.display()))?;

    Ok(config)
}

/// Load and resolve config
///
/// If `config_path` is provided, loads from that file.
/// Otherwise, discovers config in `dir`.
/// Returns default config if nothing is found.
pub fn load_and_resolve(dir: &Path, config_path: Option<&Path>) -> Result<ResolvedConfig> {
    let (config, source_path) = if let Some(path) = config_path {
        let config = load_config_file(path)?;
        (config, Some(path.to_path_buf()))
    } else {
        match discover_config(dir)? {
            Some((config, path)) => (config, Some(path)),
            None => (ChadsBledConfig::default(), None),
        }
    };

    let mut resolved = config.resolve()?;
    resolved.config_path = source_path;
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChadsBledConfig::default();
        config.validate().expect("default config should be valid");
        let resolved = config.resolve().expect("default config should resolve");
        assert_eq!(resolved.scorer, RiskScorer::default());
        assert!(resolved.scorer.tables.is_published());
        assert_eq!(resolved.scorer.thresholds.anticoagulation, 1.5);
        assert_eq!(resolved.scorer.thresholds.observation, 0.0);
        assert_eq!(ResolvedConfig::defaults().unwrap().scorer, resolved.scorer);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: ChadsBledConfig = serde_json::from_str("{}").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "thresholds": { "anticoagulation": 2.0, "observation": -0.5 },
            "tables": {
                "version": "local-2024",
                "stroke": [0.2, 0.9, 2.9],
                "stroke_fallback": 10.0,
                "bleed": [0.9, 3.4],
                "bleed_fallback": 8.0
            }
        }"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        let resolved = config.resolve().unwrap();
        let scorer = resolved.scorer;
        assert_eq!(scorer.thresholds.anticoagulation, 2.0);
        assert_eq!(scorer.thresholds.observation, -0.5);
        assert_eq!(scorer.tables.version, "local-2024");
        assert_eq!(scorer.tables.stroke.entries(), &[0.2, 0.9, 2.9]);
        assert_eq!(scorer.tables.stroke.fallback(), 10.0);
        assert_eq!(scorer.tables.bleed.lookup(5), 8.0);
    }

    #[test]
    fn test_custom_table_fallback_defaults_to_last_entry() {
        let json = r#"{"tables": {"version": "v2", "bleed": [1.0, 2.0, 4.5]}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        let tables = config.resolve().unwrap().scorer.tables;
        assert_eq!(tables.bleed.fallback(), 4.5);
        assert_eq!(tables.stroke, RiskTable::cha2ds2_vasc());
    }

    #[test]
    fn test_reject_unknown_fields() {
        let result: Result<ChadsBledConfig, _> = serde_json::from_str(r#"{"unknown": true}"#);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_reject_tables_without_version() {
        let result: Result<ChadsBledConfig, _> =
            serde_json::from_str(r#"{"tables": {"stroke": [1.0]}}"#);
        assert!(result.is_err());

        let config: ChadsBledConfig =
            serde_json::from_str(r#"{"tables": {"version": "  "}}"#).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_thresholds_that_do_not_straddle_zero() {
        for json in [
            r#"{"thresholds": {"anticoagulation": 3.0, "observation": 1.0}}"#,
            r#"{"thresholds": {"anticoagulation": -2.0, "observation": -3.0}}"#,
            r#"{"thresholds": {"observation": 0.5}}"#,
            r#"{"thresholds": {"anticoagulation": -0.1}}"#,
        ] {
            let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
            assert!(config.validate().is_err(), "{} should be rejected", json);
        }
    }

    #[test]
    fn test_zero_thresholds_allowed() {
        let json = r#"{"thresholds": {"anticoagulation": 0.0, "observation": 0.0}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_custom_thresholds_keep_headline_consistent_with_sign() {
        use crate::factors::RiskFactors;
        use crate::report::render_text;

        let json = r#"{"thresholds": {"anticoagulation": 3.0, "observation": -2.0}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        let scorer = config.resolve().unwrap().scorer;

        // stroke 1.3% vs bleed 1.0%: positive net inside the wider equivocal band
        let text = render_text(&scorer.evaluate(&RiskFactors::new(65)).unwrap());
        assert!(text.contains("[equivocal] Equivocal Benefit: 0.3%"));

        // stroke 0.0% vs bleed 1.1%: negative, but above the observation cut
        let text = render_text(&scorer.evaluate(&RiskFactors::new(20)).unwrap());
        assert!(text.contains("[equivocal] Equivocal Benefit: -1.1%"));
        assert!(!text.contains("Anticoagulation: -"));
    }

    #[test]
    fn test_reject_table_entries_finer_than_tenths() {
        let json =
            r#"{"tables": {"version": "v2", "stroke": [0.25, 1.35], "bleed": [0.95, 1.04]}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tables.stroke[0]"));

        let json = r#"{"tables": {"version": "v2", "bleed_fallback": 12.45}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_table_note_matches_computed_risk() {
        use crate::factors::RiskFactors;
        use crate::report::format_clinical_note;

        let json = r#"{"tables": {"version": "v2", "stroke": [0.2, 1.4], "bleed": [0.9, 1.1]}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        let result = config
            .resolve()
            .unwrap()
            .scorer
            .evaluate(&RiskFactors::new(65))
            .unwrap();
        assert_eq!(result.stroke_risk_pct, 1.4);
        assert_eq!(result.bleed_risk_pct, 1.1);
        assert!(format_clinical_note(&result)
            .starts_with("CHA2DS2-VASc 1 (1.4%/yr); HAS-BLED 1 (1.1%/yr)."));
    }

    #[test]
    fn test_published_tables_pass_precision_check() {
        let json = r#"{"tables": {
            "version": "copy",
            "stroke": [0, 1.3, 2.2, 3.2, 4.0, 6.7, 9.8, 9.6, 6.7, 15.2],
            "bleed": [1.1, 1.0, 1.9, 3.7, 8.7, 12.5]
        }}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn test_reject_negative_table_entry() {
        let json = r#"{"tables": {"version": "v", "stroke": [0.0, -1.0]}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tables.stroke[1]"));
    }

    #[test]
    fn test_reject_empty_table() {
        let json = r#"{"tables": {"version": "v", "bleed": []}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reject_table_entry_over_100() {
        let json = r#"{"tables": {"version": "v", "bleed_fallback": 101.0}}"#;
        let config: ChadsBledConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(".chadsbledrc.json");
        fs::write(&config_path, r#"{"thresholds": {"anticoagulation": 2.5}}"#).unwrap();

        let result = discover_config(dir.path()).unwrap();
        let (config, path) = result.unwrap();
        assert_eq!(
            config.thresholds.and_then(|t| t.anticoagulation),
            Some(2.5)
        );
        assert_eq!(path, config_path);
    }

    #[test]
    fn test_discover_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".chadsbledrc.json"),
            r#"{"thresholds": {"anticoagulation": 1.0}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("chadsbled.config.json"),
            r#"{"thresholds": {"anticoagulation": 2.0}}"#,
        )
        .unwrap();

        let (config, _) = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(
            config.thresholds.and_then(|t| t.anticoagulation),
            Some(1.0),
            ".chadsbledrc.json should take priority"
        );
    }

    #[test]
    fn test_no_config_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_and_resolve_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = load_and_resolve(dir.path(), None).unwrap();
        assert!(resolved.config_path.is_none());
        assert!(resolved.scorer.tables.is_published());
    }

    #[test]
    fn test_load_and_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("custom.json");
        fs::write(&config_path, r#"{"thresholds": {"observation": -1.0}}"#).unwrap();

        let resolved = load_and_resolve(dir.path(), Some(&config_path)).unwrap();
        assert_eq!(resolved.scorer.thresholds.observation, -1.0);
        assert_eq!(resolved.scorer.thresholds.anticoagulation, 1.5);
        assert_eq!(resolved.config_path, Some(config_path));
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.json");
        fs::write(&config_path, "{ not json").unwrap();

        let err = load_config_file(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
