//! chadsbled CLI - stroke vs. bleed net-benefit calculator

#![deny(warnings)]

// Global invariants enforced:
// - Results go to stdout, diagnostics and logs to stderr
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use chadsbled_core::config::{self, ResolvedConfig};
use chadsbled_core::factors::DEFAULT_AGE;
use chadsbled_core::tables::{CITATIONS, DISCLAIMER};
use chadsbled_core::{format_clinical_note, render_json, render_text, RiskFactors, RiskTable};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "chadsbled")]
#[command(about = "Integrated stroke vs. bleed risk assessment (CHA2DS2-VASc / HAS-BLED)")]
#[command(version = env!("CHADSBLED_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one patient and print the recommendation
    Score {
        #[command(flatten)]
        factors: FactorFlags,

        /// Read the risk factors from a JSON record instead of flags
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the active reference tables and their sources
    Tables {
        /// Output format
        #[arg(long, default_value = "text")]
        format: TablesFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scoring
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Risk-factor flags for a single patient
#[derive(Args)]
struct FactorFlags {
    /// Patient age in years, 18-100 (default: 65)
    #[arg(long, value_parser = clap::value_parser!(u32).range(18..=100))]
    age: Option<u32>,

    /// Female sex
    #[arg(long)]
    female: bool,

    /// Hypertension history (stroke score)
    #[arg(long)]
    hypertension_stroke: bool,

    /// Heart failure history
    #[arg(long)]
    heart_failure: bool,

    /// Diabetes
    #[arg(long)]
    diabetes: bool,

    /// Stroke/TIA history
    #[arg(long)]
    stroke_history: bool,

    /// Vascular disease (MI/PAD)
    #[arg(long)]
    vascular_disease: bool,

    /// Uncontrolled hypertension, systolic > 160 mmHg (bleed score)
    #[arg(long)]
    uncontrolled_hypertension: bool,

    /// Renal impairment
    #[arg(long)]
    renal: bool,

    /// Liver impairment
    #[arg(long)]
    liver: bool,

    /// Prior major bleed
    #[arg(long)]
    prior_bleed: bool,

    /// Antiplatelets or alcohol
    #[arg(long)]
    antiplatelet_or_alcohol: bool,

    /// Legacy single hypertension flag counted in both scores
    #[arg(long)]
    hypertension: bool,
}

impl FactorFlags {
    fn any_set(&self) -> bool {
        self.age.is_some()
            || self.female
            || self.hypertension_stroke
            || self.heart_failure
            || self.diabetes
            || self.stroke_history
            || self.vascular_disease
            || self.uncontrolled_hypertension
            || self.renal
            || self.liver
            || self.prior_bleed
            || self.antiplatelet_or_alcohol
            || self.hypertension
    }

    fn to_factors(&self) -> RiskFactors {
        let factors = RiskFactors {
            female: self.female,
            hypertension_stroke: self.hypertension_stroke,
            heart_failure: self.heart_failure,
            diabetes: self.diabetes,
            stroke_history: self.stroke_history,
            vascular_disease: self.vascular_disease,
            uncontrolled_hypertension_bleed: self.uncontrolled_hypertension,
            renal_impairment: self.renal,
            liver_impairment: self.liver,
            prior_major_bleed: self.prior_bleed,
            antiplatelet_or_alcohol: self.antiplatelet_or_alcohol,
            ..RiskFactors::new(self.age.unwrap_or(DEFAULT_AGE))
        };
        if self.hypertension {
            factors.with_shared_hypertension(true)
        } else {
            factors
        }
    }
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Note,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum TablesFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            factors,
            input,
            format,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;

            let risk_factors = match input {
                Some(path) => {
                    if factors.any_set() {
                        anyhow::bail!("--input cannot be combined with risk-factor flags");
                    }
                    read_factors(&path)?
                }
                None => factors.to_factors(),
            };
            log::debug!("scoring {:?}", risk_factors);

            let result = resolved
                .scorer
                .evaluate(&risk_factors)
                .context("failed to score patient")?;

            match format {
                OutputFormat::Text => print!("{}", render_text(&result)),
                OutputFormat::Json => println!("{}", render_json(&result)),
                OutputFormat::Note => println!("{}", format_clinical_note(&result)),
            }
        }
        Commands::Tables {
            format,
            config: config_path,
        } => {
            let resolved = load_config(config_path.as_deref())?;
            match format {
                TablesFormat::Text => print_tables_text(&resolved),
                TablesFormat::Json => {
                    let json = render_tables_json(&resolved)?;
                    println!("{}", json);
                }
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let dir = std::env::current_dir()?;
                match config::load_and_resolve(&dir, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let dir = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&dir, path.as_deref())
                    .context("failed to load configuration")?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Thresholds:");
                println!(
                    "  anticoagulation: {}",
                    resolved.scorer.thresholds.anticoagulation
                );
                println!("  observation: {}", resolved.scorer.thresholds.observation);
                println!();
                println!("Tables:");
                println!("  version: {}", resolved.scorer.tables.version);
                println!(
                    "  published: {}",
                    if resolved.scorer.tables.is_published() {
                        "yes"
                    } else {
                        "no (custom reference data)"
                    }
                );
            }
        },
    }

    Ok(())
}

/// Load config from an explicit path or discover it in the working directory
fn load_config(config_path: Option<&Path>) -> anyhow::Result<ResolvedConfig> {
    let dir = std::env::current_dir()?;
    let resolved =
        config::load_and_resolve(&dir, config_path).context("failed to load configuration")?;
    if let Some(path) = &resolved.config_path {
        eprintln!("Using config: {}", path.display());
    }
    Ok(resolved)
}

fn read_factors(path: &Path) -> anyhow::Result<RiskFactors> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file: {}", path.display()))?;
    RiskFactors::from_json(&content)
        .with_context(|| format!("invalid risk factors in: {}", path.display()))
}

fn render_tables_json(resolved: &ResolvedConfig) -> anyhow::Result<String> {
    #[derive(serde::Serialize)]
    struct TablesOutput<'a> {
        #[serde(flatten)]
        scorer: &'a chadsbled_core::RiskScorer,
        citations: &'a [chadsbled_core::tables::Citation],
        disclaimer: &'a str,
    }

    let output = TablesOutput {
        scorer: &resolved.scorer,
        citations: if resolved.scorer.tables.is_published() {
            CITATIONS
        } else {
            &[]
        },
        disclaimer: DISCLAIMER,
    };
    serde_json::to_string_pretty(&output).context("failed to serialize tables to JSON")
}

fn print_table(title: &str, table: &RiskTable) {
    println!("{}", title);
    println!("  {:<6} {:>8}", "SCORE", "RISK/YR");
    for (score, pct) in table.entries().iter().enumerate() {
        println!("  {:<6} {:>7.1}%", score, pct);
    }
    let past_table = format!(">{}", table.max_score());
    println!("  {:<6} {:>7.1}%", past_table, table.fallback());
}

fn print_tables_text(resolved: &ResolvedConfig) {
    let scorer = &resolved.scorer;
    println!("Reference tables: {}", scorer.tables.version);
    println!();
    print_table("CHA2DS2-VASc (stroke)", &scorer.tables.stroke);
    println!();
    print_table("HAS-BLED (bleed)", &scorer.tables.bleed);
    println!();
    println!("Net benefit = stroke risk - bleed risk");
    println!(
        "  > {:.1}%  favors anticoagulation",
        scorer.thresholds.anticoagulation
    );
    println!(
        "  < {:.1}%  favors observation",
        scorer.thresholds.observation
    );
    println!("  otherwise equivocal");
    println!();
    if scorer.tables.is_published() {
        println!("Clinical evidence:");
        for citation in CITATIONS {
            println!("  {}: {}", citation.score, citation.source);
        }
    } else {
        println!("Clinical evidence: custom reference data (see config)");
    }
    println!();
    println!("{}", DISCLAIMER);
}
