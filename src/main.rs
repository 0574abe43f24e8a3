use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use leakhound::config::AnalyzerConfig;
use leakhound::ingest::validate::{detect_table_kind, validate_table, TableKind};
use leakhound::record::Provider;
use leakhound::report::insights::generate_insights;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "leakhound",
    about = "Multi-cloud cost-leak detection for billing and usage exports",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a billing export and report cost leaks
    Analyze {
        /// Path to the billing/usage CSV export
        #[arg(long)]
        input: PathBuf,

        /// Cloud provider the export came from (aws, azure, gcp)
        #[arg(long)]
        provider: Provider,

        /// Optional TOML file overriding detector thresholds
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON output for machine parsing
        #[arg(long)]
        json: bool,

        /// Include the full pre-selection candidate list
        #[arg(long)]
        all_candidates: bool,
    },

    /// Validate an export's structure without analyzing it
    Validate {
        /// Path to the CSV file
        #[arg(long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            provider,
            config,
            json,
            all_candidates,
        } => {
            let analyzer_config = match config {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("failed to read config {}", path.display()))?;
                    AnalyzerConfig::from_toml(&content)
                        .with_context(|| format!("invalid config {}", path.display()))?
                }
                None => AnalyzerConfig::default(),
            };

            let table = leakhound::ingest::csv::load_csv(&input)?;
            validate_table(&table)?;

            let kind = detect_table_kind(&table.headers);
            if kind == TableKind::Invoice {
                anyhow::bail!(
                    "{} looks like an invoice export; analysis needs line-item cost/usage data",
                    input.display()
                );
            }

            let outcome = leakhound::normalize::normalize(&table, provider);
            let mut report = leakhound::analyze(&outcome.records, &analyzer_config);
            if !all_candidates {
                report.all_candidates.clear();
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n==============================");
                println!(" CLOUD COST LEAK REPORT");
                println!("==============================\n");
                println!("🔥 High severity: {}", report.summary.high);
                println!("⚠️  Medium severity: {}", report.summary.medium);
                println!("ℹ️  Low severity: {}\n", report.summary.low);

                for insight in generate_insights(&report) {
                    println!("{}\n", insight);
                }

                if report.estimated_monthly_waste > 0.0 {
                    println!(
                        "💸 Estimated Monthly Waste: ${:.2}\n",
                        report.estimated_monthly_waste
                    );
                }
                println!("✔ Analysis complete");
            }
        }
        Commands::Validate { input } => {
            let table = leakhound::ingest::csv::load_csv(&input)?;
            validate_table(&table)?;
            let kind = detect_table_kind(&table.headers);
            println!("CSV is valid for analysis");
            println!("Rows:    {}", table.rows.len());
            println!("Columns: {}", table.headers.join(", "));
            println!("Kind:    {}", kind);
        }
    }

    Ok(())
}
