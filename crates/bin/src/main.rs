//! Balans CLI binary.
//!
//! Command-line front-end for the NBB Central Balance Sheet Office web
//! service: company-number formatting, reference listing and report export.

use balans_data::cbso::{FilingReference, PeriodSymbol};
use balans_data::{
    CbsoClient, ClientConfig, CompanyNumber, Database, FilingFetcher, FilingSet, LineCodeTable,
    format_id,
};
use balans_output::{ExportFormat, Exporter, ReportTables};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "balans")]
#[command(about = "Balans: Belgian annual accounts from the NBB CBSO", long_about = None)]
#[command(version)]
struct Cli {
    /// Registry database to query (authentic, extracts, improved)
    #[arg(long, global = true)]
    database: Option<Database>,

    /// Override the web service base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a company number
    FormatId {
        /// Company number in any notation
        id: String,

        /// Print as "BE dddd.ddd.ddd"
        #[arg(long)]
        prefix: bool,
    },

    /// List the filings that would be fetched for a company
    References {
        /// Company number
        id: String,

        /// Number of most recent accounting periods
        #[arg(long, default_value = "1")]
        years: usize,

        /// Print the references as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch filings and export the report tables
    Fetch {
        /// Company number
        id: String,

        /// Number of most recent accounting periods
        #[arg(long, default_value = "1")]
        years: usize,

        /// Period columns to export (N, NM1); repeatable
        #[arg(long = "period", default_value = "N")]
        periods: Vec<PeriodSymbol>,

        /// Add derived metric columns to the financial table
        #[arg(long)]
        metrics: bool,

        /// Output format (csv, json, pretty-json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Write every table into this directory instead of printing
        #[arg(long)]
        output: Option<PathBuf>,

        /// Line-code table (CSV with label,code header)
        #[arg(long)]
        line_codes: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::FormatId { id, prefix } => {
            println!("{}", format_id(&id, prefix)?);
        }
        Commands::References { id, years, json } => {
            let company = CompanyNumber::parse(&id)?;
            let fetcher = FilingFetcher::new(client(cli.database, cli.base_url)?);
            let references = fetcher.fetch_references(&company, years).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&references)?);
            } else {
                print_references(&company, &references);
            }
        }
        Commands::Fetch {
            id,
            years,
            periods,
            metrics,
            format,
            output,
            line_codes,
        } => {
            let company = CompanyNumber::parse(&id)?;
            let lookup = match line_codes {
                Some(path) => LineCodeTable::from_path(path)?,
                None => LineCodeTable::embedded()?,
            };

            let set = fetch_with_progress(
                client(cli.database, cli.base_url)?,
                &company,
                years,
            )
            .await?;

            let tables = ReportTables::from_filings(&company, &set, &periods, &lookup, metrics);
            for (reference, error) in set.failures() {
                eprintln!("Skipped {}: {}", reference, error);
            }
            for missing in &tables.missing {
                eprintln!("Missing {}", missing);
            }

            match output {
                Some(dir) => {
                    let written = tables.write_dir(&dir, format)?;
                    for path in written {
                        println!("Wrote {}", path.display());
                    }
                }
                None => print!("{}", tables.financials.export_to_string(format)?),
            }
        }
    }

    Ok(())
}

/// Build the HTTP client from the environment plus command-line overrides.
fn client(
    database: Option<Database>,
    base_url: Option<String>,
) -> Result<CbsoClient, Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(database) = database {
        config = config.with_database(database);
    }
    if let Some(base_url) = base_url {
        config = config.with_base_url(base_url);
    }
    Ok(CbsoClient::new(config)?)
}

async fn fetch_with_progress(
    client: CbsoClient,
    company: &CompanyNumber,
    years: usize,
) -> Result<FilingSet, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("█▓░"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Resolving references for {}...", company.display_prefixed()));

    let reporter = pb.clone();
    let fetcher = FilingFetcher::new(client).with_progress(Box::new(move |done, total, reference| {
        reporter.set_length(total as u64);
        reporter.set_position(done as u64);
        reporter.set_message(reference.to_string());
    }));

    let references = match fetcher.fetch_references(company, years).await {
        Ok(references) => references,
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };
    pb.set_length(references.len() as u64);

    match fetcher.fetch_filings(company, &references).await {
        Ok(set) => {
            pb.finish_with_message(format!(
                "Fetched {} filings ({} failed)",
                set.records().count(),
                set.failures().count()
            ));
            Ok(set)
        }
        Err(e) => {
            pb.finish_with_message("Failed!");
            Err(e.into())
        }
    }
}

fn print_references(company: &CompanyNumber, references: &[FilingReference]) {
    if references.is_empty() {
        println!("No filings found for {}", company.display_prefixed());
        return;
    }

    println!("Filings for {}", company.display_prefixed());
    println!(
        "{:<16} {:<12} {:<12} {:<12} {:<14}",
        "Reference", "Start", "End", "Deposited", "Model"
    );
    println!("{}", "-".repeat(70));
    for reference in references {
        println!(
            "{:<16} {:<12} {:<12} {:<12} {:<14}",
            reference.reference_number,
            date_cell(reference.period_start),
            date_cell(reference.period_end),
            date_cell(reference.deposit_date),
            reference.model_type.as_ref().map_or("-", |m| m.as_str()),
        );
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}
