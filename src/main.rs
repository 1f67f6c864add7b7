use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod aggregate;
mod models;
mod pipeline;
mod report;
mod store;

use aggregate::CategoryMap;
use models::BreakdownTable;
use store::Snapshot;

#[derive(Parser)]
#[command(name = "disruptor-backers")]
#[command(about = "Reports which investors backed tracked disruptor companies", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the per-investor funding-category breakdown as CSV
    Report {
        /// Two-column headerless CSV of tracked companies: uuid,name
        #[arg(long)]
        company_file: PathBuf,
        /// Directory holding funding_rounds.csv and investments.csv
        #[arg(long)]
        daily_report_dir: PathBuf,
        /// Optional raw-category to bucket remapping table
        #[arg(long)]
        convert_map: Option<PathBuf>,
        #[arg(long, default_value = "report.csv")]
        out: PathBuf,
    },
    /// List the active investors behind the tracked companies
    Active {
        #[arg(long)]
        company_file: PathBuf,
        #[arg(long)]
        daily_report_dir: PathBuf,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            company_file,
            daily_report_dir,
            convert_map,
            out,
        } => {
            let snapshot = Snapshot::load(&company_file, &daily_report_dir)?;
            let convert_map = convert_map
                .as_deref()
                .map(store::read_convert_map)
                .transpose()
                .context("failed to read convert map")?;
            let remapped = convert_map.is_some();
            let table = build_breakdown(&snapshot, convert_map);
            report::write_breakdown(&table, &out, remapped)?;
            println!(
                "Report for {} investors written to {}.",
                table.rows.len(),
                out.display()
            );
        }
        Commands::Active {
            company_file,
            daily_report_dir,
            limit,
        } => {
            let snapshot = Snapshot::load(&company_file, &daily_report_dir)?;
            let company_rounds =
                pipeline::rounds_by_company(&snapshot.companies, &snapshot.funding_rounds);
            let active = pipeline::active_investors(&company_rounds, &snapshot.investments);

            if active.is_empty() {
                println!("No active investors found for this snapshot.");
                return Ok(());
            }
            print!("{}", report::render_active_investors(&active, limit));
        }
    }

    Ok(())
}

/// Runs the full join-and-aggregate pipeline over one snapshot. With no
/// convert map, buckets are the raw investment types seen in the filtered
/// portfolios.
fn build_breakdown(
    snapshot: &Snapshot,
    convert_map: Option<BTreeMap<String, String>>,
) -> BreakdownTable {
    let company_rounds =
        pipeline::rounds_by_company(&snapshot.companies, &snapshot.funding_rounds);
    let active = pipeline::active_investors(&company_rounds, &snapshot.investments);
    let portfolios =
        pipeline::investor_portfolios(&active, &snapshot.investments, &snapshot.funding_rounds);
    let filtered = pipeline::retain_tracked_rounds(portfolios, &snapshot.companies);

    let categories = match convert_map {
        Some(entries) => CategoryMap::new(entries),
        None => CategoryMap::identity_over(&filtered),
    };

    info!(investors = filtered.len(), "aggregating backed companies");
    aggregate::count_backed_companies(&filtered, &categories)
}
