use analytics::{AnalyticsEngine, report::AnalysisReport, report::ClassSummaryRow};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use core_types::RawTransaction;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// The main entry point for the Pickwise analysis application.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => {
            if let Err(e) = handle_analyze(args) {
                eprintln!("Error during analysis: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// ABC-XYZ classification and inventory planning for warehouse picking data.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify items and derive min/max stock recommendations.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// CSV file of picking transactions
    /// (columns: item_code,item_name,zone,quantity,picked_at).
    #[arg(long)]
    input: PathBuf,

    /// Optional TOML file overriding the default thresholds and factors.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the full analysis report as JSON to this path.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Only analyze these warehouse zones (comma-separated).
    #[arg(long, value_delimiter = ',')]
    zones: Vec<String>,

    /// Only analyze these item codes (comma-separated).
    #[arg(long, value_delimiter = ',')]
    items: Vec<String>,

    /// Ignore picks before this date (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Ignore picks after this date (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles the orchestration of one analysis run: load configuration, load
/// and filter the transactions, run the engine, render the results.
fn handle_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = configuration::load_config(args.config.as_deref())?;

    let records = load_records(&args.input)?;
    info!(records = records.len(), input = %args.input.display(), "loaded picking records");
    let records = apply_filters(records, &args);

    let engine = AnalyticsEngine::new(config)?;
    let report = engine.run(&records)?;

    if report.ingest.dropped() > 0 {
        warn!(
            dropped = report.ingest.dropped(),
            missing_item_code = report.ingest.dropped_missing_item_code,
            bad_timestamp = report.ingest.dropped_bad_timestamp,
            "some records were dropped during normalization"
        );
    }

    render_report(&report);

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        info!(output = %path.display(), "wrote full report");
    }

    Ok(())
}

/// One row of the input CSV. Everything except the item code is optional;
/// the engine drops and counts whatever turns out to be unusable.
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(default)]
    item_code: String,
    #[serde(default)]
    item_name: Option<String>,
    #[serde(default)]
    zone: Option<String>,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    picked_at: Option<String>,
}

fn load_records(path: &Path) -> anyhow::Result<Vec<RawTransaction>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row.context("malformed CSV row")?;
        let quantity = row.quantity.unwrap_or(0.0);
        if quantity < 0.0 {
            warn!(item_code = %row.item_code, quantity, "clamping negative quantity to 0");
        }
        records.push(RawTransaction {
            item_code: row.item_code,
            item_name: row.item_name,
            zone: row.zone,
            quantity: quantity.max(0.0),
            picked_at: row.picked_at,
        });
    }
    Ok(records)
}

/// Applies the optional zone/item/date filters, mirroring the WHERE clause
/// the original warehouse query applied at the database.
fn apply_filters(records: Vec<RawTransaction>, args: &AnalyzeArgs) -> Vec<RawTransaction> {
    records
        .into_iter()
        .filter(|r| {
            if !args.zones.is_empty() {
                match &r.zone {
                    Some(zone) if args.zones.iter().any(|z| z == zone) => {}
                    _ => return false,
                }
            }
            if !args.items.is_empty() && !args.items.iter().any(|i| i == &r.item_code) {
                return false;
            }
            if args.from.is_some() || args.to.is_some() {
                // Unparsable timestamps pass through so the engine can count
                // them as drops instead of the filter hiding them.
                if let Some(picked_at) = r
                    .picked_at
                    .as_deref()
                    .and_then(analytics::normalizer::parse_timestamp)
                {
                    let date = picked_at.date();
                    if args.from.is_some_and(|from| date < from) {
                        return false;
                    }
                    if args.to.is_some_and(|to| date > to) {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

// ==============================================================================
// Terminal Rendering
// ==============================================================================

fn render_report(report: &AnalysisReport) {
    println!(
        "\nAnalyzed {} items over {} months ({} of {} records accepted)\n",
        report.classifications.len(),
        report.months.len(),
        report.ingest.accepted,
        report.ingest.total_records,
    );

    print_summary("ABC classes", &report.abc_summary);
    print_summary("XYZ classes", &report.xyz_summary);
    print_summary("ABC-XYZ matrix", &report.combined_summary);
    print_zone_summary(report);
    print_top_items(report);

    if !report.attention_items.is_empty() {
        println!(
            "Items needing attention (class A with erratic demand): {}\n",
            report.attention_items.join(", ")
        );
    }
}

fn print_summary(title: &str, rows: &[ClassSummaryRow]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Class",
        "Items",
        "% of items",
        "Turnover",
        "% of turnover",
        "Quantity",
        "% of quantity",
    ]);
    for row in rows {
        table.add_row(vec![
            row.label.clone(),
            row.item_count.to_string(),
            format!("{:.1}", row.pct_of_items),
            row.total_turnover.to_string(),
            format!("{:.1}", row.pct_of_turnover),
            format!("{:.1}", row.total_quantity),
            format!("{:.1}", row.pct_of_quantity),
        ]);
    }
    println!("{title}\n{table}\n");
}

fn print_zone_summary(report: &AnalysisReport) {
    let mut table = Table::new();
    table.set_header(vec!["Zone", "Items", "A", "B", "C", "Turnover"]);
    for zone in &report.zone_summaries {
        table.add_row(vec![
            zone.zone.clone(),
            zone.item_count.to_string(),
            zone.class_counts[0].to_string(),
            zone.class_counts[1].to_string(),
            zone.class_counts[2].to_string(),
            zone.total_turnover.to_string(),
        ]);
    }
    println!("Warehouse zones\n{table}\n");
}

fn print_top_items(report: &AnalysisReport) {
    let mut table = Table::new();
    table.set_header(vec![
        "Rank", "Item", "Name", "Zone", "ABC", "XYZ", "Turnover", "Min/wk", "Max/wk",
    ]);
    for (c, p) in report
        .classifications
        .iter()
        .zip(&report.inventory)
        .take(20)
    {
        let aggregate = report
            .aggregates
            .iter()
            .find(|a| a.item_code == c.item_code);
        table.add_row(vec![
            c.rank.to_string(),
            c.item_code.clone(),
            aggregate.map(|a| a.item_name.clone()).unwrap_or_default(),
            aggregate.map(|a| a.zone.clone()).unwrap_or_default(),
            c.abc.to_string(),
            c.xyz.to_string(),
            c.total_turnover.to_string(),
            format!("{}", p.min_qty_weekly),
            format!("{}", p.max_qty_weekly),
        ]);
    }
    println!("Top items by turnover\n{table}\n");
}
