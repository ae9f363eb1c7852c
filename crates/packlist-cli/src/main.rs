//! Packing list CLI
//!
//! Command-line tool for extracting per-size product quantities from supplier
//! packing lists, then searching, summarising, and exporting the results.

use clap::{Parser, Subcommand};
use packlist_core::{
    load_json, open_workbook, scan_inputs, search, write_csv, write_json, ExtractConfig,
    FieldColumnLocator, Provenance, Quantities, RecordStore, RunReport, SearchQuery,
    SheetExtractor, SheetOutcome, Size,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "packlist")]
#[command(about = "Packing list quantity extractor", long_about = None)]
#[command(version)]
struct Cli {
    /// Log locator decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract records from workbooks or directories of workbooks
    Extract {
        /// Workbook files or directories to scan
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Wholesaler the packing lists belong to
        #[arg(short, long)]
        wholesaler: Option<String>,

        /// Write records as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write flattened per-size rows as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write per-sheet diagnostics as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Extraction config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use fixed product,color columns instead of scanning for labels
        #[arg(long, value_name = "PRODUCT,COLOR")]
        fixed_columns: Option<String>,
    },

    /// Show the detected layout of each sheet without extracting
    Inspect {
        /// Workbook file
        #[arg(short, long)]
        file: PathBuf,

        /// Extraction config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Search extracted records by product name, color, and size
    Search {
        /// JSON file written by `extract`
        #[arg(short, long)]
        data: PathBuf,

        /// Product name substring
        name: Option<String>,

        /// Color substring
        color: Option<String>,

        /// Exact size (e.g. 140, FREE)
        size: Option<String>,
    },

    /// Per-product, per-color totals
    Summary {
        /// JSON file written by `extract`
        #[arg(short, long)]
        data: PathBuf,

        /// List every record before the per-product totals
        #[arg(long)]
        records: bool,
    },

    /// Convert a JSON extraction to flattened CSV
    ExportCsv {
        /// JSON file written by `extract`
        #[arg(short, long)]
        data: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Create a config file with the default scan windows
    CreateConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,

        /// Write the fixed-column layout instead of label scanning
        #[arg(long)]
        fixed: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> packlist_core::Result<()> {
    match command {
        Commands::Extract {
            input,
            wholesaler,
            output,
            csv,
            report,
            config,
            fixed_columns,
        } => {
            let config = load_config(config.as_deref(), fixed_columns.as_deref())?;
            cmd_extract(&input, wholesaler, &config, output, csv, report)
        }
        Commands::Inspect { file, config } => {
            let config = load_config(config.as_deref(), None)?;
            cmd_inspect(&file, config)
        }
        Commands::Search {
            data,
            name,
            color,
            size,
        } => cmd_search(&data, name, color, size),
        Commands::Summary { data, records } => cmd_summary(&data, records),
        Commands::ExportCsv { data, output } => cmd_export_csv(&data, &output),
        Commands::CreateConfig { output, fixed } => cmd_create_config(&output, fixed),
    }
}

fn load_config(path: Option<&Path>, fixed_columns: Option<&str>) -> packlist_core::Result<ExtractConfig> {
    let mut config = match path {
        Some(path) => ExtractConfig::load(path)?,
        None => ExtractConfig::default(),
    };
    if let Some(columns) = fixed_columns {
        config.fields = parse_fixed_columns(columns)?;
    }
    Ok(config)
}

/// Parse "11,12" or "11" into a fixed field layout
fn parse_fixed_columns(columns: &str) -> packlist_core::Result<FieldColumnLocator> {
    let invalid = || {
        packlist_core::Error::InvalidConfig(format!(
            "expected 'PRODUCT[,COLOR]' column indices, got '{}'",
            columns
        ))
    };
    let mut parts = columns.split(',').map(str::trim);
    let product = parts
        .next()
        .and_then(|p| p.parse::<usize>().ok())
        .ok_or_else(invalid)?;
    let color = match parts.next() {
        Some(c) => Some(c.parse::<usize>().map_err(|_| invalid())?),
        None => None,
    };
    if parts.next().is_some() {
        return Err(invalid());
    }
    Ok(FieldColumnLocator::Fixed { product, color })
}

fn cmd_extract(
    inputs: &[PathBuf],
    wholesaler: Option<String>,
    config: &ExtractConfig,
    output: Option<PathBuf>,
    csv: Option<PathBuf>,
    report: Option<PathBuf>,
) -> packlist_core::Result<()> {
    let scan = scan_inputs(inputs)?;
    tracing::info!(files = scan.total_files(), "scanned inputs");

    let extractor = SheetExtractor::new(config.clone());
    let mut stores: Vec<RecordStore> = Vec::new();
    let mut reports: Vec<RunReport> = Vec::new();

    for path in &scan.files {
        tracing::info!(path = %path.display(), "reading workbook");
        let workbook = open_workbook(path)?;
        let provenance = Provenance::new(wholesaler.clone(), workbook.file_name());
        let extraction = extractor.process(&workbook, provenance);

        print_report(&extraction.report);
        stores.push(extraction.store);
        reports.push(extraction.report);
    }

    let total_records: usize = stores.iter().map(RecordStore::len).sum();
    let total_quantity = stores
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.total_quantity()));
    let skipped: usize = reports.iter().map(RunReport::skipped_sheets).sum();
    println!();
    println!("Extracted {} records ({} pieces)", total_records, total_quantity);
    println!("Skipped {} sheet(s)", skipped);

    if let Some(path) = output {
        write_json(&stores, &path)?;
        println!("Wrote records to {}", path.display());
    }
    if let Some(path) = csv {
        let rows = write_csv(&stores, &path)?;
        println!("Wrote {} rows to {}", rows, path.display());
    }
    if let Some(path) = report {
        std::fs::write(&path, serde_json::to_string_pretty(&reports)?)?;
        println!("Wrote report to {}", path.display());
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    let file = report
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    println!();
    println!("{}", file);
    for sheet in &report.sheets {
        match &sheet.outcome {
            SheetOutcome::Extracted {
                header_row,
                sizes,
                records,
                ..
            } => println!(
                "  {}: {} records (header row {}, {} sizes)",
                sheet.sheet,
                records,
                header_row,
                sizes.len()
            ),
            SheetOutcome::Skipped { reason } => println!("  {}: skipped ({})", sheet.sheet, reason),
        }
    }
}

fn cmd_inspect(file: &Path, config: ExtractConfig) -> packlist_core::Result<()> {
    let workbook = open_workbook(file)?;
    let extractor = SheetExtractor::new(config);

    println!("File: {}", file.display());
    println!("Sheets: {}", workbook.sheets.len());

    for (index, sheet) in workbook.sheets.iter().enumerate() {
        let (rows, cols) = sheet.grid.shape();
        println!();
        println!("[{}] {} ({} rows x {} columns)", index + 1, sheet.name, rows, cols);
        if index == 0 {
            println!("  leading sheet, never extracted");
        }

        match extractor.inspect(sheet) {
            Ok((header, fields)) => {
                println!("  Header row: {}", header.row + 1);
                let sizes: Vec<String> = header
                    .columns
                    .iter()
                    .map(|(col, size)| format!("{}={}", col, size))
                    .collect();
                println!("  Sizes: {}", sizes.join(", "));
                println!("  Product column: {}", format_column(fields.product));
                println!("  Color column: {}", format_column(fields.color));
            }
            Err(reason) => println!("  {}", reason),
        }
    }

    Ok(())
}

fn format_column(col: Option<usize>) -> String {
    col.map(|c| c.to_string())
        .unwrap_or_else(|| "not found".to_string())
}

fn cmd_search(
    data: &Path,
    name: Option<String>,
    color: Option<String>,
    size: Option<String>,
) -> packlist_core::Result<()> {
    let stores = load_json(data)?;
    let Some(query) = build_query(name, color, size) else {
        println!("No matching records.");
        return Ok(());
    };

    let result = search(&stores, &query);
    if result.matches.is_empty() {
        println!("No matching records.");
        return Ok(());
    }

    println!("{} match(es)", result.matches.len());
    println!(
        "{}",
        ["wholesaler", "file_name", "product_name", "color", "size", "quantity"].join("\t")
    );
    println!("{}", "-".repeat(72));
    for m in &result.matches {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            m.provenance.wholesaler.as_deref().unwrap_or("-"),
            m.provenance.file_name.as_deref().unwrap_or("-"),
            m.record.product_name,
            m.record.color,
            m.size,
            m.quantity
        );
    }
    println!("{}", "-".repeat(72));
    println!("Total: {}", result.total);

    Ok(())
}

/// Build a search query from positional arguments.
///
/// Blank arguments match everything. Returns `None` for a size outside the
/// size vocabulary, since no record can carry it.
fn build_query(
    name: Option<String>,
    color: Option<String>,
    size: Option<String>,
) -> Option<SearchQuery> {
    let size = match size.filter(|s| !s.trim().is_empty()) {
        Some(label) => match label.parse::<Size>() {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::warn!("{}", e);
                return None;
            }
        },
        None => None,
    };
    Some(SearchQuery {
        name: name.filter(|s| !s.trim().is_empty()),
        color: color.filter(|s| !s.trim().is_empty()),
        size,
    })
}

fn cmd_summary(data: &Path, list_records: bool) -> packlist_core::Result<()> {
    let stores = load_json(data)?;
    let summaries =
        packlist_core::aggregate_by_name(stores.iter().flat_map(|s| s.records().iter()));

    let records: usize = stores.iter().map(RecordStore::len).sum();
    let total = summaries
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.total));
    println!("Records: {}", records);
    println!("Total quantity: {}", total);

    if list_records {
        println!();
        println!("{}", ["no", "product_name", "color", "quantities", "subtotal"].join("\t"));
        println!("{}", "-".repeat(72));
        let all = stores.iter().flat_map(|s| s.records().iter());
        for (no, record) in all.enumerate() {
            println!(
                "{}\t{}\t{}\t{}\t{}",
                no + 1,
                record.product_name,
                record.color,
                format_quantities(&record.quantities),
                record.total_quantity()
            );
        }
        println!("{}", "-".repeat(72));
    }

    for summary in &summaries {
        println!();
        println!("{}", summary.product_name);
        for color in &summary.colors {
            println!("  {}: {}", color.color, color.quantity);
        }
        println!("  subtotal: {}", summary.total);
    }

    Ok(())
}

/// Render quantities as `size:qty` pairs in header order
fn format_quantities(quantities: &Quantities) -> String {
    quantities
        .iter()
        .map(|(size, qty)| format!("{}:{}", size, qty))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_export_csv(data: &Path, output: &Path) -> packlist_core::Result<()> {
    let stores = load_json(data)?;
    let rows = write_csv(&stores, output)?;
    println!("Exported {} rows to {}", rows, output.display());
    Ok(())
}

fn cmd_create_config(output: &Path, fixed: bool) -> packlist_core::Result<()> {
    let mut config = ExtractConfig::default();
    if fixed {
        config.fields = FieldColumnLocator::fixed_default();
    }
    config.save(output)?;

    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the scan windows if needed, then run:");
    println!("  packlist extract --input <path> --config {}", output.display());

    Ok(())
}
