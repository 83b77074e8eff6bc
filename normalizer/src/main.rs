//! Sales Normalizer CLI - reshape wide sales exports into long CSV
//!
//! ```bash
//! sales-normalizer normalize export.csv                 # → uploads/cleaned_export.csv
//! sales-normalizer normalize export.csv -o long.csv     # explicit output
//! sales-normalizer preview export.csv -n 5              # sample as JSON, nothing written
//! sales-normalizer inspect export.csv                   # show detected header layout
//! ```

use clap::{Parser, Subcommand};
use sales_normalizer::transform::{column_keys, format_delimiter};
use sales_normalizer::{
    normalize, normalize_into, normalize_table, read_raw_table, NormalizeReport, NormalizerConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "sales-normalizer")]
#[command(about = "Reshape wide two-row-header sales exports into long-format CSV", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a CSV export and write the cleaned file
    Normalize {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: <NORMALIZER_OUTPUT_DIR>/cleaned_<input name>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the run report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Normalize in memory and print the first records as JSON
    Preview {
        /// Input CSV file
        input: PathBuf,

        /// Number of records to show
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,
    },

    /// Show the detected encoding, separator and column layout
    Inspect {
        /// Input CSV file
        input: PathBuf,
    },
}

fn main() {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sales_normalizer=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = NormalizerConfig::from_env();

    let result = match cli.command {
        Commands::Normalize {
            input,
            output,
            report,
        } => cmd_normalize(&config, &input, output.as_deref(), report.as_deref()),

        Commands::Preview { input, rows } => cmd_preview(&config, &input, rows),

        Commands::Inspect { input } => cmd_inspect(&config, &input),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn check_extension(config: &NormalizerConfig, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !config.is_allowed_file(&name) {
        return Err(format!(
            "Only {} files allowed: {}",
            config.allowed_extensions.join(", "),
            input.display()
        )
        .into());
    }
    Ok(())
}

fn cmd_normalize(
    config: &NormalizerConfig,
    input: &Path,
    output: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    check_extension(config, input)?;
    eprintln!("📄 Processing: {}", input.display());

    let report = match output {
        Some(path) => normalize(input, path)?,
        None => normalize_into(input, config)?,
    };

    print_summary(&report);

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)?;
        eprintln!("   💾 Report saved to: {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn print_summary(report: &NormalizeReport) {
    let stats = &report.stats;
    eprintln!("\n{}", "=".repeat(60));
    eprintln!("📊 SUMMARY");
    eprintln!("{}", "=".repeat(60));
    eprintln!("   Orders:            {}", stats.input_rows);
    eprintln!("   Value columns:     {}", stats.value_columns);
    eprintln!("   Long records:      {}", stats.reshaped_records);
    eprintln!("   Non-numeric:       {}", stats.dropped_non_numeric);
    eprintln!("   Zero amount:       {}", stats.dropped_zero);
    eprintln!("   Written:           {}", stats.written_records);
    eprintln!("   Output:            {}", report.output_path.display());
    eprintln!("{}", "=".repeat(60));
}

fn cmd_preview(
    config: &NormalizerConfig,
    input: &Path,
    rows: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    check_extension(config, input)?;

    let parsed = read_raw_table(input)?;
    let (table, stats) = normalize_table(parsed.table);

    eprintln!("Total rows processed: {}", stats.written_records);
    if table.is_empty() {
        eprintln!("No records left after filtering");
        return Ok(());
    }
    eprintln!("Sample of cleaned data:");
    println!("{}", serde_json::to_string_pretty(table.head(rows))?);
    Ok(())
}

fn cmd_inspect(config: &NormalizerConfig, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    check_extension(config, input)?;
    eprintln!("📄 Inspecting: {}", input.display());

    let parsed = read_raw_table(input)?;
    let table = &parsed.table;

    println!("Encoding:  {}", parsed.encoding);
    println!("Separator: '{}'", format_delimiter(parsed.delimiter));
    println!("Orders:    {}", table.row_count());
    if table.skipped_label_rows > 0 {
        println!("Label rows skipped: {}", table.skipped_label_rows);
    }
    println!("\nColumns ({}):", table.width());
    let keys = column_keys(&table.headers);
    for (i, (header, key)) in table.headers.iter().zip(keys).enumerate() {
        let key = key.unwrap_or_else(|| "(dropped: placeholder)".to_string());
        println!(
            "  [{:2}] {:<20} | {:<20} → {}",
            i + 1,
            header.segment,
            header.ship_mode,
            key
        );
    }
    Ok(())
}
