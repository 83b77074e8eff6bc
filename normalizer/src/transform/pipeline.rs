//! High-level normalization API.
//!
//! Combines every stage: parsing, header flattening, reshape, key splitting,
//! amount policies and atomic serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use sales_normalizer::normalize;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = normalize(
//!         Path::new("uploads/sales.csv"),
//!         Path::new("uploads/cleaned_sales.csv"),
//!     )?;
//!
//!     println!("Wrote {} records", report.stats.written_records);
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

use super::fields::split_records;
use super::filters::{apply_amount_policies, AmountPolicy};
use super::header::flatten_table;
use super::reshape::melt;
use crate::config::NormalizerConfig;
use crate::error::{FormatResult, NormalizeError, NormalizeResult};
use crate::models::{CleanedTable, RawTable};
use crate::parser::{parse_bytes_auto, read_raw_table};
use crate::writer::write_cleaned_table;

/// Counters describing what happened to the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeStats {
    /// Data rows read (orders)
    pub input_rows: usize,
    /// Value columns after placeholder removal
    pub value_columns: usize,
    /// Placeholder columns removed
    pub dropped_columns: Vec<String>,
    /// `Order ID` label rows skipped under the header
    pub skipped_label_rows: usize,
    /// Records produced by the reshape, always `input_rows * value_columns`
    pub reshaped_records: usize,
    pub dropped_non_numeric: usize,
    pub dropped_zero: usize,
    pub written_records: usize,
}

/// Result of a file-to-file normalization run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeReport {
    pub run_id: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub encoding: String,
    pub delimiter: char,
    #[serde(flatten)]
    pub stats: NormalizeStats,
    pub finished_at: DateTime<Utc>,
}

/// Reshape a parsed table into its cleaned long form.
///
/// Pure: no I/O and no logging.
pub fn normalize_table(raw: RawTable) -> (CleanedTable, NormalizeStats) {
    let input_rows = raw.row_count();
    let skipped_label_rows = raw.skipped_label_rows;

    let flattened = flatten_table(raw);
    let value_columns = flattened.value_columns().len();
    let melted = melt(&flattened);
    let reshaped_records = melted.len();

    let keyed = split_records(melted);
    let outcome = apply_amount_policies(keyed);

    let stats = NormalizeStats {
        input_rows,
        value_columns,
        dropped_columns: flattened.dropped_columns,
        skipped_label_rows,
        reshaped_records,
        dropped_non_numeric: outcome.dropped_non_numeric,
        dropped_zero: outcome.dropped_zero,
        written_records: outcome.records.len(),
    };

    (CleanedTable::new(outcome.records), stats)
}

/// Normalize CSV bytes in memory.
///
/// Same as [`normalize`] without touching the filesystem; useful for
/// callers holding an upload body.
pub fn normalize_bytes(bytes: &[u8]) -> FormatResult<(CleanedTable, NormalizeStats)> {
    let parsed = parse_bytes_auto(bytes)?;
    Ok(normalize_table(parsed.table))
}

/// Normalize the file at `input` and write the cleaned CSV to `output`.
///
/// This is the main entry point. The output is replaced atomically; on error
/// any previous file at `output` is left untouched.
pub fn normalize(input: &Path, output: &Path) -> NormalizeResult<NormalizeReport> {
    debug!(input = %input.display(), "reading sales export");
    let parsed = read_raw_table(input)?;

    debug!(
        encoding = %parsed.encoding,
        delimiter = %format_delimiter(parsed.delimiter),
        orders = parsed.table.row_count(),
        columns = parsed.table.width(),
        "parsed two-row header"
    );

    let encoding = parsed.encoding;
    let delimiter = parsed.delimiter;

    let (table, stats) = normalize_table(parsed.table);
    trace_stats(&stats);
    if table.is_empty() {
        debug!("no records left after amount policies");
    }

    write_cleaned_table(&table, output)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        records = table.len(),
        "normalized sales export"
    );

    Ok(NormalizeReport {
        run_id: Uuid::new_v4().to_string(),
        input_path: input.to_path_buf(),
        output_path: output.to_path_buf(),
        encoding,
        delimiter,
        stats,
        finished_at: Utc::now(),
    })
}

/// Normalize `input` into the configured output directory.
///
/// The output path is `<output_dir>/<prefix><input file name>`; the
/// directory is created if needed.
pub fn normalize_into(input: &Path, config: &NormalizerConfig) -> NormalizeResult<NormalizeReport> {
    config
        .ensure_output_dir()
        .map_err(|e| NormalizeError::io(&config.output_dir, e))?;
    let output = config.output_path_for(input);
    normalize(input, &output)
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

fn trace_stats(stats: &NormalizeStats) {
    if !stats.dropped_columns.is_empty() {
        debug!(columns = ?stats.dropped_columns, "dropped placeholder columns");
    }
    if stats.skipped_label_rows > 0 {
        debug!(rows = stats.skipped_label_rows, "skipped label rows");
    }
    debug!(
        orders = stats.input_rows,
        value_columns = stats.value_columns,
        records = stats.reshaped_records,
        "reshaped to long format"
    );
    if stats.dropped_non_numeric > 0 {
        info!(
            count = stats.dropped_non_numeric,
            policy = ?AmountPolicy::NonNumericAmount,
            "excluded: {}",
            AmountPolicy::NonNumericAmount.description()
        );
    }
    if stats.dropped_zero > 0 {
        info!(
            count = stats.dropped_zero,
            policy = ?AmountPolicy::ZeroAmount,
            "excluded: {}",
            AmountPolicy::ZeroAmount.description()
        );
    }
}
