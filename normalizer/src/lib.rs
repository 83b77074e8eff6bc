//! # Sales Normalizer - wide sales exports to long-format tables
//!
//! Sales exports arrive as a wide table with a two-row header (customer
//! segment over ship mode) and one column per combination. This crate turns
//! them into one row per order, segment and ship mode.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Wide CSV   │────▶│   Parser    │────▶│  Transform  │────▶│  Long CSV   │
//! │ (2 headers) │     │  (auto-enc) │     │ (melt+clean)│     │  (atomic)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sales_normalizer::normalize;
//! use std::path::Path;
//!
//! let report = normalize(Path::new("sales.csv"), Path::new("cleaned_sales.csv")).unwrap();
//! println!("Wrote {} records", report.stats.written_records);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Table and record shapes
//! - [`parser`] - Two-row-header CSV parsing with auto-detection
//! - [`transform`] - Header flattening, reshape, field split, amount policies
//! - [`writer`] - Atomic CSV output
//! - [`config`] - Output location and upload rules for callers
//!
//! Progress is reported through `tracing` events; nothing is printed unless
//! the host installs a subscriber.

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod writer;

// Ambient
pub mod config;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{FormatResult, InputFormatError, NormalizeError, NormalizeResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    CleanedTable,
    CompositeHeader,
    FlattenedTable,
    LongRecord,
    MeltedRecord,
    RawTable,
    ORDER_ID_COLUMN,
    OUTPUT_COLUMNS,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content,
    detect_delimiter,
    detect_encoding,
    parse_bytes_auto,
    parse_raw_table,
    read_raw_table,
    ParsedInput,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    normalize,
    normalize_bytes,
    normalize_into,
    normalize_table,
    NormalizeReport,
    NormalizeStats,
};

pub use transform::AmountPolicy;

// =============================================================================
// Re-exports - Output, Config
// =============================================================================

pub use writer::{to_csv_string, write_cleaned_table};

pub use config::NormalizerConfig;
