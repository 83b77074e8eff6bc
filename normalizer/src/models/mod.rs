//! Domain models for the sales normalization pipeline.
//!
//! Data flows through these shapes in order:
//!
//! - [`RawTable`] - two header rows (segment, ship mode) plus data rows
//! - [`FlattenedTable`] - single-string column keys, first column `Order_ID`
//! - [`MeltedRecord`] - one `(order, key, value)` triple per cell
//! - [`LongRecord`] / [`CleanedTable`] - the normalized output

use serde::Serialize;

/// Name given to the leading identifier column.
pub const ORDER_ID_COLUMN: &str = "Order_ID";

/// Output columns, in serialization order.
pub const OUTPUT_COLUMNS: [&str; 4] = ["Order_ID", "Segment", "Ship_Mode", "Amount"];

/// Ship mode used for segment-level subtotal columns.
pub const TOTAL_SHIP_MODE: &str = "Total";

// =============================================================================
// Raw Table
// =============================================================================

/// One column's two-level header: customer segment over ship mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositeHeader {
    pub segment: String,
    pub ship_mode: String,
}

impl CompositeHeader {
    pub fn new(segment: impl Into<String>, ship_mode: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            ship_mode: ship_mode.into(),
        }
    }

    /// True if either level mentions `token`.
    pub fn contains(&self, token: &str) -> bool {
        self.segment.contains(token) || self.ship_mode.contains(token)
    }
}

/// The input as parsed: composite headers and untyped cells.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty strings by the parser.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<CompositeHeader>,
    pub rows: Vec<Vec<String>>,
    /// Placeholder `Order ID` label rows skipped under the header.
    pub skipped_label_rows: usize,
}

impl RawTable {
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// =============================================================================
// Flattened Table
// =============================================================================

/// Table with one string key per column. `columns[0]` is always
/// [`ORDER_ID_COLUMN`].
#[derive(Debug, Clone, Default)]
pub struct FlattenedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Flattened names of placeholder columns removed during cleanup.
    pub dropped_columns: Vec<String>,
}

impl FlattenedTable {
    /// Every column except the identifier.
    pub fn value_columns(&self) -> &[String] {
        self.columns.get(1..).unwrap_or(&[])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// =============================================================================
// Long Format
// =============================================================================

/// One cell of the wide table, before key splitting and numeric filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeltedRecord {
    pub order_id: String,
    /// Flattened `<Segment>_<ShipMode>` column key.
    pub key: String,
    /// Raw cell text.
    pub value: String,
}

/// A normalized output row.
///
/// Invariant once inside a [`CleanedTable`]: `amount` is finite and non-zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    #[serde(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Segment")]
    pub segment: String,
    #[serde(rename = "Ship_Mode")]
    pub ship_mode: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

/// Ordered normalized records with the fixed column set [`OUTPUT_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CleanedTable {
    pub records: Vec<LongRecord>,
}

impl CleanedTable {
    pub fn new(records: Vec<LongRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` records, like a dataframe `head`.
    pub fn head(&self, n: usize) -> &[LongRecord] {
        &self.records[..n.min(self.records.len())]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LongRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a CleanedTable {
    type Item = &'a LongRecord;
    type IntoIter = std::slice::Iter<'a, LongRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
