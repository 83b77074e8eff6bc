//! Two-row-header CSV reader with encoding and delimiter auto-detection.
//!
//! Produces a [`RawTable`]: the first header row holds customer segments,
//! the second holds ship modes, and every following non-blank row is an order.

use std::path::Path;

use crate::error::{FormatResult, InputFormatError, NormalizeError, NormalizeResult};
use crate::models::{CompositeHeader, RawTable};

/// Token marking the identifier column's label in exported headers.
pub const ORDER_ID_TOKEN: &str = "Order ID";

/// A parsed input file with the decoding settings that were used.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub table: RawTable,
    /// Detected encoding
    pub encoding: String,
    /// Detected delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to a string using the given encoding.
///
/// Unknown encodings fall back to lossy UTF-8. A leading byte order mark is
/// removed.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    let decoded = match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };

    match decoded.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => decoded,
    }
}

/// Detect the delimiter by counting occurrences in the first line.
///
/// Ties and lines without any candidate resolve to `,`.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse CSV text with an explicit delimiter into a [`RawTable`].
///
/// Blank lines are ignored. Data rows shorter than the header are padded with
/// empty cells; wider rows are rejected.
pub fn parse_raw_table(content: &str, delimiter: char) -> FormatResult<RawTable> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| InputFormatError::new(0, format!("Unsupported delimiter '{}'", delimiter)))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let segments = match records.next() {
        Some(row) => row.map_err(csv_format_error)?,
        None => return Err(InputFormatError::new(0, "Input is empty")),
    };
    let ship_modes = match records.next() {
        Some(row) => row.map_err(csv_format_error)?,
        None => {
            return Err(InputFormatError::new(
                2,
                "Missing second header row (ship modes)",
            ))
        }
    };

    if segments.len() != ship_modes.len() {
        return Err(InputFormatError::new(
            line_of(&ship_modes, 2),
            format!(
                "Header rows differ in width: {} segments, {} ship modes",
                segments.len(),
                ship_modes.len()
            ),
        ));
    }

    let headers: Vec<CompositeHeader> = segments
        .iter()
        .zip(ship_modes.iter())
        .map(|(segment, ship_mode)| CompositeHeader::new(segment, ship_mode))
        .collect();
    let width = headers.len();

    let mut table = RawTable {
        headers,
        rows: Vec::new(),
        skipped_label_rows: 0,
    };

    for row in records {
        let row = row.map_err(csv_format_error)?;

        if row.len() > width {
            return Err(InputFormatError::new(
                line_of(&row, 0),
                format!("Row has {} fields, header has {}", row.len(), width),
            )
            .with_column(width + 1));
        }

        if table.rows.is_empty() && is_label_row(&row) {
            table.skipped_label_rows += 1;
            continue;
        }

        let mut cells: Vec<String> = row.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        table.rows.push(cells);
    }

    Ok(table)
}

/// Parse CSV bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> FormatResult<ParsedInput> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let table = parse_raw_table(&content, delimiter)?;

    Ok(ParsedInput {
        table,
        encoding,
        delimiter,
    })
}

/// Read and parse a file with auto-detection.
///
/// # Example
/// ```ignore
/// let input = read_raw_table("uploads/sales.csv")?;
/// println!("{} orders, {} columns", input.table.row_count(), input.table.width());
/// ```
pub fn read_raw_table<P: AsRef<Path>>(path: P) -> NormalizeResult<ParsedInput> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| NormalizeError::io(path, e))?;
    Ok(parse_bytes_auto(&bytes)?)
}

/// A row directly under the header naming the identifier column, with every
/// other cell blank.
fn is_label_row(row: &csv::StringRecord) -> bool {
    let mut cells = row.iter();
    let first_is_label = cells
        .next()
        .is_some_and(|cell| cell.contains(ORDER_ID_TOKEN));
    first_is_label && cells.all(|cell| cell.trim().is_empty())
}

fn line_of(row: &csv::StringRecord, fallback: usize) -> usize {
    row.position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback)
}

fn csv_format_error(err: csv::Error) -> InputFormatError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(0);
    InputFormatError::new(line, format!("Invalid CSV: {}", err))
}
