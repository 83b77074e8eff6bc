//! Output serialization.
//!
//! The cleaned table is written to a temporary file next to the destination
//! and renamed into place only once every row has been flushed, so a failed
//! run never leaves a truncated file at the output path. A new output gets
//! the usual umask-derived mode; a replaced output keeps its previous mode.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use crate::error::{NormalizeError, NormalizeResult};
use crate::models::{CleanedTable, OUTPUT_COLUMNS};

/// Write the header row and every record as CSV to `writer`.
///
/// The header is always present, even for an empty table.
pub fn write_records<W: Write>(table: &CleanedTable, writer: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(OUTPUT_COLUMNS)?;
    for record in table {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the table as a CSV string.
pub fn to_csv_string(table: &CleanedTable) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_records(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Atomically write `table` to `output`, replacing any existing file.
pub fn write_cleaned_table(table: &CleanedTable, output: &Path) -> NormalizeResult<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let tmp = temp_sibling(dir).map_err(|e| NormalizeError::io(output, e))?;
    if let Ok(existing) = fs::metadata(output) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| NormalizeError::io(output, e))?;
    }

    write_records(table, tmp.as_file()).map_err(|e| NormalizeError::from_csv_write(output, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| NormalizeError::io(output, e))?;

    tmp.persist(output)
        .map_err(|e| NormalizeError::io(output, e.error))?;

    Ok(())
}

/// Temporary file in `dir`, opened with the same mode request as
/// `File::create` so the process umask decides the final bits.
fn temp_sibling(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(".normalize").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LongRecord;
    use tempfile::tempdir;

    fn record(order_id: &str, ship_mode: &str, amount: f64) -> LongRecord {
        LongRecord {
            order_id: order_id.into(),
            segment: "Consumer".into(),
            ship_mode: ship_mode.into(),
            amount,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let table = CleanedTable::new(vec![
            record("CA-1", "First Class", 120.5),
            record("CA-1", "Total", 100.0),
        ]);
        let csv = to_csv_string(&table).unwrap();
        assert_eq!(
            csv,
            "Order_ID,Segment,Ship_Mode,Amount\n\
             CA-1,Consumer,First Class,120.5\n\
             CA-1,Consumer,Total,100.0\n"
        );
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let csv = to_csv_string(&CleanedTable::default()).unwrap();
        assert_eq!(csv, "Order_ID,Segment,Ship_Mode,Amount\n");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut r = record("CA-9", "Total", 1.0);
        r.segment = "Home, Office".into();
        let csv = to_csv_string(&CleanedTable::new(vec![r])).unwrap();
        assert!(csv.contains("\"Home, Office\""));
    }

    #[test]
    fn test_atomic_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("cleaned.csv");
        std::fs::write(&output, "stale contents").unwrap();

        let table = CleanedTable::new(vec![record("CA-1", "Total", 2.0)]);
        write_cleaned_table(&table, &output).unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.starts_with("Order_ID,Segment,Ship_Mode,Amount\n"));
        assert!(!written.contains("stale"));

        // only the output remains, no temporary siblings
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_unwritable_destination_is_io_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("missing-dir").join("cleaned.csv");
        let err = write_cleaned_table(&CleanedTable::default(), &output).unwrap_err();
        assert!(err.is_io());
        assert!(!output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_mode_matches_a_plain_create() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let reference = dir.path().join("reference.csv");
        std::fs::File::create(&reference).unwrap();
        let output = dir.path().join("cleaned.csv");

        write_cleaned_table(&CleanedTable::default(), &output).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&output), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_replaced_output_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let output = dir.path().join("cleaned.csv");
        std::fs::write(&output, "old").unwrap();
        std::fs::set_permissions(&output, std::fs::Permissions::from_mode(0o640)).unwrap();

        let table = CleanedTable::new(vec![record("CA-1", "Total", 2.0)]);
        write_cleaned_table(&table, &output).unwrap();

        let mode = std::fs::metadata(&output).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert!(std::fs::read_to_string(&output).unwrap().contains("CA-1"));
    }
}
