//! Wide to long reshape.

use crate::models::{FlattenedTable, MeltedRecord};

/// Emit one [`MeltedRecord`] per (value column, row) pair.
///
/// Records are column-major: every row of the first value column, then every
/// row of the second, and so on. A table with N rows and M value columns
/// always yields exactly N×M records.
pub fn melt(table: &FlattenedTable) -> Vec<MeltedRecord> {
    let value_columns = table.value_columns();
    let mut records = Vec::with_capacity(value_columns.len() * table.row_count());

    for (offset, key) in value_columns.iter().enumerate() {
        let col = offset + 1;
        for row in &table.rows {
            records.push(MeltedRecord {
                order_id: row.first().cloned().unwrap_or_default(),
                key: key.clone(),
                value: row.get(col).cloned().unwrap_or_default(),
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> FlattenedTable {
        FlattenedTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            dropped_columns: vec![],
        }
    }

    #[test]
    fn test_melt_shape_is_rows_times_columns() {
        let t = table(
            &["Order_ID", "Consumer_First Class", "Consumer_Total", "Corporate_Total"],
            &[&["CA-1", "1", "2", "3"], &["CA-2", "4", "5", "6"]],
        );
        assert_eq!(melt(&t).len(), 2 * 3);
    }

    #[test]
    fn test_melt_is_column_major() {
        let t = table(
            &["Order_ID", "A_x", "B_y"],
            &[&["CA-1", "1", "2"], &["CA-2", "3", "4"]],
        );
        let melted = melt(&t);
        let triples: Vec<(&str, &str, &str)> = melted
            .iter()
            .map(|r| (r.order_id.as_str(), r.key.as_str(), r.value.as_str()))
            .collect();
        assert_eq!(
            triples,
            vec![
                ("CA-1", "A_x", "1"),
                ("CA-2", "A_x", "3"),
                ("CA-1", "B_y", "2"),
                ("CA-2", "B_y", "4"),
            ]
        );
    }

    #[test]
    fn test_melt_identifier_only_table() {
        let t = table(&["Order_ID"], &[&["CA-1"], &["CA-2"]]);
        assert!(melt(&t).is_empty());
    }

    #[test]
    fn test_melt_no_rows() {
        let t = table(&["Order_ID", "Consumer_Total"], &[]);
        assert!(melt(&t).is_empty());
    }
}
