//! Header cleanup: placeholder column removal, composite key flattening and
//! identifier renaming.

use crate::models::{CompositeHeader, FlattenedTable, RawTable, ORDER_ID_COLUMN};
use crate::parser::ORDER_ID_TOKEN;

/// Separator between segment and ship mode in a flattened key.
pub const KEY_SEPARATOR: &str = "_";

/// Join the non-blank levels of a composite header with `_` and trim the
/// result.
///
/// A column with a blank ship-mode cell flattens to the bare segment name.
pub fn flatten_header(header: &CompositeHeader) -> String {
    [header.segment.as_str(), header.ship_mode.as_str()]
        .into_iter()
        .filter(|label| !label.trim().is_empty())
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR)
        .trim()
        .to_string()
}

/// Indices of value columns whose header mentions `Order ID`.
///
/// The leading identifier column is never reported.
pub fn placeholder_columns(headers: &[CompositeHeader]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, header)| header.contains(ORDER_ID_TOKEN))
        .map(|(idx, _)| idx)
        .collect()
}

/// The output key of every column, `None` for placeholder columns that
/// cleanup removes.
pub fn column_keys(headers: &[CompositeHeader]) -> Vec<Option<String>> {
    let dropped = placeholder_columns(headers);
    headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            if idx == 0 {
                Some(ORDER_ID_COLUMN.to_string())
            } else if dropped.contains(&idx) {
                None
            } else {
                Some(flatten_header(header))
            }
        })
        .collect()
}

/// Turn a [`RawTable`] into a [`FlattenedTable`].
///
/// Placeholder columns are dropped best-effort (finding none is fine), the
/// remaining headers are flattened and the first column becomes `Order_ID`.
pub fn flatten_table(raw: RawTable) -> FlattenedTable {
    let keys = column_keys(&raw.headers);

    let dropped_columns = keys
        .iter()
        .zip(&raw.headers)
        .filter(|(key, _)| key.is_none())
        .map(|(_, header)| flatten_header(header))
        .collect();

    let rows = raw
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&keys)
                .filter(|(_, key)| key.is_some())
                .map(|(cell, _)| cell)
                .collect()
        })
        .collect();

    FlattenedTable {
        columns: keys.into_iter().flatten().collect(),
        rows,
        dropped_columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[(&str, &str)], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers
                .iter()
                .map(|(s, m)| CompositeHeader::new(*s, *m))
                .collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
            skipped_label_rows: 0,
        }
    }

    #[test]
    fn test_flatten_header_joins_levels() {
        assert_eq!(
            flatten_header(&CompositeHeader::new("Consumer", "First Class")),
            "Consumer_First Class"
        );
        assert_eq!(
            flatten_header(&CompositeHeader::new("Consumer", "Total")),
            "Consumer_Total"
        );
    }

    #[test]
    fn test_flatten_header_trims_outer_whitespace_only() {
        assert_eq!(
            flatten_header(&CompositeHeader::new(" Home Office", "Same Day ")),
            "Home Office_Same Day"
        );
    }

    #[test]
    fn test_flatten_header_blank_ship_mode() {
        assert_eq!(flatten_header(&CompositeHeader::new("Corporate", "  ")), "Corporate");
        assert_eq!(flatten_header(&CompositeHeader::new("", "")), "");
    }

    #[test]
    fn test_first_column_renamed() {
        let table = flatten_table(raw(
            &[("", ""), ("Consumer", "First Class")],
            &[&["CA-1", "10"]],
        ));
        assert_eq!(table.columns, vec!["Order_ID", "Consumer_First Class"]);
        assert_eq!(table.rows, vec![vec!["CA-1".to_string(), "10".to_string()]]);
    }

    #[test]
    fn test_placeholder_columns_dropped() {
        let table = flatten_table(raw(
            &[("", ""), ("Consumer", "Total"), ("Order ID", ""), ("Corporate", "Total")],
            &[&["CA-1", "1", "", "2"]],
        ));
        assert_eq!(table.columns, vec!["Order_ID", "Consumer_Total", "Corporate_Total"]);
        assert_eq!(table.rows[0], vec!["CA-1", "1", "2"]);
        assert_eq!(table.dropped_columns, vec!["Order ID"]);
    }

    #[test]
    fn test_identifier_column_never_dropped() {
        let table = flatten_table(raw(
            &[("Order ID", "Order ID"), ("Consumer", "Total")],
            &[&["CA-1", "3"]],
        ));
        assert_eq!(table.columns, vec!["Order_ID", "Consumer_Total"]);
        assert!(table.dropped_columns.is_empty());
    }

    #[test]
    fn test_no_placeholder_is_not_an_error() {
        let headers = vec![CompositeHeader::new("", ""), CompositeHeader::new("Consumer", "Total")];
        assert!(placeholder_columns(&headers).is_empty());
    }

    #[test]
    fn test_column_keys_mark_placeholders() {
        let headers = vec![
            CompositeHeader::new("", ""),
            CompositeHeader::new("Consumer", "Total"),
            CompositeHeader::new("Order ID", ""),
            CompositeHeader::new("Corporate", ""),
        ];
        assert_eq!(
            column_keys(&headers),
            vec![
                Some("Order_ID".to_string()),
                Some("Consumer_Total".to_string()),
                None,
                Some("Corporate".to_string()),
            ]
        );

        let table = flatten_table(RawTable {
            headers,
            rows: vec![],
            skipped_label_rows: 0,
        });
        assert_eq!(table.columns, vec!["Order_ID", "Consumer_Total", "Corporate"]);
    }
}
