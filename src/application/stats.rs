use crate::domain::{
    error::IngestionError,
    models::{AggregateStats, Sheet, SheetDetail, SheetStats},
};

/// Per-sheet statistics. Pure: a `Sheet` that reached this stage is always
/// well-formed, so there is no failure path.
pub fn compute_stats(sheet: &Sheet) -> SheetStats {
    SheetStats {
        row_count: sheet.rows.len(),
        column_count: sheet.headers.len(),
        column_names: sheet.headers.clone(),
        first_row: sheet.rows.first().cloned(),
        last_row: sheet.rows.last().cloned(),
    }
}

/// Cross-sheet reduction: rows sum over every sheet, column shape and first
/// row come from the first sheet, last row from the last sheet. Fails with
/// `EmptyWorkbook` when every sheet was empty and dropped at decode time.
pub fn reduce(sheets: &[SheetDetail]) -> Result<AggregateStats, IngestionError> {
    let first = sheets.first().ok_or(IngestionError::EmptyWorkbook)?;
    let last = sheets.last().ok_or(IngestionError::EmptyWorkbook)?;

    Ok(AggregateStats {
        row_count: sheets.iter().map(|s| s.stats.row_count).sum(),
        column_count: first.stats.column_count,
        column_names: first.stats.column_names.clone(),
        first_row: first.stats.first_row.clone(),
        last_row: last.stats.last_row.clone(),
        sheet_count: sheets.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Cell;

    fn sheet(name: &str, headers: &[&str], rows: Vec<Vec<Cell>>) -> SheetDetail {
        let sheet = Sheet {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        };
        let stats = compute_stats(&sheet);
        SheetDetail {
            name: sheet.name,
            headers: sheet.headers,
            rows: sheet.rows,
            stats,
        }
    }

    fn row(values: &[i64]) -> Vec<Cell> {
        values.iter().map(|v| Cell::Number(*v as f64)).collect()
    }

    #[test]
    fn stats_for_populated_sheet() {
        let detail = sheet("logs", &["a", "b"], vec![row(&[1, 2]), row(&[3, 4])]);
        assert_eq!(detail.stats.row_count, 2);
        assert_eq!(detail.stats.column_count, 2);
        assert_eq!(detail.stats.column_names, vec!["a", "b"]);
        assert_eq!(detail.stats.first_row, Some(row(&[1, 2])));
        assert_eq!(detail.stats.last_row, Some(row(&[3, 4])));
    }

    #[test]
    fn stats_for_header_only_sheet() {
        let detail = sheet("logs", &["a", "b"], vec![]);
        assert_eq!(detail.stats.row_count, 0);
        assert_eq!(detail.stats.first_row, None);
        assert_eq!(detail.stats.last_row, None);
    }

    #[test]
    fn rows_sum_but_column_shape_comes_from_first_sheet() {
        let sheets = vec![
            sheet(
                "first",
                &["a", "b"],
                vec![row(&[1, 2]), row(&[3, 4]), row(&[5, 6])],
            ),
            sheet(
                "second",
                &["x", "y", "z"],
                vec![
                    row(&[7, 8, 9]),
                    row(&[10, 11, 12]),
                    row(&[13, 14, 15]),
                    row(&[16, 17, 18]),
                    row(&[19, 20, 21]),
                ],
            ),
        ];

        let aggregate = reduce(&sheets).unwrap();
        assert_eq!(aggregate.row_count, 8);
        assert_eq!(aggregate.sheet_count, 2);
        // Schema divergence is preserved, never merged.
        assert_eq!(aggregate.column_count, 2);
        assert_eq!(aggregate.column_names, vec!["a", "b"]);
        assert_eq!(aggregate.first_row, Some(row(&[1, 2])));
        assert_eq!(aggregate.last_row, Some(row(&[19, 20, 21])));
    }

    #[test]
    fn last_row_is_none_when_last_sheet_has_no_data() {
        let sheets = vec![
            sheet("first", &["a"], vec![row(&[1])]),
            sheet("trailer", &["b"], vec![]),
        ];

        let aggregate = reduce(&sheets).unwrap();
        assert_eq!(aggregate.row_count, 1);
        assert_eq!(aggregate.first_row, Some(row(&[1])));
        assert_eq!(aggregate.last_row, None);
    }

    #[test]
    fn empty_input_is_empty_workbook() {
        assert_eq!(reduce(&[]).unwrap_err(), IngestionError::EmptyWorkbook);
    }

    #[test]
    fn single_sheet_reduces_to_itself() {
        let sheets = vec![sheet("only", &["a", "b"], vec![row(&[1, 2]), row(&[3, 4])])];
        let aggregate = reduce(&sheets).unwrap();
        assert_eq!(aggregate.row_count, 2);
        assert_eq!(aggregate.sheet_count, 1);
        assert_eq!(aggregate.last_row, Some(row(&[3, 4])));
    }
}
