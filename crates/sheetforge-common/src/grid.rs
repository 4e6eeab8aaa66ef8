//! Structured rectangular ranges bound to a numeric sheet id.

use serde::{Deserialize, Serialize};

/// Half-open rectangular cell range inside one sheet.
///
/// End indices are exclusive (`end = last + 1`); a `None` end means the range
/// is unbounded on that axis (whole column or whole row). The serialized form
/// is the camelCase wire shape consumed by the spreadsheet mutation batch,
/// with unbounded ends omitted entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_row_index: Option<u32>,
    pub start_column_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column_index: Option<u32>,
}

impl GridRange {
    /// Bounded rectangle from inclusive zero-based corner indices.
    pub fn bounded(
        sheet_id: i64,
        start_row: u32,
        last_row: u32,
        start_col: u32,
        last_col: u32,
    ) -> Self {
        GridRange {
            sheet_id,
            start_row_index: start_row,
            end_row_index: Some(last_row + 1),
            start_column_index: start_col,
            end_column_index: Some(last_col + 1),
        }
    }

    /// Number of rows covered, when the row axis is bounded.
    pub fn row_count(&self) -> Option<u32> {
        self.end_row_index.map(|end| end - self.start_row_index)
    }

    /// Number of columns covered, when the column axis is bounded.
    pub fn column_count(&self) -> Option<u32> {
        self.end_column_index
            .map(|end| end - self.start_column_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_is_half_open() {
        let range = GridRange::bounded(3, 0, 9, 0, 2);
        assert_eq!(range.end_row_index, Some(10));
        assert_eq!(range.end_column_index, Some(3));
        assert_eq!(range.row_count(), Some(10));
        assert_eq!(range.column_count(), Some(3));
    }

    #[test]
    fn unbounded_ends_are_omitted_from_wire_shape() {
        let range = GridRange {
            sheet_id: 7,
            start_row_index: 0,
            end_row_index: None,
            start_column_index: 4,
            end_column_index: Some(5),
        };
        let json = serde_json::to_value(&range).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sheetId": 7,
                "startRowIndex": 0,
                "startColumnIndex": 4,
                "endColumnIndex": 5,
            })
        );
    }
}
