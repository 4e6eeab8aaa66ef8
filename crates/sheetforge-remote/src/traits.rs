//! Boundary contracts for the remote sheet and translation services.
//!
//! Only the seam is specified here; concrete transports live with the
//! caller. All calls are blocking and may fail as a unit.

use serde::{Deserialize, Serialize};
use sheetforge_common::GridRange;

use crate::error::ServiceError;

/// One rectangular block of cell text, row-major.
pub type CellMatrix = Vec<Vec<String>>;

/// Read access to a remote spreadsheet.
pub trait SpreadsheetReader {
    /// Fetch the cell values of each requested A1 range, in request order.
    fn read_values(
        &self,
        spreadsheet_id: &str,
        ranges: &[String],
    ) -> Result<Vec<CellMatrix>, ServiceError>;

    /// Fetch spreadsheet-level metadata in one call.
    fn read_metadata(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata, ServiceError>;
}

/// Write access to a remote spreadsheet. The batch is atomic: either every
/// request applies or none does.
pub trait SpreadsheetWriter {
    fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<(), ServiceError>;
}

/// Batch text translation. The output is positionally aligned with the
/// input and has the same length.
pub trait Translator {
    fn translate(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ServiceError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetMetadata {
    #[serde(default)]
    pub sheets: Vec<SheetProperties>,
    #[serde(default)]
    pub named_ranges: Vec<NamedRange>,
}

impl SpreadsheetMetadata {
    /// Exact, case-sensitive title lookup.
    pub fn sheet_by_title(&self, title: &str) -> Option<&SheetProperties> {
        self.sheets.iter().find(|sheet| sheet.title == title)
    }

    pub fn named_range(&self, name: &str) -> Option<&NamedRange> {
        self.named_ranges.iter().find(|range| range.name == name)
    }

    pub fn sheet_titles(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.title.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRange {
    pub named_range_id: String,
    pub name: String,
    pub range: GridRange,
}

/// One mutation inside a batch update, serialized in the remote service's
/// externally tagged JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    #[serde(rename_all = "camelCase")]
    AddNamedRange { named_range: AddedNamedRange },
    #[serde(rename_all = "camelCase")]
    DeleteNamedRange { named_range_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedNamedRange {
    pub name: String,
    pub range: GridRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_serialize_to_the_batch_shape() {
        let add = Request::AddNamedRange {
            named_range: AddedNamedRange {
                name: "TODO_RANGE".to_string(),
                range: GridRange {
                    sheet_id: 7,
                    start_row_index: 1,
                    end_row_index: None,
                    start_column_index: 0,
                    end_column_index: Some(3),
                },
            },
        };
        let json = serde_json::to_value(&add).unwrap();
        assert_eq!(json["addNamedRange"]["namedRange"]["name"], "TODO_RANGE");
        assert_eq!(json["addNamedRange"]["namedRange"]["range"]["sheetId"], 7);
        assert_eq!(
            json["addNamedRange"]["namedRange"]["range"]["startRowIndex"],
            1
        );
        assert!(json["addNamedRange"]["namedRange"]["range"]
            .get("endRowIndex")
            .is_none());

        let delete = Request::DeleteNamedRange {
            named_range_id: "existing-id".to_string(),
        };
        let json = serde_json::to_value(&delete).unwrap();
        assert_eq!(json["deleteNamedRange"]["namedRangeId"], "existing-id");
    }

    #[test]
    fn metadata_lookups_are_exact() {
        let metadata = SpreadsheetMetadata {
            sheets: vec![
                SheetProperties { sheet_id: 0, title: "Tasks".to_string() },
                SheetProperties { sheet_id: 9, title: "tasks".to_string() },
            ],
            named_ranges: vec![],
        };
        assert_eq!(metadata.sheet_by_title("tasks").unwrap().sheet_id, 9);
        assert!(metadata.sheet_by_title("TASKS").is_none());
    }
}
