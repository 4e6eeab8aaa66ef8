//! Named-range synchronization: exactly one metadata read and one atomic
//! batch write per invocation.

use sheetforge_common::{normalize_range_text, parse_range, split_sheet_and_range};
use tracing::debug;

use crate::error::{ErrorKind, RemoteError};
use crate::ledger::DebugLedger;
use crate::traits::{AddedNamedRange, Request, SpreadsheetReader, SpreadsheetWriter};

/// How the synchronizer converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No range of that name existed; one was added.
    Created,
    /// An existing range was deleted and recreated in the same batch.
    Replaced,
}

/// Reconcile the named range `range_name` with the rectangle described by
/// `range_text` (sheet-local A1, optionally prefixed `Sheet!`). The sheet
/// prefix, when present, overrides `sheet_title`. Deleting before adding
/// within one batch keeps the operation idempotent.
pub fn sync_named_range(
    reader: &dyn SpreadsheetReader,
    writer: &dyn SpreadsheetWriter,
    spreadsheet_id: &str,
    sheet_title: &str,
    range_name: &str,
    range_text: &str,
) -> Result<SyncOutcome, RemoteError> {
    let mut ledger = DebugLedger::new();

    let normalized = normalize_range_text(range_text);
    let (range_sheet, local_range) = split_sheet_and_range(&normalized);
    let title = range_sheet.as_deref().unwrap_or(sheet_title);

    ledger.record("stage", "readMetadata");
    let metadata = match reader.read_metadata(spreadsheet_id) {
        Ok(metadata) => metadata,
        Err(err) => {
            return Err(RemoteError::new(
                ErrorKind::Service(err.to_string()),
                ledger,
            ));
        }
    };

    let sheet = match metadata.sheet_by_title(title) {
        Some(sheet) => sheet,
        None => {
            let titles = metadata.sheet_titles().join(", ");
            ledger.record("availableSheets", titles.as_str());
            return Err(RemoteError::new(
                ErrorKind::NotFound(format!("sheet '{title}' (available: {titles})")),
                ledger,
            ));
        }
    };
    ledger.record("sheetId", sheet.sheet_id.to_string());

    let range = match parse_range(&local_range, sheet.sheet_id) {
        Ok(range) => range,
        Err(err) => {
            return Err(RemoteError::new(
                ErrorKind::Validation(err.to_string()),
                ledger,
            ));
        }
    };

    let existing = metadata.named_range(range_name);
    let mut requests = Vec::with_capacity(2);
    if let Some(existing) = existing {
        ledger.record("replacedNamedRangeId", existing.named_range_id.clone());
        requests.push(Request::DeleteNamedRange {
            named_range_id: existing.named_range_id.clone(),
        });
    }
    requests.push(Request::AddNamedRange {
        named_range: AddedNamedRange {
            name: range_name.to_string(),
            range,
        },
    });

    ledger.record("stage", "batchUpdate");
    debug!(name = %range_name, requests = requests.len(), "submitting named-range batch");
    let outcome = if existing.is_some() {
        SyncOutcome::Replaced
    } else {
        SyncOutcome::Created
    };
    if let Err(err) = writer.batch_update(spreadsheet_id, requests) {
        return Err(RemoteError::new(
            ErrorKind::Service(err.to_string()),
            ledger,
        ));
    }
    Ok(outcome)
}
