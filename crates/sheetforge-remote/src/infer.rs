//! Schema inference from a live header row.
//!
//! The engine is a strictly sequential state machine; each stage either
//! produces input for the next or terminates with an error carrying the
//! ledger accumulated so far. Only the header fetch retries, and only once.

use sheetforge_common::{
    column_index_to_letter, format_sheet_name_for_range, normalize_range_text, parse_cell,
    split_sheet_and_range,
};
use sheetforge_spec::{FeatureSchema, FieldSchema, FieldType};
use tracing::{debug, warn};

use crate::dictionary::{exact_lookup, substring_lookup};
use crate::error::{ErrorKind, RemoteError};
use crate::ident::to_lower_camel;
use crate::ledger::DebugLedger;
use crate::traits::{SpreadsheetReader, Translator};

/// Caller input for one inference run.
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    pub spreadsheet_id: String,
    pub feature_name: String,
    pub sheet_name: String,
    /// Header anchor, `Sheet!A1` or bare `A1`.
    pub header_cell: String,
    /// Header texts the live row must match, in column order.
    pub expected_headers: Vec<String>,
    /// When set, headers are translated from this language before
    /// identifiers are derived.
    pub source_language: Option<String>,
    pub target_language: String,
    /// Extension entries consulted before the built-in dictionary.
    pub extra_dictionary: Vec<(String, String)>,
}

impl InferenceRequest {
    pub fn new(
        spreadsheet_id: impl Into<String>,
        feature_name: impl Into<String>,
        sheet_name: impl Into<String>,
        header_cell: impl Into<String>,
        expected_headers: Vec<String>,
    ) -> Self {
        InferenceRequest {
            spreadsheet_id: spreadsheet_id.into(),
            feature_name: feature_name.into(),
            sheet_name: sheet_name.into(),
            header_cell: header_cell.into(),
            expected_headers,
            source_language: None,
            target_language: "en".to_string(),
            extra_dictionary: Vec::new(),
        }
    }

    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    pub fn with_dictionary_entry(
        mut self,
        term: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        self.extra_dictionary.push((term.into(), translation.into()));
        self
    }
}

/// Successful inference: the schema plus everything learned on the way.
#[derive(Debug, Clone)]
pub struct InferredSchema {
    pub schema: FeatureSchema,
    pub ledger: DebugLedger,
}

/// Run the full inference state machine against the remote boundary.
pub fn infer_schema(
    reader: &dyn SpreadsheetReader,
    translator: Option<&dyn Translator>,
    request: &InferenceRequest,
) -> Result<InferredSchema, RemoteError> {
    let mut ledger = DebugLedger::new();

    if request.expected_headers.is_empty() {
        return Err(RemoteError::new(
            ErrorKind::Validation("expected headers must not be empty".to_string()),
            ledger,
        ));
    }

    // RESOLVE_SHEET
    debug!(sheet = %request.sheet_name, "resolving sheet title");
    ledger.record("stage", "resolveSheet");
    let resolved_sheet = match reader.read_metadata(&request.spreadsheet_id) {
        Ok(metadata) => match metadata.sheet_by_title(&request.sheet_name) {
            Some(sheet) => {
                ledger.record("sheetId", sheet.sheet_id.to_string());
                sheet.title.clone()
            }
            None => {
                let titles = metadata.sheet_titles().join(", ");
                ledger.record("availableSheets", titles.as_str());
                return Err(RemoteError::new(
                    ErrorKind::NotFound(format!(
                        "sheet '{}' (available: {titles})",
                        request.sheet_name
                    )),
                    ledger,
                ));
            }
        },
        Err(err) => {
            warn!(error = %err, "metadata read failed, using caller-supplied sheet name");
            ledger.record("metadataError", err.to_string());
            request.sheet_name.clone()
        }
    };

    // PARSE_HEADER_CELL
    ledger.record("stage", "parseHeaderCell");
    let normalized = normalize_range_text(&request.header_cell);
    let (cell_sheet, cell_text) = split_sheet_and_range(&normalized);
    let sheet = cell_sheet.unwrap_or(resolved_sheet);
    let (start_col, header_row) = match parse_cell(&cell_text) {
        Ok(parsed) => parsed,
        Err(err) => {
            return Err(RemoteError::new(
                ErrorKind::Validation(err.to_string()),
                ledger,
            ));
        }
    };
    ledger.record("headerCell", format!("{sheet}!{cell_text}"));

    // FETCH_HEADER_ROW
    ledger.record("stage", "fetchHeaderRow");
    let width = request.expected_headers.len() as u32;
    let first = column_index_to_letter(start_col);
    let last = column_index_to_letter(start_col + width - 1);
    let primary = format!(
        "{}!{first}{header_row}:{last}{header_row}",
        format_sheet_name_for_range(&sheet)
    );
    let alternate = format!("{sheet}!{first}{header_row}:{last}{header_row}");
    debug!(range = %primary, "fetching header row");
    let fetched = fetch_header_row(reader, request, &primary, &alternate, &mut ledger);

    // VALIDATE_MATCH
    ledger.record("stage", "validateMatch");
    ledger.record("fetchedHeaders", fetched.join("|"));
    let matched = fetched.len() >= request.expected_headers.len()
        && request
            .expected_headers
            .iter()
            .zip(&fetched)
            .all(|(expected, actual)| expected.trim() == actual.trim());
    if !matched {
        return Err(RemoteError::new(ErrorKind::HeaderMismatch, ledger));
    }

    // TRANSLATE
    let translated = match &request.source_language {
        Some(source) => {
            ledger.record("stage", "translate");
            translate_headers(translator, request, source, &mut ledger)
        }
        None => request.expected_headers.clone(),
    };

    // BUILD_FIELDS
    ledger.record("stage", "buildFields");
    let mut fields = Vec::with_capacity(translated.len());
    for (index, text) in translated.iter().enumerate() {
        let mut name = to_lower_camel(text);
        if name.is_empty() {
            name = format!("field{}", index + 1);
        }
        let original = &request.expected_headers[index];
        let description = Some(match &request.source_language {
            Some(lang) => format!("{original} ({lang})"),
            None => original.clone(),
        });
        fields.push(FieldSchema {
            name,
            field_type: FieldType::String,
            column: column_index_to_letter(start_col + index as u32),
            row: header_row,
            required: false,
            storage_format: None,
            description,
        });
    }

    let schema = FeatureSchema {
        name: request.feature_name.clone(),
        sheet_name: sheet,
        fields,
    };
    debug!(fields = schema.fields.len(), "inference complete");
    Ok(InferredSchema { schema, ledger })
}

/// Primary fetch plus exactly one retry with the alternate range text. Both
/// failing yields an empty row; the miss surfaces at validation.
fn fetch_header_row(
    reader: &dyn SpreadsheetReader,
    request: &InferenceRequest,
    primary: &str,
    alternate: &str,
    ledger: &mut DebugLedger,
) -> Vec<String> {
    match reader.read_values(&request.spreadsheet_id, &[primary.to_string()]) {
        Ok(blocks) => first_row(blocks),
        Err(err) => {
            warn!(error = %err, range = %primary, "header fetch failed, retrying with alternate range");
            ledger.record("primaryFetchError", err.to_string());
            match reader.read_values(&request.spreadsheet_id, &[alternate.to_string()]) {
                Ok(blocks) => first_row(blocks),
                Err(err) => {
                    warn!(error = %err, range = %alternate, "header retry failed, proceeding with empty row");
                    ledger.record("retryFetchError", err.to_string());
                    Vec::new()
                }
            }
        }
    }
}

fn first_row(blocks: Vec<Vec<Vec<String>>>) -> Vec<String> {
    blocks
        .into_iter()
        .next()
        .and_then(|matrix| matrix.into_iter().next())
        .unwrap_or_default()
}

/// Tiered resolution: exact dictionary, substring dictionary, then one batch
/// service call only when something is still unresolved. The service result
/// wins the merge, the dictionary is the fallback, the original text the
/// last resort. Never fatal.
fn translate_headers(
    translator: Option<&dyn Translator>,
    request: &InferenceRequest,
    source: &str,
    ledger: &mut DebugLedger,
) -> Vec<String> {
    let extra = &request.extra_dictionary;
    let mut resolved: Vec<Option<String>> = request
        .expected_headers
        .iter()
        .map(|header| {
            let term = header.trim();
            exact_lookup(term, extra)
                .or_else(|| substring_lookup(term, extra))
                .map(str::to_string)
        })
        .collect();

    if resolved.iter().any(Option::is_none) {
        match translator {
            Some(service) => {
                debug!(count = request.expected_headers.len(), "invoking translation service");
                match service.translate(&request.expected_headers, source, &request.target_language)
                {
                    Ok(batch) if batch.len() == request.expected_headers.len() => {
                        for (slot, text) in resolved.iter_mut().zip(batch) {
                            if !text.trim().is_empty() {
                                *slot = Some(text);
                            }
                        }
                    }
                    Ok(_) => {
                        warn!("translation service returned a misaligned batch");
                        ledger.record("translationError", "misaligned batch length");
                    }
                    Err(err) => {
                        warn!(error = %err, "translation service failed, keeping dictionary results");
                        ledger.record("translationError", err.to_string());
                    }
                }
            }
            None => ledger.record("translationSkipped", "no translator configured"),
        }
    }

    request
        .expected_headers
        .iter()
        .zip(resolved)
        .map(|(original, slot)| slot.unwrap_or_else(|| original.clone()))
        .collect()
}
