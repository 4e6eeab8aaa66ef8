//! Operation catalog: an immutable, process-wide registry of code-generating
//! operations keyed by id.
//!
//! Each operation is a variant of [`Operation`]; the registry maps textual
//! ids onto variants once at first use and is never mutated afterwards, so it
//! is safe to share across threads without locking.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::context::OperationContext;
use crate::emit::{Layout, spreadsheet_expr};

/// Fatal generator errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
}

/// Coarse grouping of catalog entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationCategory {
    Crud,
    Batch,
    Range,
    Format,
}

/// One declared parameter of a generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    /// Type template; `{Entity}` is replaced with the feature's Pascal name.
    pub param_type: &'static str,
}

const fn param(name: &'static str, param_type: &'static str) -> ParamSpec {
    ParamSpec { name, param_type }
}

/// The catalog entries. Generation is a pure function of the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    GetAll,
    GetById,
    Create,
    Update,
    Delete,
    Search,
    Count,
    BatchCreate,
    BatchUpdate,
    GetRange,
    SetRange,
    ClearRange,
    FormatCells,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::GetAll,
        Operation::GetById,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Search,
        Operation::Count,
        Operation::BatchCreate,
        Operation::BatchUpdate,
        Operation::GetRange,
        Operation::SetRange,
        Operation::ClearRange,
        Operation::FormatCells,
    ];

    /// Registry key.
    pub fn id(self) -> &'static str {
        match self {
            Operation::GetAll => "getAll",
            Operation::GetById => "getById",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::Count => "count",
            Operation::BatchCreate => "batchCreate",
            Operation::BatchUpdate => "batchUpdate",
            Operation::GetRange => "getRange",
            Operation::SetRange => "setRange",
            Operation::ClearRange => "clearRange",
            Operation::FormatCells => "formatCells",
        }
    }

    /// Public export name. `delete` is a reserved word in the emitted
    /// language, so it alone is renamed.
    pub fn export_name(self) -> &'static str {
        match self {
            Operation::Delete => "deleteById",
            _ => self.id(),
        }
    }

    pub fn category(self) -> OperationCategory {
        match self {
            Operation::GetAll
            | Operation::GetById
            | Operation::Create
            | Operation::Update
            | Operation::Delete
            | Operation::Search
            | Operation::Count => OperationCategory::Crud,
            Operation::BatchCreate | Operation::BatchUpdate => OperationCategory::Batch,
            Operation::GetRange | Operation::SetRange | Operation::ClearRange => {
                OperationCategory::Range
            }
            Operation::FormatCells => OperationCategory::Format,
        }
    }

    pub fn params(self) -> &'static [ParamSpec] {
        match self {
            Operation::GetAll | Operation::Count => &[],
            Operation::GetById | Operation::Delete => const { &[param("id", "string")] },
            Operation::Create => const { &[param("record", "{Entity}")] },
            Operation::Update => {
                const { &[param("id", "string"), param("patch", "Partial<{Entity}>")] }
            }
            Operation::Search => const { &[param("query", "Partial<{Entity}>")] },
            Operation::BatchCreate | Operation::BatchUpdate => {
                const { &[param("records", "{Entity}[]")] }
            }
            Operation::GetRange | Operation::ClearRange => {
                const { &[param("a1Notation", "string")] }
            }
            Operation::SetRange => {
                const { &[param("a1Notation", "string"), param("values", "any[][]")] }
            }
            Operation::FormatCells => {
                const { &[param("a1Notation", "string"), param("format", "CellFormat")] }
            }
        }
    }

    /// Return-type template; `{Entity}` is replaced per feature.
    pub fn return_type(self) -> &'static str {
        match self {
            Operation::GetAll | Operation::Search => "{Entity}[]",
            Operation::GetById => "{Entity} | null",
            Operation::Create | Operation::Update => "{Entity}",
            Operation::BatchCreate | Operation::BatchUpdate => "{Entity}[]",
            Operation::Count => "number",
            Operation::GetRange => "any[][]",
            Operation::Delete
            | Operation::SetRange
            | Operation::ClearRange
            | Operation::FormatCells => "void",
        }
    }

    /// Return type with the entity placeholder instantiated.
    pub fn return_type_for(self, ctx: &OperationContext) -> String {
        self.return_type().replace("{Entity}", &ctx.names.pascal)
    }

    /// Emit the source text for this operation. Pure: equal contexts yield
    /// equal text.
    pub fn generate(self, ctx: &OperationContext) -> String {
        match self {
            Operation::GetAll => gen_get_all(ctx),
            Operation::GetById => gen_get_by_id(ctx),
            Operation::Create => gen_create(ctx),
            Operation::Update => gen_update(ctx),
            Operation::Delete => gen_delete(ctx),
            Operation::Search => gen_search(ctx),
            Operation::Count => gen_count(ctx),
            Operation::BatchCreate => gen_batch_create(ctx),
            Operation::BatchUpdate => gen_batch_update(ctx),
            Operation::GetRange => gen_get_range(ctx),
            Operation::SetRange => gen_set_range(ctx),
            Operation::ClearRange => gen_clear_range(ctx),
            Operation::FormatCells => gen_format_cells(ctx),
        }
    }
}

static REGISTRY: Lazy<BTreeMap<&'static str, Operation>> =
    Lazy::new(|| Operation::ALL.iter().map(|op| (op.id(), *op)).collect());

/// Resolve an operation id against the registry.
pub fn lookup(id: &str) -> Option<Operation> {
    REGISTRY.get(id).copied()
}

/// Every registered operation id, in registry order.
pub fn operation_ids() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

/// Generate source text for each requested operation, preserving caller
/// order. Any id absent from the registry is fatal.
pub fn generate_operations_codes<S: AsRef<str>>(
    ids: &[S],
    ctx: &OperationContext,
) -> Result<Vec<String>, GenError> {
    ids.iter()
        .map(|id| {
            let id = id.as_ref();
            lookup(id)
                .map(|op| op.generate(ctx))
                .ok_or_else(|| GenError::UnknownOperation(id.to_string()))
        })
        .collect()
}

/// Map operation ids to their public export names, comma-and-newline joined.
pub fn generate_exports_list<S: AsRef<str>>(ids: &[S]) -> Result<String, GenError> {
    let mut names = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        let op = lookup(id).ok_or_else(|| GenError::UnknownOperation(id.to_string()))?;
        names.push(op.export_name());
    }
    Ok(names.join(",\n"))
}

fn js_str(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}

fn layout_of(ctx: &OperationContext) -> Option<Layout<'_>> {
    ctx.schema.as_ref().and_then(Layout::new)
}

/// Prelude for read-only operations: spreadsheet handle plus a `rows`
/// binding from either the named range, the schema's data range, or the
/// active sheet when neither is available.
fn read_prelude(ctx: &OperationContext, layout: Option<&Layout<'_>>) -> String {
    let mut out = format!("  const ss = {};\n", spreadsheet_expr(ctx));
    match (layout, ctx.range_name.as_deref()) {
        (_, Some(name)) => out.push_str(&format!(
            "  const rows = ss.getRangeByName('{}').getValues();\n",
            js_str(name)
        )),
        (Some(layout), None) => {
            out.push_str(&format!(
                "  const sheet = ss.getSheetByName('{}');\n",
                js_str(layout.sheet_name)
            ));
            out.push_str(&format!(
                "  const rows = sheet.getRange('{}').getValues();\n",
                layout.data_range_local
            ));
        }
        (None, None) => {
            out.push_str("  const rows = ss.getActiveSheet().getDataRange().getValues();\n")
        }
    }
    out
}

/// Prelude for mutating operations: spreadsheet and sheet handles.
fn write_prelude(ctx: &OperationContext, layout: Option<&Layout<'_>>) -> String {
    let mut out = format!("  const ss = {};\n", spreadsheet_expr(ctx));
    match layout {
        Some(layout) => out.push_str(&format!(
            "  const sheet = ss.getSheetByName('{}');\n",
            js_str(layout.sheet_name)
        )),
        None => out.push_str("  const sheet = ss.getActiveSheet();\n"),
    }
    out
}

fn gen_get_all(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = read_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => format!(
            "/** Fetch every {camel} record. */\n\
             function getAll() {{\n\
             {prelude}  return rows\n    \
               .filter((row) => row[0] !== '')\n    \
               .map((row) => ({obj}));\n\
             }}\n",
            obj = layout.object_literal("row")
        ),
        None => format!(
            "/** Fetch every {camel} row. */\n\
             function getAll() {{\n\
             {prelude}  return rows.filter((row) => row[0] !== '');\n\
             }}\n"
        ),
    }
}

fn gen_get_by_id(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = read_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    let key = layout.as_ref().map_or("id", |l| l.key.name.as_str());
    let obj = layout
        .as_ref()
        .map_or_else(|| "row".to_string(), |l| l.object_literal("row"));
    format!(
        "/** Look up one {camel} by {key}. */\n\
         function getById({key}) {{\n\
         {prelude}  for (let i = 0; i < rows.length; i++) {{\n    \
           const row = rows[i];\n    \
           if (row[0] === {key}) {{\n      \
             return {obj};\n    \
           }}\n  \
         }}\n  \
         return null;\n\
         }}\n"
    )
}

fn gen_create(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = write_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => format!(
            "/** Append one {camel} row. */\n\
             function create({camel}) {{\n\
             {defaults}{guards}{prelude}  sheet.appendRow({row});\n  \
             return {camel};\n\
             }}\n",
            defaults = layout.defaults_block(camel, "  "),
            guards = layout.guards_block(camel, "  "),
            row = layout.encoded_row(camel)
        ),
        None => format!(
            "/** Append one {camel} row. */\n\
             function create(record) {{\n\
             {prelude}  sheet.appendRow(record);\n  \
             return record;\n\
             }}\n"
        ),
    }
}

fn gen_update(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = write_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => {
            let key = layout.key.name.as_str();
            format!(
                "/** Update one {camel} in place by {key}. */\n\
                 function update({key}, patch) {{\n\
                 {prelude}  const rows = sheet.getRange('{range}').getValues();\n  \
                 for (let i = 0; i < rows.length; i++) {{\n    \
                   if (rows[i][0] === {key}) {{\n      \
                     const {camel} = {obj};\n      \
                     Object.assign({camel}, patch);\n      \
                     sheet.getRange(i + {data_row}, {col}, 1, {width}).setValues([{row}]);\n      \
                     return {camel};\n    \
                   }}\n  \
                 }}\n  \
                 throw new Error('{camel} not found: ' + {key});\n\
                 }}\n",
                range = layout.data_range_local,
                obj = layout.object_literal("rows[i]"),
                data_row = layout.data_row,
                col = layout.first_col + 1,
                width = layout.width,
                row = layout.encoded_row(camel)
            )
        }
        None => format!(
            "/** Update one {camel} row in place by id. */\n\
             function update(id, record) {{\n\
             {prelude}  const rows = sheet.getDataRange().getValues();\n  \
             for (let i = 0; i < rows.length; i++) {{\n    \
               if (rows[i][0] === id) {{\n      \
                 sheet.getRange(i + 1, 1, 1, record.length).setValues([record]);\n      \
                 return record;\n    \
               }}\n  \
             }}\n  \
             throw new Error('{camel} not found: ' + id);\n\
             }}\n"
        ),
    }
}

fn gen_delete(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = write_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => {
            let key = layout.key.name.as_str();
            format!(
                "/** Delete one {camel} row by {key}. */\n\
                 function deleteById({key}) {{\n\
                 {prelude}  const rows = sheet.getRange('{range}').getValues();\n  \
                 for (let i = 0; i < rows.length; i++) {{\n    \
                   if (rows[i][0] === {key}) {{\n      \
                     sheet.deleteRow(i + {data_row});\n      \
                     return;\n    \
                   }}\n  \
                 }}\n  \
                 throw new Error('{camel} not found: ' + {key});\n\
                 }}\n",
                range = layout.data_range_local,
                data_row = layout.data_row
            )
        }
        None => format!(
            "/** Delete one {camel} row by id. */\n\
             function deleteById(id) {{\n\
             {prelude}  const rows = sheet.getDataRange().getValues();\n  \
             for (let i = 0; i < rows.length; i++) {{\n    \
               if (rows[i][0] === id) {{\n      \
                 sheet.deleteRow(i + 1);\n      \
                 return;\n    \
               }}\n  \
             }}\n  \
             throw new Error('{camel} not found: ' + id);\n\
             }}\n"
        ),
    }
}

fn gen_search(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = read_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => format!(
            "/** Filter {camel} records by exact match on every query key. */\n\
             function search(query) {{\n\
             {prelude}  return rows\n    \
               .filter((row) => row[0] !== '')\n    \
               .map((row) => ({obj}))\n    \
               .filter(({camel}) => Object.keys(query).every((key) => {camel}[key] === query[key]));\n\
             }}\n",
            obj = layout.object_literal("row")
        ),
        None => format!(
            "/** Filter {camel} rows by exact match on every query key. */\n\
             function search(query) {{\n\
             {prelude}  return rows\n    \
               .filter((row) => row[0] !== '')\n    \
               .filter((row) => Object.keys(query).every((key) => row[key] === query[key]));\n\
             }}\n"
        ),
    }
}

fn gen_count(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = read_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    format!(
        "/** Count non-empty {camel} rows. */\n\
         function count() {{\n\
         {prelude}  return rows.filter((row) => row[0] !== '').length;\n\
         }}\n"
    )
}

fn gen_batch_create(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let prelude = write_prelude(ctx, layout.as_ref());
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => format!(
            "/** Append many {camel} rows in one write. */\n\
             function batchCreate({camel}s) {{\n\
             {prelude}  const rows = {camel}s.map(({camel}) => {{\n\
             {defaults}{guards}    return {row};\n  \
             }});\n  \
             if (rows.length > 0) {{\n    \
               sheet.getRange(sheet.getLastRow() + 1, {col}, rows.length, {width}).setValues(rows);\n  \
             }}\n  \
             return {camel}s;\n\
             }}\n",
            defaults = layout.defaults_block(camel, "    "),
            guards = layout.guards_block(camel, "    "),
            row = layout.encoded_row(camel),
            col = layout.first_col + 1,
            width = layout.width
        ),
        None => format!(
            "/** Append many {camel} rows in one write. */\n\
             function batchCreate(records) {{\n\
             {prelude}  if (records.length > 0) {{\n    \
               sheet.getRange(sheet.getLastRow() + 1, 1, records.length, records[0].length).setValues(records);\n  \
             }}\n  \
             return records;\n\
             }}\n"
        ),
    }
}

fn gen_batch_update(ctx: &OperationContext) -> String {
    let layout = layout_of(ctx);
    let camel = &ctx.names.camel;
    match layout {
        Some(layout) => format!(
            "/** Update many {camel} rows; delegates to update() per record. */\n\
             function batchUpdate({camel}s) {{\n  \
             return {camel}s.map(({camel}) => update({camel}.{key}, {camel}));\n\
             }}\n",
            key = layout.key.name
        ),
        None => format!(
            "/** Update many {camel} rows; delegates to update() per record. */\n\
             function batchUpdate(records) {{\n  \
             return records.map((record) => update(record[0], record));\n\
             }}\n"
        ),
    }
}

fn gen_get_range(ctx: &OperationContext) -> String {
    format!(
        "/** Read raw values from an A1 range. */\n\
         function getRange(a1Notation) {{\n  \
         return {ss}.getRange(a1Notation).getValues();\n\
         }}\n",
        ss = spreadsheet_expr(ctx)
    )
}

fn gen_set_range(ctx: &OperationContext) -> String {
    format!(
        "/** Write a 2-D value matrix into an A1 range. */\n\
         function setRange(a1Notation, values) {{\n  \
         {ss}.getRange(a1Notation).setValues(values);\n\
         }}\n",
        ss = spreadsheet_expr(ctx)
    )
}

fn gen_clear_range(ctx: &OperationContext) -> String {
    format!(
        "/** Clear cell contents in an A1 range. */\n\
         function clearRange(a1Notation) {{\n  \
         {ss}.getRange(a1Notation).clearContent();\n\
         }}\n",
        ss = spreadsheet_expr(ctx)
    )
}

fn gen_format_cells(ctx: &OperationContext) -> String {
    format!(
        "/** Apply cell formatting to an A1 range. */\n\
         function formatCells(a1Notation, format) {{\n  \
         const range = {ss}.getRange(a1Notation);\n  \
         if (format.background) range.setBackground(format.background);\n  \
         if (format.fontColor) range.setFontColor(format.fontColor);\n  \
         if (format.fontWeight) range.setFontWeight(format.fontWeight);\n  \
         if (format.numberFormat) range.setNumberFormat(format.numberFormat);\n\
         }}\n",
        ss = spreadsheet_expr(ctx)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_all_variants() {
        assert_eq!(REGISTRY.len(), Operation::ALL.len());
        for op in Operation::ALL {
            assert_eq!(lookup(op.id()), Some(op));
        }
        assert_eq!(lookup("dropTable"), None);
    }

    #[test]
    fn export_renaming() {
        let exports = generate_exports_list(&["create", "delete"]).unwrap();
        assert_eq!(exports, "create,\ndeleteById");
        assert!(!exports.contains("delete,"));
    }

    #[test]
    fn unknown_operation_is_fatal() {
        let ctx = OperationContext::new("task");
        let err = generate_operations_codes(&["getAll", "explode"], &ctx).unwrap_err();
        assert_eq!(err, GenError::UnknownOperation("explode".to_string()));
        assert_eq!(err.to_string(), "Unknown operation: explode");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ctx = OperationContext::new("task");
        let codes = generate_operations_codes::<&str>(&[], &ctx).unwrap();
        assert!(codes.is_empty());
    }

    #[test]
    fn caller_order_is_preserved() {
        let ctx = OperationContext::new("task");
        let codes = generate_operations_codes(&["count", "getAll"], &ctx).unwrap();
        assert!(codes[0].contains("function count()"));
        assert!(codes[1].contains("function getAll()"));
    }

    #[test]
    fn return_types_instantiate_entity() {
        let ctx = OperationContext::new("task");
        assert_eq!(Operation::GetAll.return_type_for(&ctx), "Task[]");
        assert_eq!(Operation::GetById.return_type_for(&ctx), "Task | null");
        assert_eq!(Operation::Count.return_type_for(&ctx), "number");
    }
}
