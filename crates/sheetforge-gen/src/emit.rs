//! Field-level emission rules: how one schema field decodes out of a row,
//! encodes back into one, defaults when absent, and guards when required.

use sheetforge_spec::{FeatureSchema, FieldSchema, FieldType};

use crate::context::OperationContext;

/// Lower-cased field names treated as creation/update timestamps.
const TIMESTAMP_NAMES: [&str; 4] = ["createdat", "created_at", "updatedat", "updated_at"];

/// Column layout of a schema in canonical (ascending column index) order.
pub(crate) struct Layout<'a> {
    pub fields: Vec<&'a FieldSchema>,
    pub key: &'a FieldSchema,
    pub sheet_name: &'a str,
    pub first_col: u32,
    pub width: u32,
    pub data_row: u32,
    /// Sheet-local data range, e.g. `A2:C` (bounds follow the schema's
    /// column-bounds computation).
    pub data_range_local: String,
}

impl<'a> Layout<'a> {
    pub fn new(schema: &'a FeatureSchema) -> Option<Self> {
        let fields = schema.sorted_fields();
        let key = *fields.first()?;
        let first_col = key.column_index()?;
        let last_col = fields.last().and_then(|f| f.column_index())?;
        let header_row = key.row;
        let (first, last) = schema.column_bounds()?;
        Some(Layout {
            key,
            sheet_name: &schema.sheet_name,
            first_col,
            width: last_col - first_col + 1,
            data_row: header_row + 1,
            data_range_local: format!("{first}{}:{last}", header_row + 1),
            fields,
        })
    }

    /// Zero-based offset of a field within a fetched row slice.
    pub fn offset(&self, field: &FieldSchema) -> u32 {
        field.column_index().unwrap_or(self.first_col) - self.first_col
    }

    /// `{ id: row[0], done: row[2] === 'TRUE', ... }`
    pub fn object_literal(&self, row_var: &str) -> String {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| {
                let cell = format!("{row_var}[{}]", self.offset(field));
                format!("{}: {}", field.name, decode_expr(field, &cell))
            })
            .collect();
        format!("{{ {} }}", parts.join(", "))
    }

    /// `[task.id, task.title, task.done ? 'TRUE' : 'FALSE']`
    pub fn encoded_row(&self, value_var: &str) -> String {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|field| encode_expr(field, &format!("{value_var}.{}", field.name)))
            .collect();
        format!("[{}]", parts.join(", "))
    }

    /// One `if (v.x === undefined) v.x = ...;` line per defaultable field.
    pub fn defaults_block(&self, value_var: &str, indent: &str) -> String {
        let mut out = String::new();
        for field in &self.fields {
            if let Some(expr) = default_expr(field) {
                out.push_str(&format!(
                    "{indent}if ({value_var}.{name} === undefined) {value_var}.{name} = {expr};\n",
                    name = field.name
                ));
            }
        }
        out
    }

    /// One `if (!v.x) throw ...;` line per required field.
    pub fn guards_block(&self, value_var: &str, indent: &str) -> String {
        let mut out = String::new();
        for field in &self.fields {
            if field.required {
                out.push_str(&format!(
                    "{indent}if (!{value_var}.{name}) throw new Error('{name} is required');\n",
                    name = field.name
                ));
            }
        }
        out
    }
}

/// Decode rule table (cell → typed attribute).
pub(crate) fn decode_expr(field: &FieldSchema, cell: &str) -> String {
    match field.field_type {
        FieldType::Boolean => match field.sentinel_pair() {
            Some((truthy, _)) => format!("{cell} === '{truthy}'"),
            None => format!("Boolean({cell})"),
        },
        FieldType::Number => format!("Number({cell})"),
        FieldType::String | FieldType::Date => cell.to_string(),
    }
}

/// Encode rule table (typed attribute → cell).
pub(crate) fn encode_expr(field: &FieldSchema, value: &str) -> String {
    match field.field_type {
        FieldType::Boolean => match field.sentinel_pair() {
            Some((truthy, falsy)) => format!("{value} ? '{truthy}' : '{falsy}'"),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

/// Default-value rules, first match wins: id → generated unique id,
/// timestamp-named → current timestamp, boolean → `false`.
pub(crate) fn default_expr(field: &FieldSchema) -> Option<String> {
    if field.name == "id" {
        return Some("Utilities.getUuid()".to_string());
    }
    if TIMESTAMP_NAMES.contains(&field.name.to_lowercase().as_str()) {
        return Some("new Date()".to_string());
    }
    if field.field_type == FieldType::Boolean {
        return Some("false".to_string());
    }
    None
}

/// Expression that resolves the target spreadsheet.
pub(crate) fn spreadsheet_expr(ctx: &OperationContext) -> String {
    match ctx.custom_params.get("spreadsheetId") {
        Some(id) => format!("SpreadsheetApp.openById('{id}')"),
        None => "SpreadsheetApp.getActiveSpreadsheet()".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FieldType) -> FieldSchema {
        FieldSchema {
            name: name.to_string(),
            field_type,
            column: "A".to_string(),
            row: 1,
            required: false,
            storage_format: None,
            description: None,
        }
    }

    #[test]
    fn boolean_decode_uses_sentinel_when_declared() {
        let mut done = field("done", FieldType::Boolean);
        done.storage_format = Some("TRUE/FALSE".to_string());
        assert_eq!(decode_expr(&done, "row[2]"), "row[2] === 'TRUE'");

        let plain = field("done", FieldType::Boolean);
        assert_eq!(decode_expr(&plain, "row[2]"), "Boolean(row[2])");
    }

    #[test]
    fn numeric_decode_parses() {
        assert_eq!(
            decode_expr(&field("points", FieldType::Number), "row[1]"),
            "Number(row[1])"
        );
        assert_eq!(decode_expr(&field("title", FieldType::String), "row[0]"), "row[0]");
    }

    #[test]
    fn boolean_encode_is_a_two_way_ternary() {
        let mut done = field("done", FieldType::Boolean);
        done.storage_format = Some("YES/NO".to_string());
        assert_eq!(encode_expr(&done, "task.done"), "task.done ? 'YES' : 'NO'");

        let plain = field("done", FieldType::Boolean);
        assert_eq!(encode_expr(&plain, "task.done"), "task.done");
    }

    #[test]
    fn default_rules_apply_in_priority_order() {
        // An id-named boolean still gets the unique-id default.
        let id = field("id", FieldType::Boolean);
        assert_eq!(default_expr(&id).unwrap(), "Utilities.getUuid()");

        let created = field("createdAt", FieldType::Date);
        assert_eq!(default_expr(&created).unwrap(), "new Date()");

        let done = field("done", FieldType::Boolean);
        assert_eq!(default_expr(&done).unwrap(), "false");

        assert_eq!(default_expr(&field("title", FieldType::String)), None);
    }
}
