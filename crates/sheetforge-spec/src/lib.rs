//! sheetforge schema model.
//!
//! A [`FeatureSchema`] declares how one spreadsheet maps onto a typed entity:
//! one [`FieldSchema`] per column, all anchored to a shared header row. The
//! model derives the header/data A1 ranges consumed by the code generator and
//! validates the invariants the rest of the workspace relies on.

mod schema;
mod validation;

pub use schema::{
    CURRENT_SPEC_VERSION, FeatureSchema, FieldSchema, FieldType, SPEC_IDENT, SchemaDocument,
    SchemaVersion,
};
pub use validation::{SchemaIssue, ValidationError};

/// JSON schema for [`SchemaDocument`], generated from the type definitions.
pub fn generate_schema_json_pretty() -> String {
    let schema = schemars::schema_for!(SchemaDocument);
    serde_json::to_string_pretty(&schema).expect("generated schema must serialize")
}
