//! sheetforge code generator.
//!
//! Compiles a [`sheetforge_spec::FeatureSchema`] plus a list of operation ids
//! into spreadsheet data-access source text. The catalog of operations is
//! fixed at compile time; generation itself is pure and deterministic.

mod catalog;
mod context;
mod emit;

pub use catalog::{
    GenError, Operation, OperationCategory, ParamSpec, generate_exports_list,
    generate_operations_codes, lookup, operation_ids,
};
pub use context::{FeatureNames, OperationContext};
