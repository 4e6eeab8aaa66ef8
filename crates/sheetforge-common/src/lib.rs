//! Shared A1-notation primitives for the sheetforge workspace.

pub mod a1;
pub mod grid;

pub use a1::{
    A1Error, column_index_to_letter, column_letter_to_index, format_sheet_name_for_range,
    normalize_range_text, parse_cell, parse_range, split_sheet_and_range,
};
pub use grid::GridRange;
