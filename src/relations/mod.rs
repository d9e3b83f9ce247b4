//! Relation inclusion and field selection specifications.

mod include;
mod select;

pub use include::{Include, merge_includes};
pub use select::{FieldSpec, fields_to_array, select_fields};
