//! Shared request-processing helpers used by the generation handlers

pub mod fields;

pub use fields::{FieldSource, GenerationFields, first_present};
