//! Schema-directed (de)hydration between typed records and triples.
//!
//! Each entity kind (Rule, File, Target, Build — see `crate::graph::record`)
//! implements [`QuadRecord`], which is the "schema registry" spec.md §4.1
//! describes: the mapping from a Rust struct's fields to a fixed predicate
//! set lives next to the struct, not in the store.

use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;

/// A typed record the quad store can write and load by identity.
pub trait QuadRecord: Sized {
    /// The `type` marker object value for this kind (`"rule"`, `"file"`, ...).
    fn type_name() -> &'static str;

    /// This record's subject identity (`rule:<name>`, ...).
    fn identity(&self) -> String;

    /// Attribute fields to persist, as `(predicate, value)` pairs. Does not
    /// include the `type` marker triple — the store adds that separately.
    fn to_fields(&self) -> Vec<(&'static str, String)>;

    /// Rebuild a record from its identity plus the attribute fields found
    /// under that identity (the `type` marker is not included here either).
    fn from_fields(identity: &str, fields: &HashMap<String, String>) -> CoreResult<Self>;
}

/// Look up a required field or fail with `SerializationError` — every
/// `QuadRecord::from_fields` impl is reconstructing triples the store itself
/// wrote, so a missing required field means corruption, not bad user input.
pub fn required_field<'a>(
    fields: &'a HashMap<String, String>,
    predicate: &str,
) -> CoreResult<&'a str> {
    fields
        .get(predicate)
        .map(|s| s.as_str())
        .ok_or_else(|| {
            CoreError::SerializationError(format!("missing field `{predicate}` while hydrating record"))
        })
}
