//! The Ninja Parser (NP) — spec.md §4.3.

pub mod parser;
pub mod tokenize;

pub use parser::{load_into, parse, LoadStats, ParsedBuild, ParsedGraph};
