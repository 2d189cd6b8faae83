//! The Query Engine (QE) — spec.md §4.4.

pub mod engine;

pub use engine::{BuildStats, QueryEngine};
