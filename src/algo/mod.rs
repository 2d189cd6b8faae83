//! The Graph Algorithms (GA) — spec.md §4.5. Built on the Query Engine,
//! never the raw store, per DESIGN.md.

pub mod common;
pub mod cycles;
pub mod toposort;

pub use cycles::find_cycles;
pub use toposort::build_order;
