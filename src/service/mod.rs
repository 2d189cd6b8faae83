//! The Service Facade (SF) — spec.md §4.6 — and its two external surfaces.

pub mod facade;
pub mod http;
pub mod rpc;

pub use facade::ServiceFacade;
