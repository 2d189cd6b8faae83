//! The triple type the quad store indexes and persists.
//!
//! Labels (the fourth quad component) are unused by this system — see
//! GLOSSARY in spec.md — so `Triple` is the store's only data shape.

use serde::{Deserialize, Serialize};

/// A `(subject, predicate, object)` triple.
///
/// `subject` is always an entity identity string (`rule:<name>`,
/// `build:<id>`, `file:<path>`, `target:<path>`). `predicate` is one of the
/// fixed attribute or relationship names in [`crate::graph::predicate`].
/// `object` is either a literal (attribute value, serialized variables map)
/// or another identity string (relationship edges, type markers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Triple {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}
