//! The Query Engine (QE) — spec.md §4.4.
//!
//! Read-side operations over the Quad Store. Grounded on the teacher's
//! read accessors in `graph/store.rs`: thin, allocation-light wrappers
//! around `QuadStore::load_record`/`subjects_for`/`triples_for_subject`.

use crate::error::CoreResult;
use crate::graph::{
    build_identity, file_identity, predicate as p, rule_identity, target_identity, Build, File,
    Rule, Target,
};
use crate::store::QuadStore;
use std::collections::HashSet;
use std::sync::Arc;

pub struct QueryEngine {
    store: Arc<QuadStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<QuadStore>) -> Self {
        QueryEngine { store }
    }

    pub fn get_rule(&self, name: &str) -> CoreResult<Rule> {
        self.store.load_record(&rule_identity(name))
    }

    pub fn get_build(&self, build_id: &str) -> CoreResult<Build> {
        self.store.load_record(&build_identity(build_id))
    }

    pub fn get_target(&self, path: &str) -> CoreResult<Target> {
        self.store.load_record(&target_identity(path))
    }

    pub fn get_file(&self, path: &str) -> CoreResult<File> {
        self.store.load_record(&file_identity(path))
    }

    /// All Targets, enumerated by type-marker scan. Order is unspecified.
    pub fn get_all_targets(&self) -> CoreResult<Vec<Target>> {
        self.store
            .subjects_for(p::TYPE, p::TYPE_TARGET)?
            .into_iter()
            .map(|identity| self.store.load_record(&identity))
            .collect()
    }

    /// All builds whose `rule` attribute is `rule:<rule_name>`, then their
    /// `has_output` targets. Each target appears at most once.
    pub fn get_targets_by_rule(&self, rule_name: &str) -> CoreResult<Vec<Target>> {
        let rule_id = rule_identity(rule_name);
        let build_ids = self.store.subjects_for(p::RULE, &rule_id)?;

        let mut seen = HashSet::new();
        let mut targets = Vec::new();
        for build_id in build_ids {
            for triple in self.store.triples_for_subject(&build_id)? {
                if triple.predicate == p::HAS_OUTPUT && seen.insert(triple.object.clone()) {
                    targets.push(self.store.load_record(&triple.object)?);
                }
            }
        }
        Ok(targets)
    }

    /// Load `target_path`, follow its `build` back-edge, and collect all
    /// Files reachable via that build's `has_input` and `has_implicit_dep`
    /// edges. Order unspecified, duplicates suppressed.
    pub fn get_build_dependencies(&self, target_path: &str) -> CoreResult<Vec<File>> {
        let target = self.get_target(target_path)?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for triple in self.store.triples_for_subject(&target.build)? {
            if triple.predicate == p::HAS_INPUT || triple.predicate == p::HAS_IMPLICIT_DEP {
                if seen.insert(triple.object.clone()) {
                    files.push(self.store.load_record(&triple.object)?);
                }
            }
        }
        Ok(files)
    }

    /// All Targets with a `depends_on` edge to `file:<file_path>`.
    pub fn get_reverse_dependencies(&self, file_path: &str) -> CoreResult<Vec<Target>> {
        let file_id = file_identity(file_path);
        self.store
            .subjects_for(p::DEPENDS_ON, &file_id)?
            .into_iter()
            .map(|identity| self.store.load_record(&identity))
            .collect()
    }

    /// Counts of each entity kind currently in the store.
    pub fn get_build_stats(&self) -> CoreResult<BuildStats> {
        Ok(BuildStats {
            rules: self.store.subjects_for(p::TYPE, p::TYPE_RULE)?.len(),
            files: self.store.subjects_for(p::TYPE, p::TYPE_FILE)?.len(),
            targets: self.store.subjects_for(p::TYPE, p::TYPE_TARGET)?.len(),
            builds: self.store.subjects_for(p::TYPE, p::TYPE_BUILD)?.len(),
        })
    }

    pub(crate) fn store(&self) -> &Arc<QuadStore> {
        &self.store
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildStats {
    pub rules: usize,
    pub files: usize,
    pub targets: usize,
    pub builds: usize,
}
