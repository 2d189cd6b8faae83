//! The Graph Model (GM) — spec.md §4.2.
//!
//! Defines the write operations that maintain the relational invariants
//! between rules, builds, files, and targets. Grounded on
//! `graph/store.rs::GraphStore::add_*` in the teacher crate: each operation
//! computes every triple it needs up front and commits them as one atomic
//! batch via [`QuadStore::apply_transaction`].

use super::identity::{build_identity, file_identity, infer_file_type, rule_identity, target_identity};
use super::predicate as p;
use super::record::{Build, File, Rule, Target, Variables};
use crate::error::{CoreError, CoreResult};
use crate::store::{QuadRecord, QuadStore, Triple};
use chrono::Utc;
use std::sync::Arc;

pub struct BuildInput {
    pub build_id: String,
    /// Rule **name** (natural key), not an identity string.
    pub rule: String,
    pub pool: String,
    pub variables: Variables,
}

pub struct GraphModel {
    store: Arc<QuadStore>,
}

impl GraphModel {
    pub fn new(store: Arc<QuadStore>) -> Self {
        GraphModel { store }
    }

    pub fn store(&self) -> &Arc<QuadStore> {
        &self.store
    }

    /// Stamps `id = rule:<name>` and the type marker, writes the record.
    /// Idempotent on identity.
    pub fn add_rule(&self, rule: Rule) -> CoreResult<Rule> {
        self.store.write_record(&rule)?;
        Ok(rule)
    }

    /// Stamps `id = build:<build_id>`, writes the build record, creates (or
    /// refreshes) outputs as Targets, creates absent inputs/implicit deps as
    /// Files, and materializes `has_input`/`has_output`/`has_implicit_dep`/
    /// `has_order_dep`/`depends_on` edges. One atomic batch.
    pub fn add_build(
        &self,
        build: BuildInput,
        inputs: &[String],
        outputs: &[String],
        implicit_deps: &[String],
        order_deps: &[String],
    ) -> CoreResult<Build> {
        if outputs.is_empty() {
            return Err(CoreError::ParseError("build has zero outputs".to_string()));
        }

        let build_record = Build {
            build_id: build.build_id.clone(),
            rule: rule_identity(&build.rule),
            pool: build.pool,
            variables: build.variables,
        };
        let build_id_full = build_identity(&build.build_id);

        let mut add: Vec<Triple> = Vec::new();
        let mut remove: Vec<Triple> = Vec::new();

        remove.extend(self.clear_predicates(
            &build_id_full,
            &[p::BUILD_ID, p::RULE, p::POOL, p::VARIABLES, p::TYPE],
        )?);
        add.extend(record_triples(&build_record));

        // Outputs become Targets. Re-declaring an existing output preserves
        // its status/hash (see DESIGN.md Open Question 1) and only refreshes
        // the producing-build back-edge.
        for output in outputs {
            let target_id = target_identity(output);
            let (status, hash) = match self.store.load_record::<Target>(&target_id) {
                Ok(existing) => (existing.status, existing.hash),
                Err(CoreError::NotFound(_)) => (Target::default_status(), Target::default_hash()),
                Err(e) => return Err(e),
            };
            let target = Target {
                path: output.clone(),
                status,
                hash,
                build: build_id_full.clone(),
            };
            remove.extend(self.clear_predicates(
                &target_id,
                &[p::PATH, p::STATUS, p::HASH, p::BUILD, p::TYPE],
            )?);
            add.extend(record_triples(&target));
            add.push(Triple::new(build_id_full.clone(), p::HAS_OUTPUT, target_id));
        }

        for input in inputs {
            add.extend(self.ensure_file(input)?);
            add.push(Triple::new(
                build_id_full.clone(),
                p::HAS_INPUT,
                file_identity(input),
            ));
        }
        for dep in implicit_deps {
            add.extend(self.ensure_file(dep)?);
            add.push(Triple::new(
                build_id_full.clone(),
                p::HAS_IMPLICIT_DEP,
                file_identity(dep),
            ));
        }
        for dep in order_deps {
            add.extend(self.ensure_file(dep)?);
            add.push(Triple::new(
                build_id_full.clone(),
                p::HAS_ORDER_DEP,
                file_identity(dep),
            ));
        }

        // depends_on is derived from inputs + implicit deps only, never
        // order-only deps.
        for output in outputs {
            let target_id = target_identity(output);
            for input in inputs.iter().chain(implicit_deps.iter()) {
                add.push(Triple::new(target_id.clone(), p::DEPENDS_ON, file_identity(input)));
            }
        }

        self.store.apply_transaction(add, remove)?;
        Ok(build_record)
    }

    /// Removes existing `status` edges for a target and adds the new one
    /// plus a `last_modified` timestamp edge. `NotFound` if the target does
    /// not exist.
    pub fn update_target_status(&self, path: &str, status: &str) -> CoreResult<()> {
        let target_id = target_identity(path);
        // Existence check first, per spec.md §4.2.
        self.store.load_record::<Target>(&target_id)?;

        let remove = self.clear_predicates(&target_id, &[p::STATUS, p::LAST_MODIFIED])?;
        let add = vec![
            Triple::new(target_id.clone(), p::STATUS, status.to_string()),
            Triple::new(target_id, p::LAST_MODIFIED, Utc::now().to_rfc3339()),
        ];
        self.store.apply_transaction(add, remove)
    }

    fn clear_predicates(&self, identity: &str, predicates: &[&str]) -> CoreResult<Vec<Triple>> {
        let existing = self.store.triples_for_subject(identity)?;
        Ok(existing
            .into_iter()
            .filter(|t| predicates.contains(&t.predicate.as_str()))
            .collect())
    }

    /// Creates a File node for `path` if absent, with its inferred type.
    /// Returns the triples to add (empty if the file already exists).
    fn ensure_file(&self, path: &str) -> CoreResult<Vec<Triple>> {
        let file_id = file_identity(path);
        match self.store.load_record::<File>(&file_id) {
            Ok(_) => Ok(Vec::new()),
            Err(CoreError::NotFound(_)) => {
                let file = File {
                    path: path.to_string(),
                    file_type: infer_file_type(path),
                };
                Ok(record_triples(&file))
            }
            Err(e) => Err(e),
        }
    }
}

fn record_triples<T: QuadRecord>(record: &T) -> Vec<Triple> {
    let identity = record.identity();
    let mut triples: Vec<Triple> = record
        .to_fields()
        .into_iter()
        .map(|(pred, val)| Triple::new(identity.clone(), pred, val))
        .collect();
    triples.push(Triple::new(identity, p::TYPE, T::type_name()));
    triples
}
