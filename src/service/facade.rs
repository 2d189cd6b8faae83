//! The Service Facade (SF) — spec.md §4.6.
//!
//! Maps request payloads onto GM/QE/GA/NP calls and back. Shared verbatim
//! by both the HTTP and RPC surfaces so behavior (validation, error
//! taxonomy, uptime accounting) cannot drift between them. Grounded on the
//! teacher's `http/handler.rs`, generalized into a surface-agnostic struct
//! per spec.md §9's note that the reference design's global store singleton
//! should become an explicit service object instead.

use crate::error::{CoreError, CoreResult, Cycle};
use crate::graph::{Build, BuildInput, File, GraphModel, Rule, Target, Variables};
use crate::ninja;
use crate::query::{BuildStats, QueryEngine};
use crate::store::{QuadStore, Triple};
use crate::algo;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub struct HealthInfo {
    pub status: &'static str,
    pub timestamp: String,
}

pub struct StatusInfo {
    pub service: &'static str,
    pub uptime_secs: u64,
}

pub struct CreateBuildRequest {
    pub build_id: String,
    pub rule: String,
    pub variables: Variables,
    pub pool: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub implicit_deps: Vec<String>,
    pub order_deps: Vec<String>,
}

pub struct CreateRuleRequest {
    pub name: String,
    pub command: String,
    pub description: String,
    pub variables: Variables,
}

pub struct LoadResult {
    pub message: String,
    pub rules_loaded: usize,
    pub builds_loaded: usize,
    pub build_time: Duration,
}

/// The stateless-per-request wrapper around one store. Cloneable via `Arc`
/// so both `axum` and `tonic` can hold the same instance as shared state.
pub struct ServiceFacade {
    store: Arc<QuadStore>,
    model: GraphModel,
    query: QueryEngine,
    start: Instant,
}

impl ServiceFacade {
    pub fn new(store: Arc<QuadStore>) -> Self {
        ServiceFacade {
            model: GraphModel::new(Arc::clone(&store)),
            query: QueryEngine::new(Arc::clone(&store)),
            store,
            start: Instant::now(),
        }
    }

    pub fn health(&self) -> HealthInfo {
        HealthInfo {
            status: "ok",
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn status(&self) -> StatusInfo {
        StatusInfo {
            service: "ninjagraph",
            uptime_secs: self.start.elapsed().as_secs(),
        }
    }

    pub fn create_rule(&self, req: CreateRuleRequest) -> CoreResult<Rule> {
        if req.name.trim().is_empty() {
            return Err(CoreError::InvalidArgument("rule name is required".to_string()));
        }
        if req.command.trim().is_empty() {
            return Err(CoreError::InvalidArgument("rule command is required".to_string()));
        }
        info!(rule = %req.name, "create_rule");
        self.model.add_rule(Rule {
            name: req.name,
            command: req.command,
            description: req.description,
            variables: req.variables,
        })
    }

    pub fn get_rule(&self, name: &str) -> CoreResult<Rule> {
        self.query.get_rule(name)
    }

    pub fn create_build(&self, req: CreateBuildRequest) -> CoreResult<Build> {
        if req.build_id.trim().is_empty() {
            return Err(CoreError::InvalidArgument("build_id is required".to_string()));
        }
        if req.rule.trim().is_empty() {
            return Err(CoreError::InvalidArgument("rule is required".to_string()));
        }
        if req.outputs.is_empty() {
            return Err(CoreError::InvalidArgument("outputs must not be empty".to_string()));
        }
        info!(build_id = %req.build_id, rule = %req.rule, "create_build");
        self.model.add_build(
            BuildInput {
                build_id: req.build_id,
                rule: req.rule,
                pool: req.pool,
                variables: req.variables,
            },
            &req.inputs,
            &req.outputs,
            &req.implicit_deps,
            &req.order_deps,
        )
    }

    pub fn get_build(&self, id: &str) -> CoreResult<Build> {
        self.query.get_build(id)
    }

    pub fn get_build_stats(&self) -> CoreResult<BuildStats> {
        self.query.get_build_stats()
    }

    pub fn get_build_order(&self) -> CoreResult<Vec<String>> {
        algo::build_order(&self.query)
    }

    pub fn get_targets_by_rule(&self, rule_name: &str) -> CoreResult<Vec<Target>> {
        self.query.get_targets_by_rule(rule_name)
    }

    pub fn get_all_targets(&self) -> CoreResult<Vec<Target>> {
        self.query.get_all_targets()
    }

    pub fn get_target(&self, path: &str) -> CoreResult<Target> {
        self.query.get_target(path)
    }

    pub fn get_target_dependencies(&self, path: &str) -> CoreResult<Vec<File>> {
        self.query.get_build_dependencies(path)
    }

    pub fn get_target_reverse_dependencies(&self, path: &str) -> CoreResult<Vec<Target>> {
        self.query.get_reverse_dependencies(path)
    }

    pub fn update_target_status(&self, path: &str, status: &str) -> CoreResult<()> {
        if status.trim().is_empty() {
            return Err(CoreError::InvalidArgument("status must not be empty".to_string()));
        }
        info!(target = %path, %status, "update_target_status");
        self.model.update_target_status(path, status)
    }

    pub fn find_cycles(&self) -> CoreResult<Vec<Cycle>> {
        algo::find_cycles(&self.query)
    }

    pub fn debug_quads(&self) -> CoreResult<Vec<Triple>> {
        self.store.scan_all()
    }

    /// Loads a Ninja build description, either from `file_path` or raw
    /// `content`. If both are given the filesystem path wins; if neither,
    /// `InvalidArgument`. The parse buffers entirely in memory and is only
    /// committed to the store if it succeeds in full (spec.md §9).
    pub fn load_ninja_file(&self, file_path: Option<String>, content: Option<String>) -> CoreResult<LoadResult> {
        let started = Instant::now();

        let text = match (file_path, content) {
            (Some(path), _) => std::fs::read_to_string(&path)
                .map_err(|e| CoreError::InvalidArgument(format!("cannot read {path}: {e}")))?,
            (None, Some(content)) => content,
            (None, None) => {
                return Err(CoreError::InvalidArgument(
                    "one of file_path or content is required".to_string(),
                ))
            }
        };

        let parsed = match ninja::parse(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "load_ninja_file: parse failed, store left untouched");
                return Err(e);
            }
        };
        let stats = ninja::load_into(&self.model, parsed)?;

        info!(
            rules_loaded = stats.rules_loaded,
            builds_loaded = stats.builds_loaded,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "load_ninja_file"
        );

        Ok(LoadResult {
            message: format!(
                "loaded {} rule(s) and {} build(s)",
                stats.rules_loaded, stats.builds_loaded
            ),
            rules_loaded: stats.rules_loaded,
            builds_loaded: stats.builds_loaded,
            build_time: started.elapsed(),
        })
    }
}

/// Flattens a list of `Variables` into the string map shape the HTTP/RPC
/// surfaces use for ad hoc counts payloads (e.g. `GetBuildStats`).
pub fn stats_to_map(stats: &BuildStats) -> HashMap<&'static str, usize> {
    let mut map = HashMap::new();
    map.insert("rules", stats.rules);
    map.insert("files", stats.files);
    map.insert("targets", stats.targets);
    map.insert("builds", stats.builds);
    map
}
