//! The four entity records (spec.md §3) and their triple (de)hydration.

use super::identity::{build_identity, file_identity, rule_identity, target_identity, FileType};
use super::predicate as p;
use crate::error::CoreResult;
use crate::store::schema::{required_field, QuadRecord};
use std::collections::HashMap;

pub type Variables = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub command: String,
    pub description: String,
    pub variables: Variables,
}

impl QuadRecord for Rule {
    fn type_name() -> &'static str {
        p::TYPE_RULE
    }

    fn identity(&self) -> String {
        rule_identity(&self.name)
    }

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (p::NAME, self.name.clone()),
            (p::COMMAND, self.command.clone()),
            (p::DESCRIPTION, self.description.clone()),
            (p::VARIABLES, p::variables_to_json(&self.variables)),
        ]
    }

    fn from_fields(_identity: &str, fields: &HashMap<String, String>) -> CoreResult<Self> {
        Ok(Rule {
            name: required_field(fields, p::NAME)?.to_string(),
            command: required_field(fields, p::COMMAND)?.to_string(),
            description: fields.get(p::DESCRIPTION).cloned().unwrap_or_default(),
            variables: p::variables_from_json(fields.get(p::VARIABLES).map(String::as_str).unwrap_or("{}")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub path: String,
    pub file_type: FileType,
}

impl QuadRecord for File {
    fn type_name() -> &'static str {
        p::TYPE_FILE
    }

    fn identity(&self) -> String {
        file_identity(&self.path)
    }

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (p::PATH, self.path.clone()),
            (p::FILE_TYPE, self.file_type.as_str().to_string()),
        ]
    }

    fn from_fields(_identity: &str, fields: &HashMap<String, String>) -> CoreResult<Self> {
        Ok(File {
            path: required_field(fields, p::PATH)?.to_string(),
            file_type: FileType::parse(fields.get(p::FILE_TYPE).map(String::as_str).unwrap_or("unknown")),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: String,
    pub status: String,
    pub hash: String,
    /// Identity (`build:<id>`) of the producing build.
    pub build: String,
}

impl Target {
    pub fn default_status() -> String {
        "clean".to_string()
    }

    pub fn default_hash() -> String {
        "none".to_string()
    }
}

impl QuadRecord for Target {
    fn type_name() -> &'static str {
        p::TYPE_TARGET
    }

    fn identity(&self) -> String {
        target_identity(&self.path)
    }

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (p::PATH, self.path.clone()),
            (p::STATUS, self.status.clone()),
            (p::HASH, self.hash.clone()),
            (p::BUILD, self.build.clone()),
        ]
    }

    fn from_fields(_identity: &str, fields: &HashMap<String, String>) -> CoreResult<Self> {
        Ok(Target {
            path: required_field(fields, p::PATH)?.to_string(),
            status: fields
                .get(p::STATUS)
                .cloned()
                .unwrap_or_else(Target::default_status),
            hash: fields.get(p::HASH).cloned().unwrap_or_else(Target::default_hash),
            build: required_field(fields, p::BUILD)?.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    pub build_id: String,
    /// Identity (`rule:<name>`) of the rule this build invokes.
    pub rule: String,
    pub pool: String,
    pub variables: Variables,
}

impl QuadRecord for Build {
    fn type_name() -> &'static str {
        p::TYPE_BUILD
    }

    fn identity(&self) -> String {
        build_identity(&self.build_id)
    }

    fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (p::BUILD_ID, self.build_id.clone()),
            (p::RULE, self.rule.clone()),
            (p::POOL, self.pool.clone()),
            (p::VARIABLES, p::variables_to_json(&self.variables)),
        ]
    }

    fn from_fields(_identity: &str, fields: &HashMap<String, String>) -> CoreResult<Self> {
        Ok(Build {
            build_id: required_field(fields, p::BUILD_ID)?.to_string(),
            rule: required_field(fields, p::RULE)?.to_string(),
            pool: fields.get(p::POOL).cloned().unwrap_or_default(),
            variables: p::variables_from_json(fields.get(p::VARIABLES).map(String::as_str).unwrap_or("{}")),
        })
    }
}
