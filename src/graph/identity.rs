//! Canonical identity strings and file-type inference (spec.md §3, §4.2).

use serde::{Deserialize, Serialize};

pub fn rule_identity(name: &str) -> String {
    format!("rule:{name}")
}

pub fn file_identity(path: &str) -> String {
    format!("file:{path}")
}

pub fn target_identity(path: &str) -> String {
    format!("target:{path}")
}

pub fn build_identity(build_id: &str) -> String {
    format!("build:{build_id}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Source,
    Header,
    Object,
    Library,
    Executable,
    Unknown,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Source => "source",
            FileType::Header => "header",
            FileType::Object => "object",
            FileType::Library => "library",
            FileType::Executable => "executable",
            FileType::Unknown => "unknown",
        }
    }

    pub fn parse(s: &str) -> FileType {
        match s {
            "source" => FileType::Source,
            "header" => FileType::Header,
            "object" => FileType::Object,
            "library" => FileType::Library,
            "executable" => FileType::Executable,
            _ => FileType::Unknown,
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Infer a file's type from its last dotted extension (spec.md §4.2).
pub fn infer_file_type(path: &str) -> FileType {
    let ext = path.rsplit('.').next().unwrap_or("");
    let ext = if ext == path { "" } else { ext };
    match ext.to_ascii_lowercase().as_str() {
        "c" | "cc" | "cpp" | "cxx" => FileType::Source,
        "h" | "hpp" | "hxx" => FileType::Header,
        "o" | "obj" => FileType::Object,
        "a" | "lib" => FileType::Library,
        "" | "exe" => FileType::Executable,
        _ => FileType::Unknown,
    }
}
