//! CLI configuration and startup validation — spec.md §6.
//!
//! Kept separate from `main.rs` so the mutual-exclusion and store-path
//! checks are unit-testable without touching a real listener or directory.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Grpc,
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub protocol: Protocol,
    pub addr: String,
    pub store_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("exactly one of --http or --grpc is required")]
    ProtocolNotExclusive,
    #[error("store path {0} exists and is not empty")]
    StorePathNotEmpty(PathBuf),
    #[error("invalid store path {0}: {1}")]
    StorePathInvalid(PathBuf, std::io::Error),
}

impl ServeConfig {
    /// Builds a validated config from raw CLI inputs. `http_addr`/`grpc_addr`
    /// must be mutually exclusive (exactly one `Some`); `store` must be
    /// empty or non-existent.
    pub fn build(
        http_addr: Option<String>,
        grpc_addr: Option<String>,
        store: PathBuf,
    ) -> Result<Self, ConfigError> {
        let (protocol, addr) = match (http_addr, grpc_addr) {
            (Some(addr), None) => (Protocol::Http, addr),
            (None, Some(addr)) => (Protocol::Grpc, addr),
            _ => return Err(ConfigError::ProtocolNotExclusive),
        };

        validate_store_path(&store)?;

        Ok(ServeConfig {
            protocol,
            addr,
            store_path: store,
        })
    }
}

/// The store directory must be empty or absent; it is never cleaned on
/// shutdown, so a directory with prior contents is rejected up front.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    match std::fs::read_dir(path) {
        Ok(mut entries) => {
            if entries.next().is_some() {
                return Err(ConfigError::StorePathNotEmpty(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ConfigError::StorePathInvalid(path.to_path_buf(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_both_protocols() {
        let err = ServeConfig::build(Some("127.0.0.1:8080".into()), Some("127.0.0.1:9090".into()), "/tmp/x".into());
        assert!(matches!(err, Err(ConfigError::ProtocolNotExclusive)));
    }

    #[test]
    fn rejects_neither_protocol() {
        let err = ServeConfig::build(None, None, "/tmp/x".into());
        assert!(matches!(err, Err(ConfigError::ProtocolNotExclusive)));
    }

    #[test]
    fn accepts_absent_store_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("store");
        let cfg = ServeConfig::build(Some("127.0.0.1:8080".into()), None, missing.clone()).unwrap();
        assert_eq!(cfg.protocol, Protocol::Http);
        assert_eq!(cfg.store_path, missing);
    }

    #[test]
    fn accepts_empty_existing_store_path() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServeConfig::build(None, Some("127.0.0.1:9090".into()), dir.path().to_path_buf()).unwrap();
        assert_eq!(cfg.protocol, Protocol::Grpc);
    }

    #[test]
    fn rejects_nonempty_store_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LOCK"), b"x").unwrap();
        let err = ServeConfig::build(Some("127.0.0.1:8080".into()), None, dir.path().to_path_buf());
        assert!(matches!(err, Err(ConfigError::StorePathNotEmpty(_))));
    }
}
