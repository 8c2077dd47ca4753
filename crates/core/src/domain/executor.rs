// Executor Domain Model (per-shell capability descriptor)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default command timeout when an executor does not declare one (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Shell-specific command and cleanup templates of an ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Executor {
    /// Shell short name (sh, cmd, psh)
    pub name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub payloads: Vec<String>,
    #[serde(default, rename = "upload", alias = "uploads")]
    pub uploads: Vec<String>,
    /// Timeout in whole seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout: u64,
    /// Cleanup templates in authored order
    #[serde(default)]
    pub cleanup: Vec<String>,
}

impl Executor {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            platform: String::new(),
            command: command.into(),
            code: String::new(),
            payloads: Vec::new(),
            uploads: Vec::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
            cleanup: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = secs;
        self
    }

    pub fn with_cleanup(mut self, cleanup: Vec<String>) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_absent() {
        let executor: Executor = serde_json::from_value(serde_json::json!({
            "name": "sh",
            "command": "whoami"
        }))
        .unwrap();

        assert_eq!(executor.timeout, DEFAULT_TIMEOUT_SECS);
        assert!(executor.cleanup.is_empty());
        assert!(executor.uploads.is_empty());
    }

    #[test]
    fn test_uploads_accepts_both_spellings() {
        let a: Executor =
            serde_json::from_value(serde_json::json!({"name": "sh", "uploads": ["a.bin"]}))
                .unwrap();
        let b: Executor =
            serde_json::from_value(serde_json::json!({"name": "sh", "upload": ["a.bin"]}))
                .unwrap();

        assert_eq!(a.uploads, b.uploads);
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("upload").is_some());
    }
}
