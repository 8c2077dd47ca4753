// Host Profile (facts about the machine the operation runs on)

use serde::{Deserialize, Serialize};

/// OS name reported for Windows hosts
pub const WINDOWS: &str = "windows";

/// Host facts consumed by an operation
///
/// `shells` is in preference order: executor selection walks it front to back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    pub os: String,
    pub shells: Vec<String>,
    pub ip: String,
    pub hostname: String,
    pub user: String,
    pub path: String,
}

impl HostProfile {
    pub fn new(os: impl Into<String>, shells: Vec<String>, ip: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            shells,
            ip: ip.into(),
            hostname: "unknown".to_string(),
            user: "unknown".to_string(),
            path: String::new(),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == WINDOWS
    }

    pub fn has_shell(&self, shell: &str) -> bool {
        self.shells.iter().any(|s| s == shell)
    }
}
