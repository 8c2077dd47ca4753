// POSIX shell executing service (`sh -c`)

use crate::process::{ensure_supported, run_bounded};
use adversim_core::port::{ExecutingService, ExecutionError, ShellKind};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

/// Runs commands through `sh -c` on Unix-like hosts
pub struct ShService {
    path: String,
    host_os: String,
}

impl ShService {
    pub fn new() -> Self {
        Self::with_host_os(std::env::consts::OS)
    }

    /// Service gated against an explicit host OS name
    pub fn with_host_os(host_os: impl Into<String>) -> Self {
        Self {
            path: "sh".to_string(),
            host_os: host_os.into(),
        }
    }
}

impl Default for ShService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutingService for ShService {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, ExecutionError> {
        if let Err(e) = ensure_supported(ShellKind::Sh, &self.host_os) {
            error!(error = %e, "Command execution failed: unsupported OS");
            return Err(e);
        }

        info!(
            command = %command,
            shell = "sh",
            timeout_ms = timeout.as_millis() as u64,
            "Executing command"
        );
        let args = vec!["-c".to_string(), command.to_string()];
        run_bounded(ShellKind::Sh, &self.path, &args, timeout).await
    }

    fn short_name(&self) -> &str {
        ShellKind::Sh.short_name()
    }
}
