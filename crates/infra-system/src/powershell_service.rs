// Windows PowerShell executing service

use crate::process::{ensure_supported, run_bounded};
use adversim_core::port::{ExecutingService, ExecutionError, ShellKind};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

const EXEC_ARGS: [&str; 3] = ["-ExecutionPolicy", "Bypass", "-Command"];

/// Runs commands through `powershell -ExecutionPolicy Bypass -Command`
pub struct PowerShellService {
    path: String,
    host_os: String,
}

impl PowerShellService {
    pub fn new() -> Self {
        Self::with_host_os(std::env::consts::OS)
    }

    pub fn with_host_os(host_os: impl Into<String>) -> Self {
        Self {
            path: "powershell".to_string(),
            host_os: host_os.into(),
        }
    }
}

impl Default for PowerShellService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutingService for PowerShellService {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, ExecutionError> {
        if let Err(e) = ensure_supported(ShellKind::PowerShell, &self.host_os) {
            error!(error = %e, "Command execution failed: unsupported OS");
            return Err(e);
        }

        info!(
            command = %command,
            shell = "psh",
            timeout_ms = timeout.as_millis() as u64,
            "Executing command"
        );
        let mut args: Vec<String> = EXEC_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(command.to_string());

        let output = run_bounded(ShellKind::PowerShell, &self.path, &args, timeout).await?;
        Ok(trim_output(&output).to_string())
    }

    fn short_name(&self) -> &str {
        ShellKind::PowerShell.short_name()
    }
}

/// Strip the trailing blanks and line breaks PowerShell appends to output
pub fn trim_output(output: &str) -> &str {
    output.trim_end_matches([' ', '\n', '\r'])
}
