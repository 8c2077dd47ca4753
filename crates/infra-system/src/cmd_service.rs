// Windows command shell executing service (`cmd.exe /C`)

use crate::process::{ensure_supported, run_bounded};
use adversim_core::port::{ExecutingService, ExecutionError, ShellKind};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info, trace};

/// Split a command line on whitespace, keeping double-quoted runs together
///
/// Quotes only toggle grouping and are not part of the tokens.
pub fn tokenize_windows_command(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in command.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Runs commands through `cmd.exe /C` on Windows hosts
pub struct CmdService {
    path: String,
    host_os: String,
}

impl CmdService {
    pub fn new() -> Self {
        Self::with_host_os(std::env::consts::OS)
    }

    pub fn with_host_os(host_os: impl Into<String>) -> Self {
        Self {
            path: "cmd.exe".to_string(),
            host_os: host_os.into(),
        }
    }
}

impl Default for CmdService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExecutingService for CmdService {
    async fn execute(&self, command: &str, timeout: Duration) -> Result<String, ExecutionError> {
        if let Err(e) = ensure_supported(ShellKind::Cmd, &self.host_os) {
            error!(error = %e, "Command execution failed: unsupported OS");
            return Err(e);
        }

        info!(
            command = %command,
            shell = "cmd",
            timeout_ms = timeout.as_millis() as u64,
            "Executing command"
        );
        let mut args = vec!["/C".to_string()];
        args.extend(tokenize_windows_command(command));
        trace!(args = ?args, "cmd arguments");

        run_bounded(ShellKind::Cmd, &self.path, &args, timeout).await
    }

    fn short_name(&self) -> &str {
        ShellKind::Cmd.short_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain() {
        assert_eq!(
            tokenize_windows_command("net  user   guest"),
            vec!["net", "user", "guest"]
        );
    }

    #[test]
    fn test_tokenize_quoted_run() {
        assert_eq!(
            tokenize_windows_command(r#"dir "C:\Program Files" /b"#),
            vec!["dir", r"C:\Program Files", "/b"]
        );
    }

    #[test]
    fn test_tokenize_splits_on_tabs_and_newlines() {
        assert_eq!(
            tokenize_windows_command("dir\t/b\r\n\"C:\\Program Files\""),
            vec!["dir", "/b", "C:\\Program Files"]
        );
        assert_eq!(tokenize_windows_command("echo \"a\tb\""), vec!["echo", "a\tb"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize_windows_command("   ").is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_windows_host() {
        let service = CmdService::with_host_os("linux");

        let result = service.execute("whoami", Duration::from_secs(1)).await;

        let err = tokio_test::assert_err!(result);
        assert!(err.to_string().contains("cmd is only supported on Windows systems"));
    }
}
