// Bounded subprocess execution shared by the shell services

use adversim_core::port::{ExecutionError, ShellKind};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Fail early if the host OS cannot run `kind`
pub(crate) fn ensure_supported(kind: ShellKind, host_os: &str) -> Result<(), ExecutionError> {
    if kind.supports_os(host_os) {
        return Ok(());
    }
    let required = match kind {
        ShellKind::Sh => "Unix",
        ShellKind::Cmd | ShellKind::PowerShell => "Windows",
    };
    Err(ExecutionError::UnsupportedOs {
        shell: kind.short_name().to_string(),
        required: required.to_string(),
        host: host_os.to_string(),
    })
}

/// Spawn `program args...` and wait at most `limit` for it
///
/// Returns stdout followed by stderr. A non-zero exit keeps that output in
/// the error. On expiry the child (and on Unix its whole process group) is
/// killed.
pub(crate) async fn run_bounded(
    kind: ShellKind,
    program: &str,
    args: &[String],
    limit: Duration,
) -> Result<String, ExecutionError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let child = command
        .spawn()
        .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", program, e)))?;
    let pid = child.id();

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => classify(kind, output),
        Ok(Err(e)) => Err(ExecutionError::Io(e.to_string())),
        Err(_) => {
            warn!(shell = %kind, pid = ?pid, timeout_ms = limit.as_millis() as u64, "Command timed out, killing");
            kill_group(pid);
            Err(ExecutionError::Timeout(limit))
        }
    }
}

fn classify(kind: ShellKind, output: Output) -> Result<String, ExecutionError> {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        debug!(shell = %kind, bytes = combined.len(), "Command succeeded");
        Ok(combined)
    } else {
        Err(ExecutionError::Failed {
            shell: kind.short_name().to_string(),
            status: output.status.code().unwrap_or(-1),
            output: combined,
        })
    }
}

#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pid) = pid else { return };
    // The child leads its own group (process_group(0)), so this reaches
    // anything the shell forked.
    if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
        debug!(pid = %pid, error = %e, "killpg failed (group already gone?)");
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {
    // kill_on_drop terminates the direct child
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_supported() {
        assert!(ensure_supported(ShellKind::Sh, "linux").is_ok());
        assert!(ensure_supported(ShellKind::Sh, "macos").is_ok());
        assert!(ensure_supported(ShellKind::Cmd, "windows").is_ok());

        let err = ensure_supported(ShellKind::PowerShell, "linux").unwrap_err();
        assert!(err.to_string().contains("only supported on Windows systems"));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_reported() {
        let result = run_bounded(
            ShellKind::Sh,
            "/definitely/not/a/shell",
            &[],
            Duration::from_secs(1),
        )
        .await;

        assert!(matches!(result, Err(ExecutionError::SpawnFailed(_))));
    }
}
