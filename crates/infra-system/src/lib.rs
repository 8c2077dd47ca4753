// adversim Infrastructure - System Adapters
// Implements: ExecutingService (sh, cmd, psh), RandomSource, host detection

pub mod cmd_service;
pub mod host_probe;
pub mod os_random;
pub mod powershell_service;
mod process;
pub mod sh_service;

pub use cmd_service::{tokenize_windows_command, CmdService};
pub use host_probe::HostProbe;
pub use os_random::OsRandom;
pub use powershell_service::PowerShellService;
pub use sh_service::ShService;

use adversim_core::port::{ExecutingService, ShellKind};
use std::sync::Arc;

/// Production executing service for a shell family
pub fn service_for(kind: ShellKind) -> Arc<dyn ExecutingService> {
    match kind {
        ShellKind::Sh => Arc::new(ShService::new()),
        ShellKind::Cmd => Arc::new(CmdService::new()),
        ShellKind::PowerShell => Arc::new(PowerShellService::new()),
    }
}
