// Host probe - OS, shells, primary IP, host name, user
// reason: sysinfo for cross-platform host information

use adversim_core::domain::host::WINDOWS;
use adversim_core::domain::HostProfile;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::path::Path;
use sysinfo::System;
use tracing::{debug, warn};

/// Well-known shell locations, probed in this order
pub const SHELL_PATHS: &[&str] = &[
    "/bin/bash",
    "/bin/zsh",
    "/usr/bin/fish",
    "/bin/sh",
    "/usr/bin/pwsh",
    "/usr/bin/nu",
    r"C:\Windows\System32\cmd.exe",
    r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe",
];

/// Detects the facts an operation needs about the local machine
pub struct HostProbe {
    os: String,
}

impl HostProbe {
    pub fn new() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
        }
    }

    /// Probe the host; `ip_override` replaces the detected primary IPv4
    pub fn detect(&self, ip_override: Option<String>) -> HostProfile {
        let available: Vec<&str> = SHELL_PATHS
            .iter()
            .copied()
            .filter(|path| Path::new(path).exists())
            .collect();
        let shells = short_names(&available, &self.os);

        let ip = ip_override.unwrap_or_else(|| primary_ipv4().to_string());
        let mut profile = HostProfile::new(self.os.clone(), shells, ip);
        profile.hostname = System::host_name().unwrap_or_else(|| "unknown".to_string());
        profile.user = current_user();
        profile.path = std::env::var("PATH").unwrap_or_default();

        debug!(
            os = %profile.os,
            shells = ?profile.shells,
            ip = %profile.ip,
            hostname = %profile.hostname,
            "Host probed"
        );
        profile
    }
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new()
    }
}

/// Map shell paths to executor short names, first occurrence wins
pub fn short_names(paths: &[&str], os: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for path in paths {
        let lower = path.to_lowercase();
        let name = if os == WINDOWS {
            if lower.contains("powershell") {
                Some("psh")
            } else if lower.contains("cmd") {
                Some("cmd")
            } else {
                None
            }
        } else if lower.ends_with("sh") || lower.contains("/sh") {
            Some("sh")
        } else {
            None
        };

        if let Some(name) = name {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Address of the interface that would route outbound traffic
///
/// Connecting a UDP socket sends nothing; it only selects a route.
fn primary_ipv4() -> IpAddr {
    let detected = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .and_then(|socket| {
            socket.connect((Ipv4Addr::new(8, 8, 8, 8), 53))?;
            socket.local_addr()
        })
        .map(|addr| addr.ip());

    match detected {
        Ok(ip) if !ip.is_unspecified() => ip,
        Ok(_) => IpAddr::V4(Ipv4Addr::LOCALHOST),
        Err(e) => {
            warn!(error = %e, "No routable IPv4 address, using loopback");
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        }
    }
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
