// Console output

use adversim_core::application::Operation;
use adversim_core::domain::{HostProfile, LinkStatus};
use colored::Colorize;
use std::path::Path;

pub fn host(host: &HostProfile) {
    println!("{}", "Agent information:".blue().bold());
    println!("  {} {}", "[+] Operating System:".cyan(), host.os);
    println!("  {} {}", "[+] Host:".cyan(), host.hostname);
    println!("  {} {}", "[+] User:".cyan(), host.user);
    let shells = if host.shells.is_empty() {
        "none".red().to_string()
    } else {
        host.shells.join(", ")
    };
    println!("  {} {}", "[+] Shells:".cyan(), shells);
    println!("  {} {}", "[+] IP Address:".cyan(), host.ip);
}

pub fn summary(operation: &Operation, log_path: &Path) {
    let count = |status: LinkStatus| {
        operation
            .links()
            .iter()
            .chain(operation.cleanup_links())
            .filter(|l| l.status == status)
            .count()
    };

    println!("{}", format!("Operation '{}' finished", operation.name()).green().bold());
    let mode = if operation.is_autonomous() { "autonomous" } else { "manual" };
    println!("  {} {}", "Mode:".bold(), mode);
    println!("  {} {}", "Succeeded:".bold(), count(LinkStatus::Success).to_string().green());
    println!("  {} {}", "Failed:".bold(), count(LinkStatus::Error).to_string().red());
    println!("  {} {}", "Timed out:".bold(), count(LinkStatus::Timeout).to_string().yellow());
    let discarded = count(LinkStatus::Discard);
    if discarded > 0 {
        println!("  {} {}", "Discarded:".bold(), discarded.to_string().yellow());
    }
    println!("  {} {}", "Log:".bold(), log_path.display());
}

pub fn pending_cleanup(queued: usize, path: &Path, hint: &str) {
    if queued == 0 {
        return;
    }
    println!(
        "{}",
        format!("{} cleanup link(s) saved to {}; run `{}` to revert", queued, path.display(), hint).yellow()
    );
}
