//! Environment readiness check for the exporter.
//!
//! Verifies a browser binary is reachable, the credential variables are
//! set, and the working directory is writable. Every failure includes a
//! fix instruction. Secrets are reported as set/not set only.

use crate::cli::output::{self, Styled};
use crate::config;
use anyhow::Result;

const BROWSER_BINARIES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

/// Run the doctor diagnostic. Exits non-zero when any check fails.
pub async fn run() -> Result<()> {
    let s = Styled::new();
    let mut ready = true;

    output::print_header(&s);

    output::print_section(&s, "Browser");
    match find_browser() {
        Some(path) => output::print_check(s.ok_sym(), "Chromium:", &path),
        None => {
            output::print_check(s.fail_sym(), "Chromium:", "NOT FOUND");
            output::print_detail("Fix: install Chromium or Google Chrome and put it on PATH.");
            ready = false;
        }
    }
    eprintln!();

    output::print_section(&s, "Credentials");
    for var in [config::EMAIL_VAR, config::PASSWORD_VAR, config::API_KEY_VAR] {
        if config::env_present(var) {
            output::print_check(s.ok_sym(), &format!("{var}:"), "set");
        } else {
            output::print_check(s.fail_sym(), &format!("{var}:"), "not set");
            output::print_detail(&format!("Fix: export {var}=..."));
            ready = false;
        }
    }
    eprintln!();

    output::print_section(&s, "Output");
    match writable_working_dir() {
        Ok(dir) => output::print_check(s.ok_sym(), "Directory:", &dir),
        Err(err) => {
            output::print_check(s.fail_sym(), "Directory:", &format!("not writable ({err})"));
            ready = false;
        }
    }

    if ready {
        output::print_status(&s, &s.green("ready"), "all checks passed");
        Ok(())
    } else {
        output::print_status(&s, &s.red("not ready"), "fix the failed checks above");
        std::process::exit(1);
    }
}

/// First browser binary findable on PATH.
fn find_browser() -> Option<String> {
    BROWSER_BINARIES
        .iter()
        .find_map(|name| which::which(name).ok())
        .map(|path| path.display().to_string())
}

/// Probe the working directory with a throwaway file.
fn writable_working_dir() -> Result<String> {
    let dir = std::env::current_dir()?;
    let probe = dir.join(".wordvault-doctor-probe");
    std::fs::write(&probe, b"probe")?;
    std::fs::remove_file(&probe).ok();
    Ok(dir.display().to_string())
}
