//! Run the three analysis drivers one after another.
//!
//! Each driver runs as a child process of the current executable, so a
//! driver that fails cannot leave state behind for the next one.

use std::ffi::OsString;

use anyhow::{Context, Result};
use console::style;
use tokio::process::Command;
use tracing::{debug, error};

use crate::cli::GlobalArgs;
use crate::output::print_success;

/// Drivers in execution order.
pub const DRIVERS: [&str; 3] = ["ideal", "noisy", "mitigation"];

/// Arguments for one child invocation: the global flags, then the driver.
pub fn child_args(driver: &str, global: &GlobalArgs) -> Vec<OsString> {
    let mut args = Vec::new();
    if global.verbose > 0 {
        args.push(OsString::from(format!("-{}", "v".repeat(global.verbose as usize))));
    }
    if let Some(config) = &global.config {
        args.push("--config".into());
        args.push(config.clone().into_os_string());
    }
    if let Some(dir) = &global.report_dir {
        args.push("--report-dir".into());
        args.push(dir.clone().into_os_string());
    }
    if let Some(seed) = global.seed {
        args.push("--seed".into());
        args.push(seed.to_string().into());
    }
    args.push(driver.into());
    args
}

/// Execute the orchestrator. The first failing driver ends the process
/// with status 1.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let exe = std::env::current_exe().context("Failed to locate the qgb executable")?;

    for driver in DRIVERS {
        println!("{}", style(format!("==== RUNNING: {driver} ====")).cyan().bold());
        let args = child_args(driver, global);
        debug!(driver, ?args, "spawning driver");

        let status = Command::new(&exe)
            .args(&args)
            .status()
            .await
            .with_context(|| format!("Failed to start {driver}"))?;

        if !status.success() {
            error!(driver, code = ?status.code(), "driver failed");
            eprintln!(
                "{}",
                style(format!("ERROR: an error occurred while running {driver}"))
                    .red()
                    .bold()
            );
            std::process::exit(1);
        }
        println!("{}", style(format!("==== FINISHED: {driver} ====")).green().bold());
        println!();
    }
    print_success("All drivers finished");
    Ok(())
}
