//! Terminal output helpers shared by the drivers.

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a driver banner.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a section heading.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a labelled value.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Announce a written report file.
pub fn print_written(path: &Path) {
    println!(
        "{} wrote {}",
        style("✓").green().bold(),
        style(path.display()).cyan()
    );
}

/// Per-bin table of measured probabilities against a reference.
pub fn print_bins(measured: &[f64], reference: &[f64]) {
    println!(
        "  {:>4}  {:>9}  {:>9}  {:>9}",
        style("bin").bold(),
        style("measured").bold(),
        style("expected").bold(),
        style("|Δ|").bold()
    );
    for (k, (&m, &e)) in measured.iter().zip(reference).enumerate() {
        let delta = (m - e).abs();
        let delta = if delta > 0.03 {
            style(format!("{delta:>9.4}")).red()
        } else {
            style(format!("{delta:>9.4}")).green()
        };
        let bar = "█".repeat((m * 50.0).round() as usize);
        println!("  {k:>4}  {m:>9.4}  {e:>9.4}  {delta}  {}", style(bar).green());
    }
}

/// A steady spinner for a long simulation.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let template = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(template);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
