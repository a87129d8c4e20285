//! Quantum Galton board command-line interface.
//!
//! ```text
//!              ●
//!             ╱ ╲
//!            ●   ●
//!           ╱ ╲ ╱ ╲
//!          ●   ●   ●
//!         ╱ ╲ ╱ ╲ ╱ ╲
//!        ▁▁▁ ▁▁▁ ▁▁▁ ▁▁▁
//!        ▇▇▇ ███ ███ ▇▇▇
//!
//!             Q G B
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use qgb_cli::commands::{all, build, compare, diagram, ideal, mitigation, noisy};
use qgb_cli::{Cli, Commands};

fn log_filter(verbose: u8, configured: Option<&str>) -> EnvFilter {
    if let Some(directive) = configured {
        return EnvFilter::new(directive);
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::new(level)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.driver_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            cli.global.verbose,
            config.as_ref().and_then(|c| c.log_level.as_deref()),
        ))
        .with_target(false)
        .init();

    match (cli.command, config) {
        (
            Commands::Build {
                layers,
                angle,
                no_measure,
                json,
            },
            _,
        ) => build::execute(layers, angle, !no_measure, json),
        (Commands::All, _) => all::execute(&cli.global).await,
        (Commands::Ideal { .. }, Some(config)) => ideal::execute(&config).await,
        (Commands::Noisy { .. }, Some(config)) => noisy::execute(&config).await,
        (Commands::Mitigation { .. }, Some(config)) => mitigation::execute(&config).await,
        (Commands::Compare { .. }, Some(config)) => compare::execute(&config).await,
        (Commands::Diagram { .. }, Some(config)) => diagram::execute(&config),
        (command, None) => anyhow::bail!("no configuration resolved for {command:?}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
