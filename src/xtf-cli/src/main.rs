mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use config::Config;

const DEFAULT_LOG_FILTER: &str = "xtf=info";

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    init_tracing(cli.log.as_deref().or(config.log_filter.as_deref()));

    let mut options = config.scan;
    if let Some(policy) = cli.wide_samples {
        options = options.with_wide_samples(policy.into());
    }

    match cli.command {
        Commands::Info { input } => commands::info::handle(&input, &options, cli.json),
        Commands::Index { input, limit } => {
            if let Some(limit) = limit {
                options = options.with_max_records(limit);
            }
            commands::index::handle(&input, &options, cli.json)
        }
        Commands::Decode { input, offset } => {
            commands::decode::handle(&input, offset, &options, cli.json)
        }
    }
}

/// `--log` wins over `RUST_LOG`, which wins over the config file
fn init_tracing(filter: Option<&str>) {
    let env_filter = match filter {
        Some(filter) if std::env::var_os("RUST_LOG").is_none() => {
            tracing_subscriber::EnvFilter::new(filter)
        }
        _ => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
