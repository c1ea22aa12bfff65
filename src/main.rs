use anyhow::Context;
use clap::Parser;

use linkmap::cli::{self, Cli, Commands};
use linkmap::config::{get_config, install_config};
use linkmap::errors::LinkmapError;
use linkmap::system::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Cli::parse();
    install_config(args.load_config());
    let config = get_config();

    // Keep stdout clean for `config generate`
    let guard = if matches!(args.command, Commands::Config { .. }) {
        None
    } else {
        Some(init_logging(&config.logging).context("Failed to initialize logging")?)
    };

    let result = cli::run(args.command, &config).await;
    drop(guard);

    if let Err(e) = result {
        eprintln!("{}", e.format_colored());
        let exit_code = match e {
            LinkmapError::NotFound(_) => 2,
            _ => 1,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}
