//! CLI command implementations

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{LinkmapError, Result};
use crate::services::ShortenerService;

pub fn shorten(service: &ShortenerService, urls: &[String]) -> Result<()> {
    for url in urls {
        let code = service.shorten(url)?;
        println!("{} {} -> {}", "✓".bold().green(), code.cyan(), url.blue().underline());
    }
    Ok(())
}

pub fn resolve(service: &ShortenerService, code: &str) -> Result<()> {
    let url = service.resolve(code)?;
    println!("{}", url);
    Ok(())
}

pub fn stats(service: &ShortenerService) {
    let stats = service.stats();
    println!("{}", "Store statistics".bold());
    println!("  {:<10} {}", "entries:", stats.entries.to_string().cyan());
    println!("  {:<10} {}", "backend:", stats.backend.magenta());
}

/// Print a sample configuration, or write it to `output`.
pub fn generate_config(output: Option<String>) -> Result<()> {
    match output {
        None => {
            print!("{}", StaticConfig::generate_sample_config());
            Ok(())
        }
        Some(path) => {
            StaticConfig::default()
                .save_to_file(&path)
                .map_err(|e| LinkmapError::file_operation(format!("{}: {}", path, e)))?;
            println!(
                "{} {}",
                "Configuration file generated:".green(),
                path.blue()
            );
            Ok(())
        }
    }
}
