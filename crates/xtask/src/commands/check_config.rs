//! Validate tactics configuration files
//!
//! Loads a TOML configuration, reports every value the runtime would clamp,
//! and exits with an error when strict validation fails.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use tactics_content::ConfigLoader;
use tactics_core::TacticsConfig;

use crate::utils;

/// Validate a tactics configuration file
#[derive(Parser)]
pub struct CheckConfig {
    /// Configuration file (TOML). Relative names are looked up in the data directory
    #[arg(value_name = "FILE", default_value = "config.toml")]
    path: PathBuf,

    /// Print the built-in defaults as TOML instead of checking a file
    #[arg(long)]
    print_defaults: bool,

    /// Print the effective (sanitized) configuration after the report
    #[arg(long)]
    print: bool,
}

impl CheckConfig {
    pub fn execute(self) -> Result<()> {
        if self.print_defaults {
            print!("{}", ConfigLoader::to_toml(&TacticsConfig::default())?);
            return Ok(());
        }

        let path = utils::resolve(&self.path);
        let config = ConfigLoader::load(&path)?;

        println!("{} {}", style("Config File:").bold().cyan(), path.display());
        println!("{} {}", style("Seed:").bold().cyan(), config.seed);
        println!();

        let (effective, adjustments) = config.sanitized();
        if adjustments.is_empty() {
            println!("{}", style("No adjustments needed").green());
        } else {
            println!("{}", style("Adjusted at load time:").bold().yellow());
            for adjustment in &adjustments {
                println!("  {}", adjustment);
            }
        }

        if self.print {
            println!();
            println!("{}", style("=== Effective Configuration ===").bold().green());
            print!("{}", ConfigLoader::to_toml(&effective)?);
        }

        config
            .validate()
            .with_context(|| format!("Invalid configuration: {}", path.display()))?;
        println!();
        println!("{}", style("Configuration is valid").bold().green());
        Ok(())
    }
}
