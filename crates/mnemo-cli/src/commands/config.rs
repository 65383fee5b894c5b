use clap::{Parser, Subcommand};
use mnemo_core::Config;
use mnemo_core::config::EVICTION_POLICY_VERSION;

use crate::error::CliResult;
use crate::output::OutputFormat;

#[derive(Parser)]
pub struct ConfigCommand {
    #[clap(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    #[clap(about = "Show the effective configuration")]
    Show,
}

impl ConfigCommand {
    pub fn execute(&self, config: &Config, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            ConfigSubcommand::Show => Self::show(config, format),
        }
    }

    fn show(config: &Config, format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "eviction_policy_version": EVICTION_POLICY_VERSION,
                    "config": config,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("# eviction policy v{EVICTION_POLICY_VERSION}");
                print!("{}", toml::to_string_pretty(config)?);
            }
        }

        Ok(())
    }
}
