pub mod commands;
pub mod error;
pub mod output;
pub mod state;

pub use commands::{
    ConfigCommand, FactCommand, MemoryCommand, ReasonCommand, RuleCommand, StatsCommand,
};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, format_score, format_timestamp, truncate_string};
