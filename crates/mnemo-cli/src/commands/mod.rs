pub mod config;
pub mod fact;
pub mod memory;
pub mod reason;
pub mod rule;
pub mod stats;

pub use config::ConfigCommand;
pub use fact::FactCommand;
pub use memory::MemoryCommand;
pub use reason::ReasonCommand;
pub use rule::RuleCommand;
pub use stats::StatsCommand;
