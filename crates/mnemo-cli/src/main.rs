use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mnemo_cli::commands::{
    ConfigCommand, FactCommand, MemoryCommand, ReasonCommand, RuleCommand, StatsCommand,
};
use mnemo_cli::error::CliResult;
use mnemo_cli::output::OutputFormat;
use mnemo_cli::state::{default_state_path, load_reasoner, save_reasoner};
use mnemo_core::Config;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mnemo")]
#[command(about = "Mnemo - tiered memory and rule-based reasoning from the command line")]
#[command(version)]
pub struct Cli {
    #[clap(long, short, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[clap(long, global = true, help = "Path to state file (default ~/.mnemo/state.json)")]
    pub state: Option<PathBuf>,

    #[clap(long, short = 'c', global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Memory commands")]
    Memory(MemoryCommand),

    #[clap(about = "Fact commands")]
    Fact(FactCommand),

    #[clap(about = "Rule commands")]
    Rule(RuleCommand),

    #[clap(about = "Reason about a query")]
    Reason(ReasonCommand),

    #[clap(about = "Show memory and rule statistics")]
    Stats(StatsCommand),

    #[clap(about = "Configuration commands")]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    init_logging();

    let cli = Cli::parse();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };

    let config = Config::load(cli.config.as_deref())?;
    let state_path = cli.state.clone().unwrap_or_else(default_state_path);

    let mut reasoner = match &cli.command {
        Command::Config(cmd) => return cmd.execute(&config, format),
        Command::Stats(cmd) => {
            let reasoner = load_reasoner(&state_path, &config).await?;
            return cmd.execute(&reasoner, format);
        }
        _ => load_reasoner(&state_path, &config).await?,
    };

    match &cli.command {
        Command::Memory(cmd) => cmd.execute(&mut reasoner, format)?,
        Command::Fact(cmd) => cmd.execute(&mut reasoner, format)?,
        Command::Rule(cmd) => cmd.execute(&mut reasoner, format)?,
        Command::Reason(cmd) => cmd.execute(&mut reasoner, format)?,
        Command::Stats(_) | Command::Config(_) => return Ok(()),
    }

    save_reasoner(&state_path, &reasoner).await
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mnemo_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
