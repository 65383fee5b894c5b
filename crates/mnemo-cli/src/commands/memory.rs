use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_core::Reasoner;
use mnemo_core::memory::{Payload, Tier, TierFilter};
use uuid::Uuid;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_score, format_timestamp, truncate_string};

#[derive(Parser)]
pub struct MemoryCommand {
    #[clap(subcommand)]
    pub command: MemorySubcommand,
}

#[derive(Subcommand)]
pub enum MemorySubcommand {
    #[clap(about = "Add a memory to a tier")]
    Add(AddArgs),

    #[clap(about = "Search memories by lexical relevance")]
    Recall(RecallArgs),

    #[clap(about = "List the contents of a tier")]
    List(ListArgs),

    #[clap(about = "Decay idle long-term memories and purge faded ones")]
    Decay,

    #[clap(about = "Remove memories")]
    Clear(ClearArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TierArg {
    Short,
    Long,
    Episodic,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Short => Tier::ShortTerm,
            TierArg::Long => Tier::LongTerm,
            TierArg::Episodic => Tier::Episodic,
        }
    }
}

#[derive(Parser)]
pub struct AddArgs {
    #[clap(help = "Memory content text")]
    pub text: String,

    #[clap(long, short, value_enum, default_value = "short", help = "Target tier")]
    pub tier: TierArg,

    #[clap(long, short, help = "Long-term key (defaults to a fresh UUID)")]
    pub key: Option<String>,

    #[clap(long, short, help = "Importance in [0, 1] (defaults to a keyword heuristic)")]
    pub importance: Option<f64>,

    #[clap(long, help = "Parse the text as a JSON value")]
    pub structured: bool,
}

#[derive(Parser)]
pub struct RecallArgs {
    #[clap(help = "Query text")]
    pub query: String,

    #[clap(
        long,
        short,
        default_value = "all",
        help = "Tier to search (all, short_term, long_term, episodic)"
    )]
    pub tier: TierFilter,

    #[clap(long, short, default_value = "10", help = "Maximum number of results")]
    pub limit: usize,
}

#[derive(Parser)]
pub struct ListArgs {
    #[clap(long, short, value_enum, default_value = "long", help = "Tier to list")]
    pub tier: TierArg,
}

#[derive(Parser)]
pub struct ClearArgs {
    #[clap(
        long,
        short,
        default_value = "all",
        help = "Tier to clear (all, short_term, long_term, episodic)"
    )]
    pub tier: TierFilter,
}

impl MemoryCommand {
    pub fn execute(&self, reasoner: &mut Reasoner, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            MemorySubcommand::Add(args) => Self::add(reasoner, args, format),
            MemorySubcommand::Recall(args) => Self::recall(reasoner, args, format),
            MemorySubcommand::List(args) => Self::list(reasoner, args, format),
            MemorySubcommand::Decay => Self::decay(reasoner, format),
            MemorySubcommand::Clear(args) => Self::clear(reasoner, args, format),
        }
    }

    fn add(reasoner: &mut Reasoner, args: &AddArgs, format: OutputFormat) -> CliResult<()> {
        if let Some(importance) = args.importance {
            if !(0.0..=1.0).contains(&importance) {
                return Err(format!("Importance must be within [0, 1], got {importance}").into());
            }
        }

        let content: Payload = if args.structured {
            serde_json::from_str::<serde_json::Value>(&args.text)?.into()
        } else {
            args.text.as_str().into()
        };

        let tier = Tier::from(args.tier);
        let memory = reasoner.memory_mut();
        let (id, key) = match tier {
            Tier::ShortTerm => {
                let id = match args.importance {
                    Some(importance) => memory.add_to_short_term_with_importance(content, importance),
                    None => memory.add_to_short_term(content),
                };
                (id.to_string(), None)
            }
            Tier::LongTerm => {
                let key = args.key.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                let key = match args.importance {
                    Some(importance) => {
                        memory.add_to_long_term_with_importance(key, content, importance)
                    }
                    None => memory.add_to_long_term(key, content),
                };
                let id = memory
                    .get(&key)
                    .map(|item| item.id.to_string())
                    .unwrap_or_default();
                (id, Some(key))
            }
            Tier::Episodic => {
                if args.importance.is_some() {
                    return Err("Episodic importance is derived from the event text".into());
                }
                (memory.add_episodic_memory(content).to_string(), None)
            }
        };

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "tier": tier,
                    "id": id,
                    "key": key,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => match key {
                Some(key) => println!("Added to {tier} as '{key}'"),
                None => println!("Added to {tier}: {id}"),
            },
        }

        Ok(())
    }

    fn recall(reasoner: &mut Reasoner, args: &RecallArgs, format: OutputFormat) -> CliResult<()> {
        let mut results = reasoner.memory_mut().recall(&args.query, args.tier);
        results.truncate(args.limit);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            OutputFormat::Table => {
                if results.is_empty() {
                    println!("No memories matched.");
                    return Ok(());
                }

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Tier", "Key", "Content", "Relevance", "Importance", "Created"]);

                for result in &results {
                    table.add_row([
                        result.tier.to_string(),
                        result.key.clone().unwrap_or_else(|| "-".to_string()),
                        truncate_string(&result.content.to_string(), 50),
                        format_score(result.relevance),
                        format_score(result.importance),
                        format_timestamp(&result.timestamp),
                    ]);
                }

                println!("{table}");
                println!("\nTotal: {} results", results.len());
            }
        }

        Ok(())
    }

    fn list(reasoner: &Reasoner, args: &ListArgs, format: OutputFormat) -> CliResult<()> {
        let memory = reasoner.memory();
        let tier = Tier::from(args.tier);

        match format {
            OutputFormat::Json => {
                let output = match tier {
                    Tier::ShortTerm => serde_json::to_value(memory.short_term())?,
                    Tier::LongTerm => {
                        let mut entries: Vec<_> = memory.long_term().iter().collect();
                        entries.sort_by(|a, b| a.0.cmp(b.0));
                        serde_json::to_value(entries)?
                    }
                    Tier::Episodic => serde_json::to_value(memory.episodes())?,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic);

                match tier {
                    Tier::ShortTerm => {
                        table.set_header(["ID", "Content", "Importance", "Created"]);
                        for item in memory.short_term() {
                            table.add_row([
                                truncate_string(&item.id.to_string(), 8),
                                truncate_string(&item.content.to_string(), 50),
                                format_score(item.importance),
                                format_timestamp(&item.created_at),
                            ]);
                        }
                    }
                    Tier::LongTerm => {
                        table.set_header([
                            "Key",
                            "Content",
                            "Importance",
                            "Accesses",
                            "Consolidated",
                            "Last Access",
                        ]);
                        let mut entries: Vec<_> = memory.long_term().iter().collect();
                        entries.sort_by(|a, b| a.0.cmp(b.0));
                        for (key, item) in entries {
                            table.add_row([
                                truncate_string(key, 20),
                                truncate_string(&item.content.to_string(), 50),
                                format_score(item.importance),
                                item.access_count.to_string(),
                                if item.consolidated { "yes" } else { "no" }.to_string(),
                                format_timestamp(&item.last_access),
                            ]);
                        }
                    }
                    Tier::Episodic => {
                        table.set_header(["Event", "Topics", "Importance", "When"]);
                        for episode in memory.episodes() {
                            table.add_row([
                                truncate_string(&episode.event.to_string(), 50),
                                episode.context.active_topics.join(", "),
                                format_score(episode.importance),
                                format_timestamp(&episode.timestamp),
                            ]);
                        }
                    }
                }

                println!("{table}");
                println!("\nTotal: {} memories in {tier}", memory.len(tier));
            }
        }

        Ok(())
    }

    fn decay(reasoner: &mut Reasoner, format: OutputFormat) -> CliResult<()> {
        let report = reasoner.memory_mut().apply_decay();

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Table => {
                println!("Decayed: {}", report.decayed);
                println!("Purged:  {}", report.purged.len());
                for key in &report.purged {
                    println!("  - {key}");
                }
            }
        }

        Ok(())
    }

    fn clear(reasoner: &mut Reasoner, args: &ClearArgs, format: OutputFormat) -> CliResult<()> {
        reasoner.memory_mut().clear(args.tier);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "cleared": true }));
            }
            OutputFormat::Table => println!("Memories cleared."),
        }

        Ok(())
    }
}
