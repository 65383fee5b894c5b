use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_core::Reasoner;
use mnemo_core::rules::Fact;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_score, format_timestamp, truncate_string};

#[derive(Parser)]
pub struct FactCommand {
    #[clap(subcommand)]
    pub command: FactSubcommand,
}

#[derive(Subcommand)]
pub enum FactSubcommand {
    #[clap(about = "Assert a fact")]
    Add(AddArgs),

    #[clap(about = "List facts, optionally those matching a query")]
    List(ListArgs),
}

#[derive(Parser)]
pub struct AddArgs {
    #[clap(help = "Fact text")]
    pub text: String,

    #[clap(long, default_value = "1.0", help = "Confidence in [0, 1]")]
    pub confidence: f64,

    #[clap(long, short, default_value = "user", help = "Where the fact came from")]
    pub source: String,
}

#[derive(Parser)]
pub struct ListArgs {
    #[clap(help = "Only facts containing, or contained by, this text")]
    pub query: Option<String>,
}

impl FactCommand {
    pub fn execute(&self, reasoner: &mut Reasoner, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            FactSubcommand::Add(args) => Self::add(reasoner, args, format),
            FactSubcommand::List(args) => Self::list(reasoner, args, format),
        }
    }

    fn add(reasoner: &mut Reasoner, args: &AddArgs, format: OutputFormat) -> CliResult<()> {
        if !(0.0..=1.0).contains(&args.confidence) {
            return Err(format!("Confidence must be within [0, 1], got {}", args.confidence).into());
        }

        let added = reasoner.rules_mut().add_fact_with_source(
            args.text.as_str(),
            args.confidence,
            args.source.as_str(),
        );

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({ "added": added, "content": &args.text });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table if added => println!("Fact added: {}", args.text),
            OutputFormat::Table => println!("Fact already known: {}", args.text),
        }

        Ok(())
    }

    fn list(reasoner: &Reasoner, args: &ListArgs, format: OutputFormat) -> CliResult<()> {
        let facts: Vec<&Fact> = match &args.query {
            Some(query) => reasoner.rules().facts_matching(query),
            None => reasoner.rules().facts().iter().collect(),
        };

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&facts)?);
            }
            OutputFormat::Table => {
                if facts.is_empty() {
                    println!("No facts found.");
                    return Ok(());
                }

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Content", "Confidence", "Source", "Asserted"]);

                for fact in &facts {
                    table.add_row([
                        truncate_string(&fact.content, 60),
                        format_score(fact.confidence),
                        fact.source.clone(),
                        format_timestamp(&fact.timestamp),
                    ]);
                }

                println!("{table}");
                println!("\nTotal: {} facts", facts.len());
            }
        }

        Ok(())
    }
}
