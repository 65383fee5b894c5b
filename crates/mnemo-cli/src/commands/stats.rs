use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_core::Reasoner;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_score};

#[derive(Parser)]
pub struct StatsCommand {}

impl StatsCommand {
    pub fn execute(&self, reasoner: &Reasoner, format: OutputFormat) -> CliResult<()> {
        let memory = reasoner.memory().stats();
        let rules = reasoner.rules();
        let rule_count = rules.rules().count();
        let fact_count = rules.facts().len();
        let history_count = rules.history().len();
        let total_rule_uses: u64 = rules.rules().map(|r| u64::from(r.usage_count)).sum();

        match format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "memory": memory,
                    "rules": {
                        "count": rule_count,
                        "total_uses": total_rule_uses,
                    },
                    "facts": fact_count,
                    "reasoning_history": history_count,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Table => {
                println!("Mnemo Statistics");
                println!("======================\n");

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Tier", "Count", "Capacity"]);

                table.add_row([
                    "Short-term",
                    &memory.short_term.to_string(),
                    &memory.short_term_capacity.to_string(),
                ]);
                table.add_row([
                    "Long-term",
                    &memory.long_term.to_string(),
                    &memory.long_term_capacity.to_string(),
                ]);
                table.add_row([
                    "Episodic",
                    &memory.episodic.to_string(),
                    &memory.episodic_capacity.to_string(),
                ]);

                println!("{table}\n");

                println!(
                    "Long-term: {} consolidated, mean importance {}",
                    memory.consolidated,
                    format_score(memory.mean_long_term_importance)
                );
                println!("Rules: {rule_count} ({total_rule_uses} applications)");
                println!("Facts: {fact_count}");
                println!("Reasoning history: {history_count} traces");
            }
        }

        Ok(())
    }
}
