use clap::Parser;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_core::Reasoner;

use crate::error::CliResult;
use crate::output::{OutputFormat, format_score, truncate_string};

#[derive(Parser)]
pub struct ReasonCommand {
    #[clap(help = "Query to reason about")]
    pub query: String,

    #[clap(long, short = 'd', help = "Maximum forward-chaining depth (defaults to config)")]
    pub max_depth: Option<usize>,

    #[clap(long, help = "Show every reasoning step, not just conclusions")]
    pub steps: bool,
}

impl ReasonCommand {
    pub fn execute(&self, reasoner: &mut Reasoner, format: OutputFormat) -> CliResult<()> {
        let max_depth = self.max_depth.unwrap_or(reasoner.config().max_depth);
        let trace = reasoner.reason_with_depth(&self.query, max_depth);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&trace)?);
            }
            OutputFormat::Table => {
                if trace.conclusions.is_empty() {
                    println!("No conclusions reached.");
                    return Ok(());
                }

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic);

                if self.steps {
                    table.set_header(["Kind", "Source", "Content", "Confidence", "Depth"]);
                    for step in &trace.steps {
                        table.add_row([
                            format!("{:?}", step.kind),
                            step.source.clone(),
                            truncate_string(&step.content, 60),
                            format_score(step.confidence),
                            step.depth.map_or_else(|| "-".to_string(), |d| d.to_string()),
                        ]);
                    }
                } else {
                    table.set_header(["#", "Conclusion"]);
                    for (i, conclusion) in trace.conclusions.iter().enumerate() {
                        table.add_row([(i + 1).to_string(), truncate_string(conclusion, 70)]);
                    }
                }

                println!("{table}");
                println!("\nConfidence: {}", format_score(trace.confidence));
            }
        }

        Ok(())
    }
}
