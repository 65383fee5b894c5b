use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use mnemo_core::Reasoner;
use mnemo_core::rules::{Rule, RuleSpec, Template};

use crate::error::CliResult;
use crate::output::{OutputFormat, format_score, format_timestamp, truncate_string};

#[derive(Parser)]
pub struct RuleCommand {
    #[clap(subcommand)]
    pub command: RuleSubcommand,
}

#[derive(Subcommand)]
pub enum RuleSubcommand {
    #[clap(about = "Add or replace a rule")]
    Add(AddArgs),

    #[clap(about = "List rules")]
    List,

    #[clap(about = "Remove a rule")]
    Remove(RemoveArgs),
}

#[derive(Parser)]
pub struct AddArgs {
    #[clap(help = "Rule name")]
    pub name: String,

    #[clap(
        long,
        short,
        required = true,
        help = "Pattern template such as 'if {A} then {B}' (repeatable; the first one binds variables)"
    )]
    pub pattern: Vec<String>,

    #[clap(long, help = "Conclusion template such as '{B}'")]
    pub conclusion: String,

    #[clap(long, default_value = "1.0", help = "Confidence in [0, 1]")]
    pub confidence: f64,
}

#[derive(Parser)]
pub struct RemoveArgs {
    #[clap(help = "Rule name")]
    pub name: String,
}

impl RuleCommand {
    pub fn execute(&self, reasoner: &mut Reasoner, format: OutputFormat) -> CliResult<()> {
        match &self.command {
            RuleSubcommand::Add(args) => Self::add(reasoner, args, format),
            RuleSubcommand::List => Self::list(reasoner, format),
            RuleSubcommand::Remove(args) => Self::remove(reasoner, args, format),
        }
    }

    fn add(reasoner: &mut Reasoner, args: &AddArgs, format: OutputFormat) -> CliResult<()> {
        if !(0.0..=1.0).contains(&args.confidence) {
            return Err(format!("Confidence must be within [0, 1], got {}", args.confidence).into());
        }
        // The engine stores templates unchecked, so validate them here
        for pattern in &args.pattern {
            Template::compile(pattern).map_err(mnemo_core::MnemoError::from)?;
        }

        let spec = RuleSpec::new(
            args.pattern.iter().cloned(),
            args.conclusion.as_str(),
            args.confidence,
        );
        reasoner.rules_mut().add_rule(args.name.as_str(), spec);

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&reasoner.rules().rule(&args.name))?);
            }
            OutputFormat::Table => println!("Rule '{}' added", args.name),
        }

        Ok(())
    }

    fn list(reasoner: &Reasoner, format: OutputFormat) -> CliResult<()> {
        let rules: Vec<&Rule> = reasoner.rules().rules().collect();

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&rules)?);
            }
            OutputFormat::Table => {
                if rules.is_empty() {
                    println!("No rules defined.");
                    return Ok(());
                }

                let mut table = Table::new();
                table
                    .load_preset(UTF8_FULL_CONDENSED)
                    .set_content_arrangement(ContentArrangement::Dynamic)
                    .set_header(["Name", "Patterns", "Conclusion", "Confidence", "Uses", "Created"]);

                for rule in &rules {
                    table.add_row([
                        rule.name.clone(),
                        truncate_string(&rule.pattern.join(" | "), 50),
                        truncate_string(&rule.conclusion, 30),
                        format_score(rule.confidence),
                        rule.usage_count.to_string(),
                        format_timestamp(&rule.created_at),
                    ]);
                }

                println!("{table}");
                println!("\nTotal: {} rules", rules.len());
            }
        }

        Ok(())
    }

    fn remove(reasoner: &mut Reasoner, args: &RemoveArgs, format: OutputFormat) -> CliResult<()> {
        let removed = reasoner
            .rules_mut()
            .remove_rule(&args.name)
            .ok_or_else(|| format!("Rule not found: {}", args.name))?;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&removed)?);
            }
            OutputFormat::Table => println!("Rule '{}' removed", removed.name),
        }

        Ok(())
    }
}
