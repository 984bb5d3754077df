//! Categorization rule CLI commands

use clap::Subcommand;

use crate::display::format_rule_list;
use crate::error::TallyResult;
use crate::models::category_rule::DEFAULT_PRIORITY;
use crate::services::RuleService;
use crate::storage::Storage;

/// Rule subcommands
#[derive(Subcommand, Debug)]
pub enum RuleCommands {
    /// List rules in the order they are tried
    List,

    /// Add a custom rule
    Add {
        /// Category to assign
        category: String,
        /// Regular expression matched against descriptions (case-insensitive)
        pattern: String,
        /// What the rule is for
        #[arg(short, long, default_value = "")]
        description: String,
        /// Higher priorities are tried first
        #[arg(short, long, default_value_t = DEFAULT_PRIORITY)]
        priority: i32,
    },

    /// Test a pattern against a description
    Test {
        /// Regular expression
        pattern: String,
        /// Description to match
        description: String,
    },
}

/// Handle a rules command
pub fn handle_rules_command(storage: &Storage, cmd: RuleCommands) -> TallyResult<()> {
    let service = RuleService::new(storage);

    match cmd {
        RuleCommands::List => {
            let engine = service.engine()?;
            println!("Categorization Rules");
            println!("{}", "=".repeat(40));
            print!("{}", format_rule_list(&engine.rules()));
        }

        RuleCommands::Add {
            category,
            pattern,
            description,
            priority,
        } => {
            let rule = service.add_rule(&category, &pattern, &description, priority)?;
            println!("Rule added: '{}' -> {} (priority {})", rule.pattern, rule.category, rule.priority);
        }

        RuleCommands::Test {
            pattern,
            description,
        } => {
            if service.test_rule(&pattern, &description)? {
                println!("Match: '{}' matches '{}'", pattern, description);
            } else {
                println!("No match: '{}' does not match '{}'", pattern, description);
            }
        }
    }

    Ok(())
}
