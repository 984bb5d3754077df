use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tally::cli::{
    handle_add_command, handle_budget_command, handle_delete_command, handle_import_command,
    handle_list_command, handle_report_command, handle_rules_command, handle_search_command,
    AddArgs, BudgetCommands, ImportArgs, ListArgs, ReportArgs, RuleCommands,
};
use tally::config::{Settings, TallyPaths};
use tally::services::RuleService;
use tally::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "TALLY_LOG";

#[derive(Parser)]
#[command(
    name = "tally",
    version,
    about = "Terminal personal finance tracker",
    long_about = "Tally records income and expenses, categorizes them with regex rules, \
                  imports bank CSV exports and tracks budgets over custom date ranges. \
                  Run without a subcommand to open the interactive interface."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record an income or expense
    Add(AddArgs),

    /// List transactions, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search descriptions and categories
    Search {
        /// Case-insensitive text to look for
        query: String,
    },

    /// Delete a transaction by ID or short ID
    #[command(alias = "rm")]
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Income or expense breakdown by category
    Report(ReportArgs),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Import transactions from a bank CSV export
    Import(ImportArgs),

    /// Categorization rule commands
    #[command(subcommand)]
    Rules(RuleCommands),

    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_logging(interactive);

    let paths = TallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        None | Some(Commands::Tui) => tally::tui::run_tui(&storage, &settings)?,
        Some(Commands::Add(args)) => {
            let engine = RuleService::new(&storage).engine()?;
            handle_add_command(&storage, &settings, &engine, args)?;
        }
        Some(Commands::List(args)) => handle_list_command(&storage, &settings, args)?,
        Some(Commands::Search { query }) => handle_search_command(&storage, &settings, &query)?,
        Some(Commands::Delete { id }) => handle_delete_command(&storage, &settings, &id)?,
        Some(Commands::Report(args)) => handle_report_command(&storage, &settings, args)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Import(args)) => {
            let engine = RuleService::new(&storage).engine()?;
            handle_import_command(&storage, &settings, &engine, args)?;
        }
        Some(Commands::Rules(cmd)) => handle_rules_command(&storage, cmd)?,
        Some(Commands::Init) => {
            println!("Initializing Tally at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Settings written to {}", paths.settings_file().display());
            println!("Run 'tally add --help' to record your first transaction.");
        }
        Some(Commands::Config) => {
            println!("Tally Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Date format:            {}", settings.date_format);
            println!("  Budget warning at:      {}%", settings.budget_warning_percent);
            println!("  List limit:             {}", settings.list_limit);
            println!("  Import auto-categorize: {}", settings.import_auto_categorize);
            println!("  Import skip duplicates: {}", settings.import_skip_duplicates);
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `TALLY_LOG`
///
/// The TUI owns the terminal, so it stays silent unless a filter is set.
fn init_logging(interactive: bool) {
    let default = if interactive { "off" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
