use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finledger::cli::transactions::AddArgs;
use finledger::core::TransactionKind;
use finledger::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for finledger::AppCommand {
    fn from(cmd: Commands) -> finledger::AppCommand {
        match cmd {
            Commands::Add {
                kind,
                amount,
                category,
                description,
                date,
            } => finledger::AppCommand::Add(AddArgs {
                kind,
                amount,
                category,
                description,
                date,
            }),
            Commands::List { count } => finledger::AppCommand::List { count },
            Commands::Summary => finledger::AppCommand::Summary,
            Commands::Categories => finledger::AppCommand::Categories,
            Commands::Currency { code } => finledger::AppCommand::Currency { code },
            Commands::ResetMonth { yes } => finledger::AppCommand::ResetMonth { assume_yes: yes },
            Commands::ResetAll { yes } => finledger::AppCommand::ResetAll { assume_yes: yes },
            Commands::Chat => finledger::AppCommand::Chat,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Record an income or expense
    Add {
        /// income or expense
        kind: TransactionKind,
        /// Amount in the display currency
        amount: String,
        category: String,
        #[arg(short, long)]
        description: Option<String>,
        /// YYYY-MM-DD or RFC 3339; defaults to now
        #[arg(long)]
        date: Option<String>,
    },
    /// List transactions, newest entry first
    List {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Display this month's totals, recent activity and spending by category
    Summary,
    /// Show suggested categories
    Categories,
    /// Show available currencies, or select the display currency
    Currency { code: Option<String> },
    /// Delete this month's transactions
    ResetMonth {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every transaction
    ResetAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Talk to the financial assistant about your data
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => finledger::cli::setup::setup_at_path(path),
            None => finledger::cli::setup::setup(),
        },
        Some(cmd) => finledger::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
