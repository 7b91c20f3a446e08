use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use budgetmill::cli::{
    handle_budget_command, handle_category_command, handle_export_command,
    handle_report_command, handle_transaction_command,
};
use budgetmill::config::{paths::BudgetMillPaths, settings::Settings};
use budgetmill::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "budgetmill",
    version,
    about = "Track expenses and income, cap spending per category, see where the money goes",
    long_about = "BudgetMill records income and expense transactions against categories, \
                  tracks per-category budgets over weekly, monthly or yearly windows, \
                  and reports totals, category breakdowns and spending trends."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with the preset categories
    Init,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Category management commands
    #[command(subcommand)]
    Category(budgetmill::cli::CategoryCommands),

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(budgetmill::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(budgetmill::cli::BudgetCommands),

    /// Statistics reports
    #[command(subcommand)]
    Report(budgetmill::cli::ReportCommands),

    /// Export data to CSV or JSON
    #[command(subcommand)]
    Export(budgetmill::cli::ExportCommands),
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show paths and settings
    Show,
    /// Change a setting (currency, first-weekday, warning-percent, budget-period, date-format)
    Set { key: String, value: String },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_config(paths: &BudgetMillPaths, settings: &Settings) {
    println!("BudgetMill Configuration");
    println!("========================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Audit log:        {}", paths.audit_log().display());
    println!();
    println!("Settings:");
    println!("  currency:        {}", settings.currency_symbol);
    println!("  first-weekday:   {}", settings.first_weekday);
    println!("  warning-percent: {}", settings.budget_warning_percent);
    println!("  budget-period:   {}", settings.default_budget_period);
    println!("  date-format:     {}", settings.date_format);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // Initialize paths and settings
    let paths = BudgetMillPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "resolved paths");

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing BudgetMill at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths)?;
            settings.save(&paths)?;
            if seeded {
                println!("Initialization complete!");
                println!();
                println!("Preset categories have been created:");
                println!("  - Expense: Dining, Transport, Shopping, Entertainment, Medical,");
                println!("             Education, Housing, Other");
                println!("  - Income:  Salary, Bonus, Investment, Part-time, Other");
            } else {
                println!("Already initialized.");
            }
            println!();
            println!("Run 'budgetmill category list' to see all categories.");
        }
        Some(Commands::Config { action }) => match action {
            None | Some(ConfigAction::Show) => print_config(&paths, &settings),
            Some(ConfigAction::Set { key, value }) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
        },
        Some(Commands::Category(cmd)) => {
            let mut storage = Storage::open(paths)?;
            handle_category_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Txn(cmd)) => {
            let mut storage = Storage::open(paths)?;
            handle_transaction_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let mut storage = Storage::open(paths)?;
            handle_budget_command(&mut storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            let storage = Storage::open(paths)?;
            handle_export_command(&storage, &settings, cmd)?;
        }
        None => {
            println!("BudgetMill - expense and income tracking with category budgets");
            println!();
            println!("Run 'budgetmill --help' for usage information.");
        }
    }

    Ok(())
}
