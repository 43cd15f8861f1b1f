//! Reference book CLI
//!
//! Command-line admin surface for the reference book catalog

use clap::{Parser, Subcommand};
use refbook_core::logging_facility::{self, Profile};
use std::path::PathBuf;

mod commands;

fn parse_log_format(s: &str) -> Result<Profile, String> {
    s.parse()
}

#[derive(Debug, Parser)]
#[command(name = "refbook")]
#[command(about = "Reference book catalog - versioned lookup tables", long_about = None)]
struct Cli {
    /// SQLite catalog file (created and migrated on first use)
    #[arg(long, global = true, env = "REFBOOK_DB", default_value = ".refbook/catalog.db")]
    db: PathBuf,

    /// Log output: dev (human-readable) or json
    #[arg(
        long,
        global = true,
        env = "REFBOOK_LOG_FORMAT",
        default_value = "dev",
        value_parser = parse_log_format
    )]
    log_format: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Seed import operations
    Seed(commands::seed::SeedArgs),
    /// Reference books
    Book(commands::book::BookArgs),
    /// Reference book versions
    Version(commands::version::VersionArgs),
    /// Reference book elements
    Element(commands::element::ElementArgs),
    /// Show the current version of a book
    Resolve(commands::resolve::ResolveArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format);

    let ctx = commands::CliContext::new(cli.db);
    let result = match cli.command {
        Commands::Seed(args) => commands::seed::execute(args, &ctx),
        Commands::Book(args) => commands::book::execute(args, &ctx),
        Commands::Version(args) => commands::version::execute(args, &ctx),
        Commands::Element(args) => commands::element::execute(args, &ctx),
        Commands::Resolve(args) => commands::resolve::execute(args, &ctx),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
