//! Seed import command
//!
//! Usage: refbook seed import <PATH>

use clap::{Args, Subcommand};
use refbook_engine::{apply_engine_command, EngineCommand, EngineCommandResult};
use std::path::PathBuf;

use super::{CliContext, CliResult};

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[command(subcommand)]
    pub command: SeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum SeedCommand {
    /// Import a seed file (or every .yaml/.yml file in a directory)
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to seed YAML file or directory
    pub path: PathBuf,
}

/// Execute seed command
pub fn execute(args: SeedArgs, ctx: &CliContext) -> CliResult {
    match args.command {
        SeedCommand::Import(import_args) => execute_import(import_args, ctx),
    }
}

fn execute_import(args: ImportArgs, ctx: &CliContext) -> CliResult {
    let mut conn = ctx.open()?;

    let seed_files = if args.path.is_dir() {
        // sorted for determinism
        let mut files: Vec<PathBuf> = std::fs::read_dir(&args.path)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        files
    } else {
        vec![args.path]
    };

    for seed_file in seed_files {
        println!("Importing {}...", seed_file.display());
        let result = apply_engine_command(
            EngineCommand::SeedImport {
                path: seed_file.clone(),
            },
            &mut conn,
        )?;
        if let EngineCommandResult::SeedImport(summary) = result {
            println!(
                "Imported {} books, {} versions, {} elements ({} created, {} updated; digest: {})",
                summary.books,
                summary.versions,
                summary.elements,
                summary.created,
                summary.updated,
                summary.seed_digest
            );
        }
    }

    Ok(())
}
