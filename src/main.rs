use std::io::Read;

use clap::{Parser, Subcommand};

use blockdiff::group::{group_entries, split_by_kind};
use blockdiff::render::format_grouped;

#[derive(Parser)]
#[command(name = "blockdiff")]
#[command(about = "Function and class level view of a unified diff")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show block-level changes from a patch file ("-" reads stdin)
    Patch {
        /// Path to a unified diff
        path: String,
        /// Only show function blocks
        #[arg(long, conflicts_with = "classes_only")]
        functions_only: bool,
        /// Only show class blocks
        #[arg(long)]
        classes_only: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Patch {
            path,
            functions_only,
            classes_only,
        } => {
            let patch_text = read_input(&path)?;
            let mut entries = blockdiff::block_entries(&patch_text)?;
            if functions_only || classes_only {
                let (functions, classes) = split_by_kind(entries);
                entries = if functions_only { functions } else { classes };
            }

            let grouped = group_entries(entries);
            if grouped.is_empty() {
                eprintln!("No block-level changes detected");
            } else {
                println!("{}", format_grouped(&grouped));
            }
        }
    }

    Ok(())
}

fn read_input(path: &str) -> Result<String, std::io::Error> {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}
