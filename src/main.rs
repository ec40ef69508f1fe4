//! CLI entry point for key-remap-engine
//!
//! Provides a command-line interface for checking remap rules files for
//! conflicts and orphaned keys, and for listing parsed rules.

use clap::{Parser, Subcommand};
use colored::*;
use key_remap_engine::core::conflict::{orphaned_keys, RemapConflictDetector};
use key_remap_engine::core::parser::parse_rules_file;
use key_remap_engine::core::validator::validate_for_save;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "key-remap-engine")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a rules file for conflicts and orphaned keys
    Check {
        /// Path to the remap rules file
        #[arg(short, long, default_value = "~/.config/key-remap/remaps.conf")]
        rules: PathBuf,
    },

    /// List all rules in a file
    List {
        /// Path to the remap rules file
        #[arg(short, long, default_value = "~/.config/key-remap/remaps.conf")]
        rules: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { rules } => check_rules(&rules)?,
        Commands::List { rules } => list_rules(&rules)?,
    }

    Ok(())
}

/// Check a rules file for remap conflicts
fn check_rules(rules_path: &PathBuf) -> anyhow::Result<()> {
    // Expand tilde in path
    let expanded_path = shellexpand::tilde(
        rules_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    let path = std::path::Path::new(expanded_path.as_ref());

    // Read rules file
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))?;

    println!("{} Parsing rules: {}", "→".cyan(), path.display());

    let buffer = parse_rules_file(&content)?;

    println!("{} Found {} remap rules\n", "✓".green(), buffer.len());

    // Find conflicts
    let detector = RemapConflictDetector::from_buffer(&buffer);
    let conflicts = detector.find_conflicts();

    if conflicts.is_empty() {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
    } else {
        println!(
            "{} Found {} conflict{}:\n",
            "✗".red().bold(),
            conflicts.len(),
            if conflicts.len() == 1 { "" } else { "s" }
        );

        for (i, conflict) in conflicts.iter().enumerate() {
            let scope = if conflict.scope.is_empty() {
                "global".to_string()
            } else {
                conflict.scope.clone()
            };
            println!(
                "{} {} {}",
                format!("Conflict {}", i + 1).yellow().bold(),
                format!("{}", conflict.source).cyan(),
                format!("[{scope}]").dimmed(),
            );

            for index in &conflict.row_indices {
                if let Some(row) = buffer.row(*index) {
                    println!(
                        "  {} {}",
                        format!("{}.", index + 1).dimmed(),
                        format!("{row}").magenta(),
                    );
                }
            }
            println!();
        }
    }

    // Orphaned keys are a warning, not an error
    let orphans = orphaned_keys(&buffer);
    if !orphans.is_empty() {
        let names = orphans
            .iter()
            .map(|k| k.name())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{} Orphaned keys (nothing maps back to them): {}",
            "⚠".yellow(),
            names.yellow()
        );
    }

    if let Err(e) = validate_for_save(&buffer) {
        println!("\n{} {}", "✗".red().bold(), e.to_string().bold());
        std::process::exit(1);
    }

    println!("\nYour remappings are clean! ✓");

    Ok(())
}

/// List all rules in the file
fn list_rules(rules_path: &PathBuf) -> anyhow::Result<()> {
    // Expand tilde in path
    let expanded_path = shellexpand::tilde(
        rules_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    let path = std::path::Path::new(expanded_path.as_ref());

    // Read and parse
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file: {}", e))?;

    let buffer = parse_rules_file(&content)?;

    println!("{}", format!("Remap rules from: {}\n", path.display()).bold());

    let total = buffer.len();

    // Display each rule
    for row in buffer.rows() {
        let source = format!("{}", row.source).cyan().bold();
        let target = format!("{}", row.target).green();
        let scope = row
            .target_app
            .as_deref()
            .map(|app| format!(" [{app}]").dimmed().to_string())
            .unwrap_or_default();

        println!("{source} → {target}{scope}");
    }

    println!("\n{} Total: {} rules", "✓".green(), total);

    Ok(())
}
