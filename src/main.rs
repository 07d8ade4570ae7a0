use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cmakelists_edit::{BlockCreationPolicy, FileBuffer, ListsFile, SortPolicy, StandardFileBuffer};
use colored::Colorize;
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cmakelists-edit")]
#[command(about = "Surgical editing of CMake listfiles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonOpts {
    /// Path to the CMakeLists.txt file
    #[arg(short, long)]
    file: PathBuf,

    /// CMake target to operate on
    #[arg(short, long)]
    target: String,

    /// Re-sort the touched section (paths first, then by name)
    #[arg(short, long)]
    sort: bool,

    /// Show what would change without writing the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show a unified diff of the changes
    #[arg(short, long)]
    diff: bool,

    /// Emit a JSON report on stdout
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add source files to a target
    Add {
        #[command(flatten)]
        common: CommonOpts,

        /// Fail instead of creating a target_sources statement when the
        /// target has none
        #[arg(long)]
        no_create: bool,

        /// Source files to add
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Remove source files from a target
    Remove {
        #[command(flatten)]
        common: CommonOpts,

        /// Source files to remove
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Rename one source file of a target
    Rename {
        #[command(flatten)]
        common: CommonOpts,

        /// Current file name
        from: String,

        /// New file name
        to: String,
    },
}

#[derive(Serialize)]
struct OperationReport {
    operation: &'static str,
    file_name: String,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct Report {
    file: PathBuf,
    target: String,
    dry_run: bool,
    changed: bool,
    operations: Vec<OperationReport>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Add {
            common,
            no_create,
            files,
        } => run(common, no_create, Operation::Add(files)),
        Commands::Remove { common, files } => run(common, false, Operation::Remove(files)),
        Commands::Rename { common, from, to } => run(common, false, Operation::Rename(from, to)),
    }
}

enum Operation {
    Add(Vec<String>),
    Remove(Vec<String>),
    Rename(String, String),
}

fn run(common: CommonOpts, no_create: bool, operation: Operation) -> Result<()> {
    let buffer = StandardFileBuffer::load(&common.file)
        .with_context(|| format!("could not read {}", common.file.display()))?;
    let original = String::from_utf8_lossy(buffer.content()).into_owned();

    let mut lists_file = ListsFile::new(buffer);
    if !lists_file.is_loaded() {
        let reason = lists_file
            .load_error()
            .map(|e| e.to_string())
            .unwrap_or_default();
        anyhow::bail!("could not parse {}: {}", common.file.display(), reason);
    }

    lists_file.set_sort_policy(if common.sort {
        SortPolicy::Sort
    } else {
        SortPolicy::NoSort
    });
    if no_create {
        lists_file.set_block_creation_policy(BlockCreationPolicy::NoCreate);
    }

    let mut operations = Vec::new();
    match &operation {
        Operation::Add(files) => {
            for file_name in files {
                let result = lists_file.add_source_file(&common.target, file_name);
                operations.push(report_operation("add", file_name, result));
            }
        }
        Operation::Remove(files) => {
            for file_name in files {
                let result = lists_file.remove_source_file(&common.target, file_name);
                operations.push(report_operation("remove", file_name, result));
            }
        }
        Operation::Rename(from, to) => {
            let result = lists_file.rename_source_file(&common.target, from, to);
            operations.push(report_operation("rename", &format!("{from} -> {to}"), result));
        }
    }

    let changed = lists_file.is_dirty();
    if changed {
        lists_file
            .save()
            .context("failed to regenerate the listfile")?;
    }

    let modified = String::from_utf8_lossy(lists_file.buffer().content()).into_owned();

    if common.diff && changed {
        display_diff(&common.file, &original, &modified);
    }

    if changed && !common.dry_run {
        lists_file
            .buffer()
            .save()
            .with_context(|| format!("could not write {}", common.file.display()))?;
    }

    let any_failed = operations.iter().any(|op| !op.ok);

    if common.json {
        let report = Report {
            file: common.file.clone(),
            target: common.target.clone(),
            dry_run: common.dry_run,
            changed,
            operations,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for op in &operations {
            if op.ok {
                println!("{} {} {}", "✓".green(), op.operation, op.file_name);
            } else {
                eprintln!(
                    "{} {} {}: {}",
                    "✗".red(),
                    op.operation,
                    op.file_name,
                    op.error.as_deref().unwrap_or("failed")
                );
            }
        }
        if changed && common.dry_run {
            println!("{}", "dry run: file not written".dimmed());
        }
    }

    if any_failed {
        std::process::exit(1);
    }

    Ok(())
}

fn report_operation(
    operation: &'static str,
    file_name: &str,
    result: std::result::Result<(), cmakelists_edit::EditError>,
) -> OperationReport {
    match result {
        Ok(()) => OperationReport {
            operation,
            file_name: file_name.to_string(),
            ok: true,
            error: None,
        },
        Err(error) => OperationReport {
            operation,
            file_name: file_name.to_string(),
            ok: false,
            error: Some(error.to_string()),
        },
    }
}

/// Show a unified diff between original and modified content.
fn display_diff(file: &std::path::Path, original: &str, modified: &str) {
    println!("\n{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (edited)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
