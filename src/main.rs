//! mirror - list, summarize or export a directory tree as relative paths
//! and content snapshots.
//!
//! Usage:
//!   mirror [PATH]            List entries below PATH
//!   mirror list [PATH]       List entries (with --hash for content hashes)
//!   mirror stats [PATH]      Show counts and sizes
//!   mirror export [PATH]     Export the snapshot to JSON
//!   mirror --help            Show help

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use filemirror_core::{
    Content, EntryCounter, FileSnapshot, MirrorEntry, RelativePath, ScanError, WalkSummary,
};
use filemirror_scan::{JwalkWalker, PathTrackingVisitor, ScanConfig, SnapshotCollector};

#[derive(Parser)]
#[command(
    name = "mirror",
    version,
    about = "Mirror a directory tree as relative paths and content snapshots",
    long_about = "mirror walks a directory and reports every entry below it by its \
                  path relative to the root, along with a content snapshot (size, \
                  modification time and BLAKE3 hash) for each file."
)]
struct Cli {
    /// Directory to list (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    walk: WalkArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Clone)]
struct WalkArgs {
    /// Skip hidden entries (names starting with .)
    #[arg(long, global = true)]
    no_hidden: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long, global = true)]
    follow_symlinks: bool,

    /// Skip entries with this name, with their subtrees (supports prefix* and *suffix)
    #[arg(short, long = "ignore", global = true)]
    ignore: Vec<String>,

    /// Maximum depth to descend
    #[arg(short, long, global = true)]
    depth: Option<u32>,

    /// Threads used to read directories (0 = auto)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    threads: usize,
}

#[derive(Subcommand)]
enum Command {
    /// List every entry below the root
    List {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Show content hashes
        #[arg(long)]
        hash: bool,
    },

    /// Show counts and sizes
    Stats {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Export the snapshot as JSON
    Export {
        /// Directory to walk
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Command::List { path, hash }) => run_list(&path, &cli.walk, hash, true)?,
        Some(Command::Stats { path }) => run_stats(&path, &cli.walk)?,
        Some(Command::Export { path, output }) => run_export(&path, &cli.walk, output)?,
        None => run_list(&cli.path, &cli.walk, false, false)?,
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn scan_config(path: &Path, args: &WalkArgs, hash_contents: bool) -> Result<ScanConfig> {
    ScanConfig::builder()
        .root(path)
        .include_hidden(!args.no_hidden)
        .follow_symlinks(args.follow_symlinks)
        .ignore_patterns(args.ignore.clone())
        .max_depth(args.depth)
        .threads(args.threads)
        .hash_contents(hash_contents)
        .build()
        .map_err(ScanError::from)
        .context("Invalid walk options")
}

/// Print entries as they are reported, without collecting them.
fn run_list(path: &Path, args: &WalkArgs, show_hash: bool, show_size: bool) -> Result<()> {
    let config = scan_config(path, args, show_hash)?;

    let mut visitor = PathTrackingVisitor::new(
        |_: &Path, _: &str, rel: RelativePath<'_>, content: Content<FileSnapshot>| {
            print_entry(rel, &content, show_hash, show_size);
        },
    );
    let summary = JwalkWalker::new()
        .walk(&config, &mut visitor)
        .context("Walk failed")?;
    visitor.finish().context("Walker produced unbalanced traversal")?;

    report_warnings(&summary);
    Ok(())
}

fn print_entry(rel: RelativePath<'_>, content: &Content<FileSnapshot>, show_hash: bool, show_size: bool) {
    match content {
        Content::Directory => println!("{rel}/"),
        Content::File(snapshot) => {
            let mut line = rel.to_string();
            if show_size {
                line.push_str(&format!("  {}", format_size(snapshot.size)));
            }
            if show_hash {
                match snapshot.hash {
                    Some(hash) => line.push_str(&format!("  {hash}")),
                    None => line.push_str("  -"),
                }
            }
            println!("{line}");
        }
    }
}

/// Walk and print a summary.
fn run_stats(path: &Path, args: &WalkArgs) -> Result<()> {
    let config = scan_config(path, args, false)?;

    let mut visitor = PathTrackingVisitor::new(EntryCounter::new());
    let summary = JwalkWalker::new()
        .walk(&config, &mut visitor)
        .context("Walk failed")?;
    let counter = visitor.finish().context("Walker produced unbalanced traversal")?;

    println!();
    println!("{}", "─".repeat(60));
    println!(
        " {} - {}",
        summary.root_path.display(),
        format_size(summary.stats.total_size)
    );
    println!(
        " {} files, {} directories",
        counter.files, counter.directories
    );
    println!(" Max depth {}", counter.max_depth);
    if summary.stats.skipped > 0 {
        println!(" {} entries skipped", summary.stats.skipped);
    }
    println!(" Walked in {:.2}s", summary.duration.as_secs_f64());
    println!("{}", "─".repeat(60));

    report_warnings(&summary);
    Ok(())
}

#[derive(Serialize)]
struct Export<'a> {
    summary: &'a WalkSummary,
    entries: Vec<MirrorEntry<FileSnapshot>>,
}

/// Walk and export the collected snapshot as JSON.
fn run_export(path: &Path, args: &WalkArgs, output: Option<PathBuf>) -> Result<()> {
    let config = scan_config(path, args, true)?;

    eprintln!("Walking {}...", path.display());

    let mut visitor = PathTrackingVisitor::new(SnapshotCollector::new());
    let summary = JwalkWalker::new()
        .walk(&config, &mut visitor)
        .context("Walk failed")?;
    let collector = visitor.finish().context("Walker produced unbalanced traversal")?;

    let export = Export {
        summary: &summary,
        entries: collector.into_entries(),
    };
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(output_path) => {
            std::fs::write(&output_path, json)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            eprintln!("Exported to {}", output_path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

fn report_warnings(summary: &WalkSummary) {
    if summary.has_warnings() {
        eprintln!();
        eprintln!("{} warning(s) during walk", summary.warnings.len());
        for warning in &summary.warnings {
            tracing::info!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
        }
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
