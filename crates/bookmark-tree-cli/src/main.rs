mod tree;

use anyhow::{Context, Result};
use bookmark_tree_config::Config;
use bookmark_tree_engine::{BookmarkSession, FileRename, JsonFileStore, Position, TextChange};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xi_rope::Rope;

#[derive(Parser)]
#[command(
    name = "bookmark-tree",
    about = "Line bookmarks that follow your edits, organised into nested groups"
)]
struct Cli {
    /// Bookmarks file to use instead of the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the bookmark tree
    List,
    /// Bookmark a line of a file
    Add {
        label: String,
        file: PathBuf,
        /// 1-based line number
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        line: u64,
    },
    /// Create an empty top-level group
    Group { label: String },
    /// Remove a bookmark, or a group and everything in it
    Remove { label: String },
    /// Remove every bookmark and group
    Clear,
    /// Give a bookmark or group a new label
    Rename { label: String, new_label: String },
    /// Expand a group in the tree
    Expand { label: String },
    /// Collapse a group in the tree
    Collapse { label: String },
    /// Move entries before a target, into a group, or to the top level
    Move {
        #[arg(required = true)]
        sources: Vec<String>,
        /// Group to move into, or entry to move next to; top level when omitted
        #[arg(long)]
        onto: Option<String>,
    },
    /// Report an edit already made to a file so its bookmarks follow it
    Edit {
        file: PathBuf,
        /// 1-based first line of the replaced range
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        start_line: u64,
        /// 1-based column where the replaced range starts
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        start_col: u64,
        /// 1-based last line of the replaced range
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        end_line: u64,
        /// Text that replaced the range
        text: String,
        /// 1-based column where the replaced range ends
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
        end_col: u64,
    },
    /// Report a renamed file or directory
    FileRenamed { old: PathBuf, new: PathBuf },
    /// Report deleted files or directories
    FileDeleted {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Write the config file pointing at a bookmarks file
    Init { bookmarks_path: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    if let Command::Init { bookmarks_path } = &cli.command {
        let config = Config::new(absolute(bookmarks_path)?);
        config.save()?;
        log::info!(
            "Wrote {} pointing at {}",
            Config::config_path().display(),
            config.bookmarks_path.display()
        );
        return Ok(());
    }

    let store_path = match cli.store {
        Some(path) => path,
        None => bookmarks_path()?,
    };
    log::debug!("Using bookmarks file {}", store_path.display());
    let mut session = BookmarkSession::open(JsonFileStore::new(&store_path))
        .with_context(|| format!("Failed to open {}", store_path.display()))?;

    match cli.command {
        Command::List => {
            for line in tree::render(session.store()) {
                println!("{line}");
            }
        }
        Command::Add { label, file, line } => {
            let file = absolute(&file)?;
            let doc = read_document(&file)?;
            session.add_bookmark(label.trim(), file, to_index(line), &doc)?;
        }
        Command::Group { label } => session.add_group(label.trim())?,
        Command::Remove { label } => {
            for entry in session.remove(&label)? {
                println!("Removed {entry}");
            }
        }
        Command::Clear => session.clear()?,
        Command::Rename { label, new_label } => session.rename(&label, new_label.trim())?,
        Command::Expand { label } => session.set_expanded(&label, true)?,
        Command::Collapse { label } => session.set_expanded(&label, false)?,
        Command::Move { sources, onto } => session.drop_onto(&sources, onto.as_deref())?,
        Command::Edit {
            file,
            start_line,
            start_col,
            end_line,
            text,
            end_col,
        } => {
            let file = absolute(&file)?;
            let doc = read_document(&file)?;
            let change = TextChange::new(
                Position::new(to_index(start_line), to_index(start_col)),
                Position::new(to_index(end_line), to_index(end_col)),
                text,
            );
            let report = session.apply_text_change(&file, &[change], &doc)?;
            for label in &report.removed {
                println!("Removed {label}");
            }
        }
        Command::FileRenamed { old, new } => {
            let old = absolute(&old)?;
            let new = absolute(&new)?;
            let rename = if new.is_dir() {
                FileRename::directory(old, new)
            } else {
                FileRename::file(old, new)
            };
            session.apply_renames(&[rename])?;
        }
        Command::FileDeleted { paths } => {
            let paths = paths
                .iter()
                .map(|path| absolute(path))
                .collect::<Result<Vec<_>>>()?;
            for entry in session.apply_deletions(&paths)? {
                println!("Removed {entry}");
            }
        }
        Command::Init { .. } => {}
    }
    Ok(())
}

/// The configured bookmarks file, or the default location without a config
fn bookmarks_path() -> Result<PathBuf> {
    match Config::load()? {
        Some(config) => Ok(config.bookmarks_path),
        None => {
            log::debug!(
                "No config at {}, using the default bookmarks file",
                Config::config_path().display()
            );
            Ok(Config::default_bookmarks_path())
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Invalid path {}", path.display()))
}

fn read_document(path: &Path) -> Result<Rope> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Rope::from(content))
}

/// 1-based command-line number to a 0-based index
fn to_index(number: u64) -> usize {
    usize::try_from(number.saturating_sub(1)).unwrap_or(usize::MAX)
}
