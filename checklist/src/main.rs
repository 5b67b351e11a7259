//! Personal checklist CLI.
//!
//! Items live in `.checklist/store/` under the chosen root and survive between
//! invocations. Each command loads the collection once, applies at most one
//! mutation, and flushes before exiting.

use std::io::{self, StdoutLock, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use checklist::confirm::{AssumeYes, Confirm, TerminalConfirm};
use checklist::core::types::ItemId;
use checklist::io::config::load_config;
use checklist::io::gateway::Gateway;
use checklist::io::init::{ChecklistPaths, InitOptions, init_checklist};
use checklist::io::kv::FileStore;
use checklist::logging;
use checklist::persist::build_policy;
use checklist::render::{Counts, render_header, render_list};
use checklist::store::{ClearOutcome, ListStore, RemoveOutcome};
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "checklist", version, about = "Personal checklist with local storage")]
struct Cli {
    /// Directory containing `.checklist/`.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (defaults to `.checklist/config.toml` under the root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.checklist/` with a default config.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Show all items, newest first (default).
    List {
        /// Print the collection as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Add an item. Blank titles are ignored.
    Add {
        title: String,
        /// Optional category label.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Mark an item done or not done.
    Toggle {
        /// `#N`, full id, or unique id prefix.
        reference: String,
    },
    /// Remove an item after confirmation.
    Remove {
        /// `#N`, full id, or unique id prefix.
        reference: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove every item after confirmation.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Print total and remaining counts.
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = ChecklistPaths::new(&cli.root);
    let config = cli.config;
    match cli.command.unwrap_or(Command::List { json: false }) {
        Command::Init { force } => cmd_init(&paths, force),
        Command::List { json } => with_store(&paths, config, |store, out| cmd_list(store, json, out)),
        Command::Add { title, category } => with_store(&paths, config, |store, out| {
            cmd_add(store, &title, category.as_deref(), out)
        }),
        Command::Toggle { reference } => {
            with_store(&paths, config, |store, out| cmd_toggle(store, &reference, out))
        }
        Command::Remove { reference, yes } => with_store(&paths, config, |store, out| {
            cmd_remove(store, &reference, confirmer(yes).as_mut(), out)
        }),
        Command::Clear { yes } => with_store(&paths, config, |store, out| {
            cmd_clear(store, confirmer(yes).as_mut(), out)
        }),
        Command::Stats { json } => with_store(&paths, config, |store, out| cmd_stats(store, json, out)),
    }
}

/// Open the store, run one command against it, and flush before returning.
fn with_store<F>(paths: &ChecklistPaths, config: Option<PathBuf>, command: F) -> Result<()>
where
    F: FnOnce(&mut ListStore, &mut StdoutLock<'static>) -> Result<()>,
{
    let mut store = open_store(paths, config)?;
    let mut out = io::stdout().lock();
    command(&mut store, &mut out)?;
    store.flush();
    Ok(())
}

fn cmd_init(paths: &ChecklistPaths, force: bool) -> Result<()> {
    let paths = init_checklist(&paths.root, &InitOptions { force })?;
    println!("Initialized {}", paths.checklist_dir.display());
    Ok(())
}

fn open_store(paths: &ChecklistPaths, config: Option<PathBuf>) -> Result<ListStore> {
    let config_path = config.unwrap_or_else(|| paths.config_path.clone());
    let cfg = load_config(&config_path).context("load config")?;
    let store_dir = paths.store_dir(&cfg);
    debug!(store_dir = %store_dir.display(), key = %cfg.storage_key, mode = ?cfg.persist.mode, "opening checklist");
    let gateway = Gateway::new(Arc::new(FileStore::new(store_dir)), cfg.storage_key.clone())
        .with_pretty(cfg.pretty);
    let policy = build_policy(cfg.persist.mode, gateway.clone());
    Ok(ListStore::open(&gateway, policy))
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirm::new(io::stdin().lock(), io::stdout()))
    }
}

fn cmd_list(store: &ListStore, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let payload = serde_json::to_string_pretty(store.items()).context("serialize items")?;
        writeln!(out, "{payload}")?;
    } else {
        write!(out, "{}", render_list(store.items()))?;
    }
    Ok(())
}

fn cmd_add(
    store: &mut ListStore,
    title: &str,
    category: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(id) = store.add(title, category) {
        writeln!(out, "Added {}", id.short())?;
    }
    Ok(())
}

fn cmd_toggle(store: &mut ListStore, reference: &str, out: &mut impl Write) -> Result<()> {
    let id = match store.resolve(reference) {
        Some(item) => item.id.clone(),
        None => ItemId::from(reference),
    };
    match store.toggle(&id) {
        Some(true) => writeln!(out, "Done: {}", title_of(store, &id))?,
        Some(false) => writeln!(out, "Not done: {}", title_of(store, &id))?,
        None => writeln!(out, "No item matches '{reference}'")?,
    }
    Ok(())
}

fn cmd_remove(
    store: &mut ListStore,
    reference: &str,
    confirm: &mut dyn Confirm,
    out: &mut impl Write,
) -> Result<()> {
    let Some(id) = store.resolve(reference).map(|item| item.id.clone()) else {
        writeln!(out, "No item matches '{reference}'")?;
        return Ok(());
    };
    if let RemoveOutcome::Removed(item) = store.remove(&id, confirm) {
        writeln!(out, "Removed: {}", item.title)?;
    }
    Ok(())
}

fn cmd_clear(store: &mut ListStore, confirm: &mut dyn Confirm, out: &mut impl Write) -> Result<()> {
    if let ClearOutcome::Cleared(count) = store.clear_all(confirm) {
        writeln!(out, "Cleared {count} items")?;
    }
    Ok(())
}

fn cmd_stats(store: &ListStore, json: bool, out: &mut impl Write) -> Result<()> {
    let counts = Counts::of(store.items());
    if json {
        writeln!(out, "{}", serde_json::to_string(&counts).context("serialize counts")?)?;
    } else {
        writeln!(out, "{}", render_header(counts))?;
    }
    Ok(())
}

fn title_of<'a>(store: &'a ListStore, id: &ItemId) -> &'a str {
    store.find(id).map(|item| item.title.as_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_list() {
        let cli = Cli::parse_from(["checklist"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_add_with_category() {
        let cli = Cli::parse_from(["checklist", "add", "Towel", "--category", "Textile"]);
        assert!(matches!(
            cli.command,
            Some(Command::Add { ref title, category: Some(ref category) })
                if title == "Towel" && category == "Textile"
        ));
    }

    #[test]
    fn parse_remove_yes_and_root() {
        let cli = Cli::parse_from(["checklist", "remove", "#1", "-y", "--root", "/tmp/x"]);
        assert!(matches!(cli.command, Some(Command::Remove { yes: true, .. })));
        assert_eq!(cli.root, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn parse_clear_defaults_to_prompt() {
        let cli = Cli::parse_from(["checklist", "clear"]);
        assert!(matches!(cli.command, Some(Command::Clear { yes: false })));
    }
}
