use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, IsTerminal};
use tracing_subscriber::EnvFilter;

use btquill::config::Config;
use btquill::document::graph::NodeId;
use btquill::editor::GraphDocument;
use btquill::file::loader::{load_tree_file, load_tree_from_stdin};

/// BTQuill - inspect behavior trees through the graph editor model
#[derive(Parser)]
#[command(name = "btquill")]
#[command(version)]
#[command(about = "Inspect behavior trees through the graph editor model", long_about = None)]
struct Cli {
    /// Behavior tree file (YAML, optionally gzipped); omit to read from stdin
    file: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tree outline with each node's address (default)
    Show,
    /// Print the node an address designates
    Resolve {
        /// Base64 node address; the empty string is the root
        address: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let tree = match cli.file {
        Some(path) => load_tree_file(&path)?,
        None if !io::stdin().is_terminal() => load_tree_from_stdin()?,
        None => anyhow::bail!("no behavior tree given; pass a file or pipe one on stdin"),
    };

    let mut doc = GraphDocument::from_config(Config::load());
    doc.bind(&tree);

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            let root = doc.master_root().context("tree has no root")?;
            if doc.read_only() {
                println!("(read-only)");
            }
            print_outline(&doc, root, 0);
        }
        Command::Resolve { address } => match doc.node_at_address(&address) {
            Some(node) => {
                if let Some(entry) = doc.node(node) {
                    println!("{} [{}] {}", entry.title(), entry.kind(), entry.data().type_name);
                }
            }
            None => println!("not found"),
        },
    }

    Ok(())
}

fn print_outline<H, C>(doc: &GraphDocument<H, C>, node: NodeId, depth: usize)
where
    H: btquill::editor::undo::UndoHistory,
    C: btquill::editor::clipboard::Clipboard,
{
    let Some(entry) = doc.node(node) else {
        return;
    };
    let address = doc
        .address_of(node)
        .map(String::from)
        .unwrap_or_default();
    println!(
        "{:indent$}{} [{}]  {:?}",
        "",
        entry.title(),
        entry.kind(),
        address,
        indent = depth * 2
    );
    for &child in entry.children() {
        print_outline(doc, child, depth + 1);
    }
}
