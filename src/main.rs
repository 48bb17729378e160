use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use devtree::document::tree::Config;
use devtree::file::loader::{load_text_file, load_text_from_stdin};
use devtree::settings::Settings;
use devtree::ui::render_tree;

/// devtree - Print device-tree style YAML configuration as a tree
#[derive(Parser)]
#[command(name = "devtree")]
#[command(version)]
#[command(about = "Print device-tree style YAML configuration as a tree", long_about = None)]
struct Cli {
    /// YAML file to read (omit to read from stdin)
    file: Option<String>,

    /// Spaces per depth level
    #[arg(short, long)]
    indent: Option<usize>,

    /// Annotate values with their type
    #[arg(short, long)]
    types: bool,

    /// Print keys only
    #[arg(long)]
    no_values: bool,

    /// Graft the document under an in-memory root (--under=KEY; KEY defaults to the configured root_key)
    #[arg(short, long, value_name = "KEY", num_args = 0..=1, require_equals = true)]
    under: Option<Option<String>>,

    /// Print the value at a slash-separated path, starting with a top-level key
    #[arg(short, long, value_name = "PATH")]
    get: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devtree=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load();
    if let Some(indent) = cli.indent {
        settings.indent_size = indent;
    }
    if cli.types {
        settings.show_types = true;
    }
    if cli.no_values {
        settings.show_values = false;
    }

    // The buffer must outlive every node that borrows from it.
    let text = match &cli.file {
        Some(path) => load_text_file(path)?,
        None if !io::stdin().is_terminal() => load_text_from_stdin()?,
        None => anyhow::bail!("No input: pass a YAML file or pipe one on stdin"),
    };

    let document = Config::from_yaml(&text);
    let config = match &cli.under {
        Some(key) => {
            let key = key.clone().unwrap_or_else(|| settings.root_key.clone());
            let mut root = Config::new(key);
            root.add_child(document)
                .context("Failed to graft document")?;
            root
        }
        None => document,
    };

    let mut stdout = io::stdout().lock();
    match &cli.get {
        Some(path) => {
            let node = config
                .find_path(path)
                .with_context(|| format!("No node at '{}'", path))?;
            let value = node
                .value()
                .with_context(|| format!("Node '{}' has no value", path))?;
            writeln!(stdout, "{}", value)?;
        }
        None => {
            write!(stdout, "{}", render_tree(&config, &settings))?;
        }
    }
    stdout.flush()?;

    Ok(())
}
