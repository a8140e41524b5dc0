//! xrefs CLI: load cross-reference entries and query them
//!
//! Usage:
//!   xrefs load <entries.jsonl> [--db path] [--batch-size N] [--mirror]
//!   xrefs nodes <ticket>... [--filter pattern]... [--db path]
//!   xrefs edges <ticket>... [--kind pattern]... [--filter pattern]... [--db path]
//!   xrefs decorations <ticket> [--source-text] [--references] [--db path]

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use xrefs::storage::batch;
use xrefs::{
    BatchOptions, CancellationToken, DecorationsRequest, EdgesRequest, NodesRequest, OpenStore,
    SqliteStore, XrefService,
};

#[derive(Parser)]
#[command(
    name = "xrefs",
    version,
    about = "Cross-reference queries over a code graph store"
)]
struct Cli {
    /// Path to SQLite database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load JSON-lines entries into the store
    Load {
        /// File with one serialized entry per line
        path: PathBuf,
        /// Entries per store write
        #[arg(long, default_value_t = batch::DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        /// Also write the mirror of every edge
        #[arg(long)]
        mirror: bool,
    },
    /// Show facts of nodes
    Nodes {
        #[arg(required = true)]
        tickets: Vec<String>,
        /// Fact name pattern (repeatable; "**" selects all)
        #[arg(long = "filter", default_value = "**")]
        filters: Vec<String>,
    },
    /// Show outgoing edges of nodes
    Edges {
        #[arg(required = true)]
        tickets: Vec<String>,
        /// Edge kind pattern (repeatable)
        #[arg(long = "kind", default_value = "**")]
        kinds: Vec<String>,
        /// Fact name pattern for the embedded nodes (repeatable)
        #[arg(long = "filter", default_value = "**")]
        filters: Vec<String>,
    },
    /// Show a file's text and references
    Decorations {
        ticket: String,
        #[arg(long)]
        source_text: bool,
        #[arg(long)]
        references: bool,
    },
}

/// Get the default database path (~/.local/share/xrefs/xrefs.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("xrefs").join("xrefs.db")
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}

fn cmd_load(store: SqliteStore, path: PathBuf, options: BatchOptions) -> Result<(), String> {
    let file = File::open(&path).map_err(|e| format!("cannot open '{}': {}", path.display(), e))?;
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    let summary = runtime
        .block_on(batch::load_json_lines(
            Arc::new(store),
            BufReader::new(file),
            &options,
        ))
        .map_err(|e| format!("load failed: {}", e))?;
    println!(
        "Loaded {} entries in {} batches",
        summary.entries, summary.batches
    );
    Ok(())
}

fn cmd_query(store: SqliteStore, command: Commands) -> Result<(), String> {
    let service = XrefService::new(Arc::new(store));
    let cancel = CancellationToken::new();
    match command {
        Commands::Nodes { tickets, filters } => {
            let request = NodesRequest { tickets, filters };
            let reply = service.nodes(&request, &cancel).map_err(|e| e.to_string())?;
            print_json(&reply.sorted())
        }
        Commands::Edges {
            tickets,
            kinds,
            filters,
        } => {
            let request = EdgesRequest {
                tickets,
                kinds,
                filters,
            };
            let reply = service.edges(&request, &cancel).map_err(|e| e.to_string())?;
            print_json(&reply.sorted())
        }
        Commands::Decorations {
            ticket,
            source_text,
            references,
        } => {
            let request = DecorationsRequest {
                ticket,
                source_text,
                references,
            };
            let reply = service
                .decorations(&request, &cancel)
                .map_err(|e| e.to_string())?;
            print_json(&reply.sorted())
        }
        Commands::Load { .. } => Err("load is not a query".to_string()),
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let db_path = cli.db.unwrap_or_else(default_db_path);
    let store =
        SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))?;

    match cli.command {
        Commands::Load {
            path,
            batch_size,
            mirror,
        } => {
            let options = BatchOptions::new()
                .with_batch_size(batch_size)
                .with_mirrors(mirror);
            cmd_load(store, path, options)
        }
        command => cmd_query(store, command),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
