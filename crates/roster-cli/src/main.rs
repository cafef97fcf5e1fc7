//! Roster CLI - command-line front end for the keyed record store.
//!
//! Provides direct store commands (get/save/delete/names/check) plus a
//! `serve` mode that runs the request/response bridge over
//! newline-delimited JSON on stdin/stdout.

use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use roster_core::store::{RecordStore, SqliteStore};
use roster_core::{Bridge, DialogHost, RecordKey, Request, Response, Summary};
use roster_core::VERSION;

/// Roster - a keyed record store with a ports-style bridge
#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the store file
    #[arg(short, long, global = true, env = "ROSTER_STORE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw value stored under a key
    Get {
        /// Record key
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Store a value under a key
    Save {
        /// Record key (canonical UUID form to be enumerable)
        #[arg(value_name = "ID")]
        id: String,

        /// Value to store (overrides file/stdin)
        #[arg(long)]
        value: Option<String>,

        /// Read the value from a file
        #[arg(long, value_name = "PATH", conflicts_with = "value")]
        file: Option<PathBuf>,
    },

    /// Delete a record, then print the refreshed summary list
    Delete {
        /// Record key
        #[arg(value_name = "ID")]
        id: String,

        /// Output the refreshed list as JSON
        #[arg(long)]
        json: bool,
    },

    /// List record summaries
    Names {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the bridge over NDJSON stdin/stdout
    Serve,

    /// Check store integrity
    Check,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store_path = cli
        .store
        .ok_or_else(|| anyhow::anyhow!("No store path provided. Use --store or set ROSTER_STORE."))?;

    match cli.command {
        Commands::Get { id } => {
            let store = SqliteStore::open(&store_path)?;
            match store.get(&id)? {
                Some(value) => println!("{}", value),
                None => return Err(anyhow::anyhow!("Record not found: {}", id)),
            }
        }
        Commands::Save { id, value, file } => {
            let value = read_value(value, file)?;
            if !RecordKey::matches(&id) && !cli.quiet {
                eprintln!(
                    "note: key \"{}\" is not in canonical UUID form and will not appear in names",
                    id
                );
            }
            let mut store = SqliteStore::open(&store_path)?;
            store.set(&id, &value)?;
            if !cli.quiet {
                println!("Saved {}", id);
            }
        }
        Commands::Delete { id, json } => {
            let mut store = SqliteStore::open(&store_path)?;
            store.remove(&id)?;
            let summaries = store.list_summaries()?;
            print_summaries(&summaries, json, cli.quiet)?;
        }
        Commands::Names { json } => {
            let store = SqliteStore::open(&store_path)?;
            let summaries = store.list_summaries()?;
            print_summaries(&summaries, json, cli.quiet)?;
        }
        Commands::Serve => {
            serve(&store_path)?;
        }
        Commands::Check => {
            let store = SqliteStore::open(&store_path)?;
            match store.check_integrity() {
                Ok(()) => {
                    let metadata = store.metadata()?;
                    if !cli.quiet {
                        println!("Integrity check: OK");
                        println!("- format version: {}", metadata.format_version);
                        println!("- created at: {}", metadata.created_at.to_rfc3339());
                    }
                }
                Err(err) => {
                    eprintln!("Integrity check: FAILED");
                    eprintln!("- error: {}", err);
                    return Err(anyhow::anyhow!("Integrity check failed"));
                }
            }
        }
    }

    Ok(())
}

/// Resolve the value to save from --value, --file, or stdin.
fn read_value(value: Option<String>, file: Option<PathBuf>) -> anyhow::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e));
    }
    if io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No value provided. Use --value, --file, or pipe to stdin."
        ));
    }
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn print_summaries(summaries: &[Summary], json: bool, quiet: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(summaries)?);
    } else {
        if !quiet {
            println!("KEY | NAME");
        }
        for summary in summaries {
            println!("{} | {}", summary.key, summary.name);
        }
    }
    Ok(())
}

/// Dialog host that publishes show-dialog events as NDJSON lines.
struct LineDialogHost;

impl DialogHost for LineDialogHost {
    fn show_dialog(&mut self, id: &str) {
        println!("{}", serde_json::json!({ "type": "show-dialog", "dialog": id }));
    }
}

/// Run the bridge over newline-delimited JSON.
///
/// Each stdin line is one request; each response is printed as one
/// stdout line. Unparseable lines and failed round trips are reported
/// on stderr and do not stop the loop.
fn serve(store_path: &Path) -> anyhow::Result<()> {
    let store = SqliteStore::open(store_path)?;
    let mut bridge = Bridge::new(store, LineDialogHost);
    tracing::debug!(store = %store_path.display(), "serving bridge over stdin/stdout");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let request: Request = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(err) => {
                eprintln!("error: unparseable request: {}", err);
                continue;
            }
        };
        match bridge.handle(request) {
            Ok(Some(response)) => {
                write_response(&mut stdout, &response)?;
            }
            Ok(None) => {}
            Err(err) => {
                eprintln!("error: request failed: {}", err);
            }
        }
    }

    Ok(())
}

fn write_response(stdout: &mut io::Stdout, response: &Response) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *stdout, response)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
