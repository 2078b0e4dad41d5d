//! Chip Ledger CLI
//!
//! Replays a table command script through the engine and prints the final
//! roster.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- session.txt
//! cargo run -- --json session.txt
//! echo "alice buy 100" | cargo run
//! cargo run -- --log chip_ledger=debug session.txt
//! ```
//!
//! Each script line is a table command (`alice buy 100`,
//! `alice transfer 30 bob`, `bob confirm`, ...); see the session module for
//! the full grammar.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (script not found, unreadable input, etc.)

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;
use std::sync::Arc;

use chip_ledger::cli::{self, Session};
use chip_ledger::{ChipEngine, MemoryAccountStore, MemoryIdentityStore, MemoryUserStore};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    // RUST_LOG wins over the --log default when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let engine = ChipEngine::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryIdentityStore::new()),
        Arc::new(MemoryAccountStore::new()),
    );
    let mut session = Session::new(engine);

    let mut stdout = io::stdout();
    let result = match &args.script {
        Some(path) => File::open(path)
            .map_err(|e| format!("{}: {e}", path.display()))
            .and_then(|file| {
                session
                    .run(BufReader::new(file), &mut stdout)
                    .map_err(|e| e.to_string())
            }),
        None => session
            .run(io::stdin().lock(), &mut stdout)
            .map_err(|e| e.to_string()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = print_roster(&session, args.json, &mut stdout) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Print the final table state, as text lines or one JSON document
fn print_roster(
    session: &Session<MemoryUserStore, MemoryIdentityStore, MemoryAccountStore, chip_ledger::Sha256Hasher>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), String> {
    let roster = session.engine().roster().map_err(|e| e.to_string())?;
    if json {
        let doc = serde_json::to_string_pretty(&roster).map_err(|e| e.to_string())?;
        writeln!(out, "{doc}").map_err(|e| e.to_string())?;
    } else {
        writeln!(out, "--- table ---").map_err(|e| e.to_string())?;
        for player in &roster.players {
            writeln!(out, "{}: {}", player.display_name(), player.balance)
                .map_err(|e| e.to_string())?;
        }
        writeln!(out, "Total balance: {}", roster.total).map_err(|e| e.to_string())?;
    }
    Ok(())
}
