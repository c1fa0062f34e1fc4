//! # Stockroom Terminal Library
//!
//! Line-oriented front end for the Stockroom core: JSON requests on stdin,
//! JSON responses on stdout, logs on stderr.
//!
//! ## Module Organization
//! ```text
//! stockroom_terminal/
//! ├── lib.rs          ◄─── You are here (startup & request loop)
//! ├── config.rs       ◄─── AppConfig (env, stockroom.toml, defaults)
//! ├── state.rs        ◄─── AppState (PointOfSale + config)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Request enum, dispatch, Response
//! │   ├── catalog.rs  ◄─── Restock, lookup, removal
//! │   ├── basket.rs   ◄─── Current sale lines
//! │   ├── sale.rs     ◄─── Commit
//! │   ├── ledger.rs   ◄─── Totals report
//! │   ├── tax.rs      ◄─── Tax rate
//! │   └── config.rs   ◄─── Configuration
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{handle_line, Response};
use config::AppConfig;
use state::AppState;
use stockroom_core::store::Store;
use stockroom_db::Database;

/// Runs the terminal until stdin closes.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Terminal Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │     • Default: info,stockroom=debug,sqlx=warn; override with RUST_LOG   │
/// │                                                                         │
/// │  2. Resolve Configuration ────────────────────────────────────────────► │
/// │     • STOCKROOM_* env vars, stockroom.toml, defaults                    │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode                                              │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  4. Serve ────────────────────────────────────────────────────────────► │
/// │     • One request per stdin line, one response per stdout line          │
/// │     • Requests run in order                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Stockroom terminal");

    let config = AppConfig::load()?;
    if let Some(parent) = config.database_path.parent() {
        if !config.db_config().is_in_memory() && !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db = Database::new(config.db_config()).await?;
    info!("Database connected and migrations applied");

    let state = AppState::new(db.clone(), config);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let handled = serve(&state, stdin, stdout).await?;

    info!(requests = handled, "Input closed, shutting down");
    db.close().await;
    Ok(())
}

/// Answers every line of `input` on `output`. Returns the request count.
///
/// Blank lines are skipped. Errors inside a request become error
/// responses; only I/O failures end the loop.
pub async fn serve<S, R, W>(state: &AppState<S>, input: R, mut output: W) -> std::io::Result<usize>
where
    S: Store,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handle_line(state, line).await;
        write_response(&mut output, &response).await?;
        handled += 1;
    }

    Ok(handled)
}

async fn write_response<W: AsyncWrite + Unpin>(
    output: &mut W,
    response: &Response,
) -> std::io::Result<()> {
    let mut encoded = serde_json::to_vec(response)?;
    encoded.push(b'\n');
    output.write_all(&encoded).await?;
    output.flush().await
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockroom=trace` - Show trace for stockroom crates only
/// - Default: info, debug for stockroom crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serve_answers_each_line() {
        let state = commands::test_support::state().await;
        let input = concat!(
            r#"{"command":"restock","name":"Widget","quantity":2,"price":500,"margin":25}"#,
            "\n",
            "\n",
            r#"{"command":"add_to_basket","product":1,"quantity":5}"#,
            "\n",
            r#"{"command":"get_config"}"#,
            "\n",
        );
        let mut output = Vec::new();

        let handled = serve(&state, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(handled, 3);

        let text = String::from_utf8(output).unwrap();
        let responses: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0]["ok"], true);
        assert_eq!(responses[0]["data"]["product"]["cost"], 400);
        assert_eq!(responses[1]["ok"], false);
        assert_eq!(responses[1]["error"]["code"], "INSUFFICIENT_STOCK");
        assert_eq!(responses[2]["data"]["costPolicy"], "weighted_average");
    }
}
