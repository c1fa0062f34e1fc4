//! # Stockroom Terminal Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Terminal                               │
//! │                                                                         │
//! │   UI / script ──stdin──► JSON request lines                             │
//! │        ▲                        │                                       │
//! │        │                        ▼                                       │
//! │        │          ┌──────────────────────────────┐                      │
//! │        │          │  stockroom_terminal::serve   │──stderr──► logs      │
//! │        │          │  commands/ ──► PointOfSale   │                      │
//! │        │          └──────────────┬───────────────┘                      │
//! │        │                         │                                      │
//! │        └───stdout── JSON response lines                                 │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                    stockroom.db (SQLite, WAL mode)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#[tokio::main]
async fn main() {
    if let Err(e) = stockroom_terminal::run().await {
        eprintln!("stockroom-terminal: {}", e);
        std::process::exit(1);
    }
}
