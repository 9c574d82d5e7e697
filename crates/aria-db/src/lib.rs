//! Database layer for the ARIA voice-agent platform.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode
//! initialization, embedded SQL migrations, and the pool type alias used
//! by every other crate. Every table in ARIA is created through versioned
//! migrations managed here.
//!
//! # Design decisions
//!
//! - **SQLite with WAL mode**: the extranet store and the call-center
//!   audit tables live in one file-backed database per deployment. WAL
//!   mode allows concurrent readers with a single writer, which matches
//!   the access pattern of many read-mostly calls plus an occasional
//!   contact update.
//! - **`r2d2` connection pool**: bounded connection reuse without manual
//!   lifetime management.
//! - **Embedded migrations**: SQL files are compiled into the binary via
//!   `include_str!`, ensuring migrations ship with the worker and cannot
//!   drift from the code that depends on them.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
