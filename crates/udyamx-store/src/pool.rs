//! # Store Pool
//!
//! Opens the single SQLite file that holds every UdyamX record.
//!
//! ```text
//! DbConfig::new(data_dir/udyamx.db)
//!       │
//!       ▼
//! Database::new ── create parent dir ── open (WAL) ── migrate
//!       │
//!       ├── storage()   raw key → JSON records
//!       ├── products()  "udyamx-inventory"
//!       └── invoices()  "udyamx-invoices"
//! ```
//!
//! File stores run in WAL mode so the sync task can read while a command
//! writes. In-memory stores (tests) use one connection that never idles
//! out; closing it would drop the data.
//!
//! Records are rewritten whole. Every repository handed out by one
//! `Database` (and its clones) shares a single write lock, so concurrent
//! read-modify-write cycles from commands and the sync task serialize.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::invoice::InvoiceRepository;
use crate::repository::kv::LocalStore;
use crate::repository::product::ProductRepository;

const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust
/// use udyamx_store::DbConfig;
///
/// let config = DbConfig::new("/path/to/udyamx.db")
///     .max_connections(3)
///     .min_connections(1);
/// assert_eq!(config.max_connections, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file, or `:memory:`.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 4 (one user, a sync task and some headroom)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections open.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on connect.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    /// The file is created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets whether to run migrations on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// Every `Database` built from it is isolated.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1, // In-memory requires a single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }
}

// =============================================================================
// Database
// =============================================================================

/// Main database handle providing repository access.
///
/// Cloning is cheap: clones share the pool and the record write lock.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    writes: Arc<Mutex<()>>,
}

impl Database {
    /// Opens the store, creating the file and its directory on first run.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(path = %config.database_path.display(), "Opening store");

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| DbError::open(IN_MEMORY, e))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| DbError::open(parent, e))?;
                }
            }

            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(if config.is_in_memory() { None } else { Some(Duration::from_secs(1800)) })
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::open(&config.database_path, e))?;

        info!(max_connections = config.max_connections, "Database pool created");

        let db = Database {
            pool,
            writes: Arc::new(Mutex::new(())),
        };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Runs database migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        info!("Migrations complete");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Raw key/value access.
    pub fn storage(&self) -> LocalStore {
        LocalStore::new(self.pool.clone(), Arc::clone(&self.writes))
    }

    /// Returns the product repository.
    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.storage())
    }

    /// Returns the invoice repository.
    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.storage())
    }

    /// Closes the pool. Later operations fail with [`DbError::Closed`].
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
