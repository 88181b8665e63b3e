//! Application state for the API server

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fee_ledger_core_rs::{DueLedger, LedgerSnapshot, SnapshotError, StaticDirectory};

use crate::error::ApiError;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// The authoritative ledger. Writers hold the guard for the whole
    /// read-allocate-commit sequence, which gives RecordPayment its
    /// per-student atomicity.
    pub ledger: Arc<RwLock<DueLedger>>,
    /// Student directory and school calendar (collaborator seed data)
    pub directory: Arc<StaticDirectory>,
    /// Snapshot file persisted after each committed write
    pub snapshot_path: Option<PathBuf>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create new app state, restoring the ledger from a snapshot if one
    /// exists at the configured path
    pub fn new(
        directory: StaticDirectory,
        snapshot_path: Option<PathBuf>,
    ) -> Result<Self, SnapshotError> {
        let ledger = match &snapshot_path {
            Some(path) if path.exists() => {
                let snapshot = LedgerSnapshot::load_from_file(path)?;
                let ledger = snapshot.restore()?;
                tracing::info!(
                    dues = ledger.due_count(),
                    payments = ledger.payment_count(),
                    "restored ledger from snapshot"
                );
                ledger
            }
            _ => DueLedger::new(),
        };

        Ok(Self {
            ledger: Arc::new(RwLock::new(ledger)),
            directory: Arc::new(directory),
            snapshot_path,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Take the read guard
    pub fn ledger_read(&self) -> Result<RwLockReadGuard<'_, DueLedger>, ApiError> {
        self.ledger
            .read()
            .map_err(|_| ApiError::InternalError("ledger lock poisoned".to_string()))
    }

    /// Take the write guard
    pub fn ledger_write(&self) -> Result<RwLockWriteGuard<'_, DueLedger>, ApiError> {
        self.ledger
            .write()
            .map_err(|_| ApiError::InternalError("ledger lock poisoned".to_string()))
    }

    /// Persist a snapshot after a committed write. Persistence failures are
    /// logged, not surfaced: the write itself has already committed.
    pub fn persist(&self, ledger: &DueLedger) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let result = LedgerSnapshot::capture(ledger).and_then(|s| s.save_to_file(path));
        if let Err(err) = result {
            tracing::error!(error = %err, path = %path.display(), "snapshot persistence failed");
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Directory for the ledger snapshot file; `None` disables persistence
    pub data_dir: Option<PathBuf>,
    /// JSON seed file for the student directory and school calendars
    pub seed_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8086,
            enable_cors: true,
            data_dir: None,
            seed_file: None,
        }
    }
}

impl ApiConfig {
    /// Build a config from environment variables, falling back to defaults
    ///
    /// Recognized: FEE_LEDGER_HOST, FEE_LEDGER_PORT, FEE_LEDGER_DATA_DIR,
    /// FEE_LEDGER_SEED_FILE
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("FEE_LEDGER_HOST").unwrap_or(defaults.host),
            port: std::env::var("FEE_LEDGER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            enable_cors: defaults.enable_cors,
            data_dir: std::env::var("FEE_LEDGER_DATA_DIR").ok().map(PathBuf::from),
            seed_file: std::env::var("FEE_LEDGER_SEED_FILE").ok().map(PathBuf::from),
        }
    }

    /// Snapshot file path inside the configured data dir
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join("ledger.json"))
    }
}
