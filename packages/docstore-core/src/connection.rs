//! Store connections: the explicit handle every operation goes through.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::collection::{Collection, CollectionData};
use crate::config::ConnectOptions;
use crate::error::{DbError, Result};

/// Shared engine state behind one connection and all its clones.
#[derive(Debug)]
pub(crate) struct StoreInner {
    pub(crate) database: String,
    pub(crate) closed: AtomicBool,
    pub(crate) collections: RwLock<HashMap<String, CollectionData>>,
}

impl StoreInner {
    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(DbError::ConnectionClosed {
                database: self.database.clone(),
            });
        }
        Ok(())
    }
}

/// Handle to one open database.
///
/// Cloning is cheap and every clone addresses the same store. Once
/// [`Connection::close`] is called, operations on any clone fail with
/// [`DbError::ConnectionClosed`].
#[derive(Debug, Clone)]
pub struct Connection {
    options: ConnectOptions,
    inner: Arc<StoreInner>,
}

impl Connection {
    /// Opens the database named by a `docstore://host[:port]/database` URI.
    pub fn connect(uri: &str) -> Result<Self> {
        let options = ConnectOptions::parse(uri)?;
        Ok(Self::with_options(options))
    }

    /// Opens a database from already parsed options.
    pub fn with_options(options: ConnectOptions) -> Self {
        tracing::info!(
            "Opening database '{}' at {}:{}",
            options.database,
            options.host,
            options.port
        );
        let inner = Arc::new(StoreInner {
            database: options.database.clone(),
            closed: AtomicBool::new(false),
            collections: RwLock::new(HashMap::new()),
        });
        Connection { options, inner }
    }

    pub fn options(&self) -> &ConnectOptions {
        &self.options
    }

    /// Name of the database this connection is bound to.
    pub fn database(&self) -> &str {
        &self.options.database
    }

    /// Handle to a named collection. Collections spring into existence
    /// on their first insert, so this never fails.
    pub fn collection(&self, name: &str) -> Collection {
        Collection::new(name, Arc::clone(&self.inner))
    }

    /// Sorted names of all collections that have seen an insert.
    pub async fn collection_names(&self) -> Result<Vec<String>> {
        self.inner.ensure_open()?;
        let collections = self.inner.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Closes the connection. Closing twice is a no-op.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            tracing::info!("Closed database '{}'", self.options.database);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub(crate) fn inner(&self) -> &StoreInner {
        &self.inner
    }
}
