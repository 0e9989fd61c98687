//! Async wrapper around [`StockLedger`] for use in async runtimes (Tokio, etc.).
//!
//! Runs every ledger operation on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use recycle_stock::{AsyncStockLedger, ReportFilter};
//!
//! #[tokio::main]
//! async fn main() {
//!     let ledger = AsyncStockLedger::builder().in_memory().build().await.unwrap();
//!
//!     ledger.sync_transactions().await.unwrap();
//!     let report = ledger.report(ReportFilter::default()).await.unwrap();
//!     println!("{} groups", report.total);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{Result, StockError};
use crate::queries::ReportQuery;
use crate::{
    config, Connection, ImportSummary, MasterDataSummary, Report, ReportFilter, SourceClient, StockLedger,
    TransactionPayload,
};

// ---------------------------------------------------------------------------
// AsyncStockLedgerBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncStockLedger`].
pub struct AsyncStockLedgerBuilder {
    database: Option<PathBuf>,
    in_memory: bool,
    transaction_url: String,
    product_url: String,
    timeout: Duration,
}

impl Default for AsyncStockLedgerBuilder {
    fn default() -> Self {
        Self {
            database: None,
            in_memory: false,
            transaction_url: config::TRANSACTION_URL.to_string(),
            product_url: config::PRODUCT_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl AsyncStockLedgerBuilder {
    /// Store data in the DuckDB file at `path`.
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Some(path.as_ref().to_path_buf());
        self.in_memory = false;
        self
    }

    /// Keep everything in a private in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn transaction_url(mut self, url: &str) -> Self {
        self.transaction_url = url.to_string();
        self
    }

    pub fn product_url(mut self, url: &str) -> Self {
        self.product_url = url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open the ledger and a second read connection on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncStockLedger> {
        blocking(move || {
            let mut builder = StockLedger::builder()
                .transaction_url(&self.transaction_url)
                .product_url(&self.product_url)
                .timeout(self.timeout);
            if self.in_memory {
                builder = builder.in_memory();
            } else if let Some(path) = self.database {
                builder = builder.database(path);
            }
            let ledger = builder.build()?;
            let reader = ledger.connection().try_clone()?;
            let mut source = SourceClient::new(&self.transaction_url, &self.product_url, self.timeout);
            source.prepare()?;
            Ok(AsyncStockLedger {
                writer: Arc::new(Mutex::new(ledger)),
                reader: Arc::new(Mutex::new(reader)),
                source,
            })
        })
        .await?
    }
}

// ---------------------------------------------------------------------------
// AsyncStockLedger
// ---------------------------------------------------------------------------

/// Async wrapper around [`StockLedger`].
///
/// Writes go through the ledger behind one [`Mutex`] and run one at a time.
/// Reads use a second connection to the same database, so a report never
/// waits for an import; it sees the state before or after the import's
/// commit. Upstream fetches hold neither lock. Cloning is cheap and shares
/// both connections.
#[derive(Clone)]
pub struct AsyncStockLedger {
    writer: Arc<Mutex<StockLedger>>,
    reader: Arc<Mutex<Connection>>,
    source: SourceClient,
}

impl AsyncStockLedger {
    /// Create a new builder for configuring the async ledger.
    pub fn builder() -> AsyncStockLedgerBuilder {
        AsyncStockLedgerBuilder::default()
    }

    /// Run a sync ledger operation on the blocking thread pool.
    ///
    /// ```no_run
    /// # use recycle_stock::AsyncStockLedger;
    /// # async fn example() -> recycle_stock::Result<()> {
    /// # let ledger = AsyncStockLedger::builder().in_memory().build().await?;
    /// let categories = ledger.run(|l| l.master_data().categories()).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StockLedger) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.writer.clone();
        blocking(move || {
            let mut guard = ledger
                .lock()
                .map_err(|_| StockError::Internal("ledger lock poisoned".into()))?;
            f(&mut *guard)
        })
        .await?
    }

    /// Run a read-only operation on the read connection.
    ///
    /// ```no_run
    /// # use recycle_stock::AsyncStockLedger;
    /// # use recycle_stock::queries::MasterDataQuery;
    /// # async fn example() -> recycle_stock::Result<()> {
    /// # let ledger = AsyncStockLedger::builder().in_memory().build().await?;
    /// let subs = ledger.read(|c| MasterDataQuery::new(c).sub_categories("1")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.reader.clone();
        blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StockError::Internal("read connection lock poisoned".into()))?;
            f(&*guard)
        })
        .await?
    }

    pub async fn import(&self, payload: TransactionPayload) -> Result<ImportSummary> {
        self.run(move |l| l.import(&payload)).await
    }

    /// Fetch the upstream feed, then import it. Only the import holds the
    /// write lock.
    pub async fn sync_transactions(&self) -> Result<ImportSummary> {
        let mut source = self.source.clone();
        let payload = blocking(move || source.fetch_transactions()).await??;
        self.import(payload).await
    }

    pub async fn sync_master_data(&self) -> Result<MasterDataSummary> {
        let mut source = self.source.clone();
        let products = blocking(move || source.fetch_products()).await??;
        self.run(move |l| l.apply_master_data(&products)).await
    }

    pub async fn report(&self, filter: ReportFilter) -> Result<Report> {
        self.read(move |c| ReportQuery::new(c).run(&filter)).await
    }
}

/// Run `f` on the blocking pool.
async fn blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StockError::Internal(format!("Task join error: {e}")))
}
