//! Recycling stock ledger.
//!
//! Imports upstream recycling transactions (orders → parties → category
//! groups → graded items) into DuckDB as one all-or-nothing unit per run, and
//! reports buy/sell/net quantities and amounts per category and sub-category.
//!
//! # Quick start
//!
//! ```no_run
//! use recycle_stock::{ReportFilter, StockLedger};
//!
//! let mut ledger = StockLedger::builder().in_memory().build().unwrap();
//!
//! // Pull master data and transactions from the upstream service
//! ledger.sync_master_data().unwrap();
//! ledger.sync_transactions().unwrap();
//!
//! // First page of the net-stock report
//! let report = ledger.report(&ReportFilter::default()).unwrap();
//! println!("{} groups", report.total);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod config;
pub mod connection;
pub mod error;
pub mod ingest;
pub mod models;
pub mod queries;
pub mod schema;
pub mod source;
pub mod sql_builder;

#[cfg(feature = "async")]
pub use async_client::AsyncStockLedger;
pub use connection::{Connection, UnitOfWork};
pub use error::{Result, StockError};
pub use ingest::{ImportSummary, Importer};
pub use models::{MasterDataSummary, ProductList, Report, ReportFilter, ReportParams, ReportRow, TransactionPayload};
pub use source::SourceClient;
pub use sql_builder::SqlBuilder;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// StockLedgerBuilder
// ---------------------------------------------------------------------------

enum Database {
    Default,
    Path(PathBuf),
    InMemory,
}

/// Builder for configuring and constructing a [`StockLedger`].
pub struct StockLedgerBuilder {
    database: Database,
    transaction_url: String,
    product_url: String,
    timeout: Duration,
}

impl Default for StockLedgerBuilder {
    fn default() -> Self {
        Self {
            database: Database::Default,
            transaction_url: config::TRANSACTION_URL.to_string(),
            product_url: config::PRODUCT_URL.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
        }
    }
}

impl StockLedgerBuilder {
    /// Store data in the DuckDB file at `path` (created if missing).
    ///
    /// Without this or [`in_memory`](Self::in_memory), the file lives in the
    /// platform data directory (see [`config::default_database_path`]).
    pub fn database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database = Database::Path(path.as_ref().to_path_buf());
        self
    }

    /// Keep everything in a private in-memory database.
    pub fn in_memory(mut self) -> Self {
        self.database = Database::InMemory;
        self
    }

    /// Override the upstream transaction feed URL.
    pub fn transaction_url(mut self, url: &str) -> Self {
        self.transaction_url = url.to_string();
        self
    }

    /// Override the upstream product list URL.
    pub fn product_url(mut self, url: &str) -> Self {
        self.product_url = url.to_string();
        self
    }

    /// HTTP request timeout for upstream fetches. Defaults to 60 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open the database and apply the schema. No network access happens here.
    pub fn build(self) -> Result<StockLedger> {
        let conn = match self.database {
            Database::Default => Connection::open(&config::default_database_path())?,
            Database::Path(path) => Connection::open(&path)?,
            Database::InMemory => Connection::open_in_memory()?,
        };
        let source = SourceClient::new(&self.transaction_url, &self.product_url, self.timeout);
        Ok(StockLedger { conn, source })
    }
}

// ---------------------------------------------------------------------------
// StockLedger
// ---------------------------------------------------------------------------

/// Entry point: owns the store connection and the upstream client.
///
/// The connection lives exactly as long as the ledger; drop it (or call
/// [`close`](Self::close)) at shutdown.
pub struct StockLedger {
    conn: Connection,
    source: SourceClient,
}

impl StockLedger {
    /// Create a new builder for configuring the ledger.
    pub fn builder() -> StockLedgerBuilder {
        StockLedgerBuilder::default()
    }

    // -- Ingestion ---------------------------------------------------------

    /// Import an already decoded payload as one unit of work.
    pub fn import(&mut self, payload: &TransactionPayload) -> Result<ImportSummary> {
        Importer::new(&mut self.conn).import(payload)
    }

    /// Fetch the upstream transaction feed and import it.
    ///
    /// A fetch or decode failure leaves the store untouched.
    pub fn sync_transactions(&mut self) -> Result<ImportSummary> {
        let payload = self.source.fetch_transactions()?;
        self.import(&payload)
    }

    /// Fetch the upstream product list and insert unknown categories and
    /// sub-categories.
    pub fn sync_master_data(&mut self) -> Result<MasterDataSummary> {
        let products = self.source.fetch_products()?;
        self.apply_master_data(&products)
    }

    /// Insert the unknown categories and sub-categories of an already
    /// decoded product list.
    pub fn apply_master_data(&mut self, products: &ProductList) -> Result<MasterDataSummary> {
        queries::MasterDataSync::new(&mut self.conn).apply(products)
    }

    // -- Query accessors ---------------------------------------------------

    /// One page of the net-stock report plus the total group count.
    pub fn report(&self, filter: &ReportFilter) -> Result<Report> {
        self.reports().run(filter)
    }

    /// Access the report query interface.
    pub fn reports(&self) -> queries::ReportQuery<'_> {
        queries::ReportQuery::new(&self.conn)
    }

    /// Access category / sub-category lookups.
    pub fn master_data(&self) -> queries::MasterDataQuery<'_> {
        queries::MasterDataQuery::new(&self.conn)
    }

    /// Consume the ledger and release the connection and HTTP client.
    pub fn close(mut self) {
        self.source.close();
        drop(self);
    }

    /// Return a reference to the underlying [`Connection`].
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying [`Connection`].
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the upstream client, e.g. to inspect or change its URLs.
    pub fn source_mut(&mut self) -> &mut SourceClient {
        &mut self.source
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for StockLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StockLedger(transactions={}, products={})",
            self.source.transaction_url, self.source.product_url
        )
    }
}
