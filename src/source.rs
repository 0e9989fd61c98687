//! Blocking HTTP client for the upstream transaction and product feeds.

use crate::config;
use crate::error::{Result, StockError};
use crate::models::{ProductList, TransactionPayload};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fetches upstream JSON documents.
///
/// The HTTP client is built on first use and reused afterwards. Clones share
/// the built client.
#[derive(Clone)]
pub struct SourceClient {
    /// URL of the transaction feed (`sellTransaction` / `buyTransaction`).
    pub transaction_url: String,
    /// URL of the product list used for master data.
    pub product_url: String,
    timeout: Duration,
    client: Option<Client>,
}

impl Default for SourceClient {
    fn default() -> Self {
        Self::new(config::TRANSACTION_URL, config::PRODUCT_URL, config::DEFAULT_TIMEOUT)
    }
}

impl SourceClient {
    pub fn new(transaction_url: &str, product_url: &str, timeout: Duration) -> Self {
        Self {
            transaction_url: transaction_url.to_string(),
            product_url: product_url.to_string(),
            timeout,
            client: None,
        }
    }

    /// Build the HTTP client now instead of on the first fetch.
    pub fn prepare(&mut self) -> Result<()> {
        self.client().map(|_| ())
    }

    fn client(&mut self) -> Result<Client> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        self.client = Some(client.clone());
        Ok(client)
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// HTTP failures surface as [`StockError::Http`]; a body that does not
    /// match `T` as [`StockError::MalformedPayload`].
    pub fn fetch_json<T: DeserializeOwned>(&mut self, url: &str) -> Result<T> {
        log::debug!("Fetching {}", url);
        let client = self.client()?;
        let resp = client.get(url).send()?.error_for_status()?;
        let bytes = resp.bytes()?;
        serde_json::from_slice(&bytes)
            .map_err(|e| StockError::MalformedPayload(format!("{}: {}", url, e)))
    }

    pub fn fetch_transactions(&mut self) -> Result<TransactionPayload> {
        let url = self.transaction_url.clone();
        self.fetch_json(&url)
    }

    pub fn fetch_products(&mut self) -> Result<ProductList> {
        let url = self.product_url.clone();
        self.fetch_json(&url)
    }

    /// Drop the HTTP client, if open.
    pub fn close(&mut self) {
        self.client = None;
    }
}
