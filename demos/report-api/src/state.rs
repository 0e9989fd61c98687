/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async ledger. Dispatches blocking store and upstream calls to a
    /// thread pool internally.
    pub ledger: recycle_stock::AsyncStockLedger,
}
