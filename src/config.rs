use std::path::PathBuf;
use std::time::Duration;

pub const TRANSACTION_URL: &str = "https://apirecycle.unii.co.th/Stock/query-transaction-demo";
pub const PRODUCT_URL: &str = "https://apirecycle.unii.co.th/category/query-product-demo";

pub const DATABASE_FILE: &str = "stock.duckdb";

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_OFFSET: usize = 0;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Type used for every stored decimal (`price`, `total`, cast `quantity`).
pub const DECIMAL_TYPE: &str = "DECIMAL(18,4)";
/// Fractional digits kept by [`DECIMAL_TYPE`].
pub const DECIMAL_SCALE: u32 = 4;

pub fn default_database_path() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("recycle-stock").join(DATABASE_FILE)
    } else {
        PathBuf::from(".recycle-stock").join(DATABASE_FILE)
    }
}
