mod error;
mod routes;
mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let mut builder = recycle_stock::AsyncStockLedger::builder();
    if let Ok(path) = std::env::var("STOCK_DATABASE_PATH") {
        builder = builder.database(path);
    }
    if let Ok(url) = std::env::var("STOCK_TRANSACTION_URL") {
        builder = builder.transaction_url(&url);
    }
    if let Ok(url) = std::env::var("STOCK_PRODUCT_URL") {
        builder = builder.product_url(&url);
    }

    let ledger = builder.build().await.expect("Failed to open stock ledger");
    tracing::info!("Stock ledger ready");

    let state = Arc::new(AppState { ledger });

    let app = Router::new()
        .route("/api/transaction", get(routes::transaction::sync_transactions))
        .route("/api/report", get(routes::report::get_report))
        .route("/api/category", get(routes::master::list_categories))
        .route("/api/subcategory", get(routes::master::list_sub_categories))
        .route("/api/master/sync", post(routes::master::sync_master_data))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = std::env::var("STOCK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
