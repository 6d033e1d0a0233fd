//! The API router: the health check and the transaction routes.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, Error, endpoints,
    transaction::{create_transaction_endpoint, list_transactions_endpoint},
};

/// The text the health check responds with.
pub const HEALTH_CHECK_TEXT: &str = "API is running";

/// Return a router with all the API's routes.
///
/// Requests from any origin are allowed so that a client served from
/// another host or port can call the API from the browser.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::ADD_TRANSACTION, post(create_transaction_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Confirm the server is reachable. Never touches the database.
async fn get_health() -> &'static str {
    HEALTH_CHECK_TEXT
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
