//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error,
    transaction::{NewTransaction, Transaction, TransactionBuilder, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with the stored transaction, including the ID and date assigned
/// by the store. Bodies with missing fields, the wrong JSON types or an
/// unknown transaction type are rejected by the JSON extractor; an empty
/// description or a negative amount is rejected with 422.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<NewTransaction>, JsonRejection>,
) -> Response {
    let Json(new_transaction) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::debug!("rejected create transaction request: {rejection}");
            return (
                rejection.status(),
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    match store_transaction(new_transaction, &state.db_connection) {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            Json(transaction).into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn store_transaction(
    new_transaction: NewTransaction,
    db_connection: &Mutex<Connection>,
) -> Result<Transaction, Error> {
    let builder = TransactionBuilder::try_from(new_transaction)?;

    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    create_transaction(builder, &connection)
}
