//! The dashboard's view of the finance tracker API.

use std::{future::Future, time::Duration};

use reqwest::{Client, Response};

use crate::{
    endpoints,
    transaction::{NewTransaction, Transaction},
};

/// The default time to wait for the API before giving up on a request.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// The ways a request to the API can fail.
///
/// The dashboard does not look inside error responses, it only checks the
/// HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The API could not be reached or did not respond in time.
    #[error("could not reach the API: {0}")]
    Connection(String),

    /// The API responded with a status outside the 2xx range.
    #[error("the API responded with status {0}")]
    Status(u16),

    /// The response body was not the expected JSON.
    #[error("could not decode the API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Connection(error.to_string())
        }
    }
}

/// The operations the dashboard needs from the API.
pub trait TransactionApi: Send + Sync + 'static {
    /// Get every stored transaction in the store's order.
    fn list_transactions(
        &self,
    ) -> impl Future<Output = Result<Vec<Transaction>, ApiError>> + Send;

    /// Store a new transaction and get back the stored record.
    fn add_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, ApiError>> + Send;
}

/// A [TransactionApi] that talks JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransactionApi {
    client: Client,
    base_url: String,
}

impl HttpTransactionApi {
    /// Create a client for the API served at `base_url`, e.g. "http://localhost:5000".
    ///
    /// Requests that take longer than `timeout` fail with [ApiError::Connection].
    ///
    /// # Errors
    /// Returns an [ApiError::Connection] if the HTTP client could not be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The URL the API is served from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status(status.as_u16()))
    }
}

impl TransactionApi for HttpTransactionApi {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let response = self
            .client
            .get(self.url(endpoints::TRANSACTIONS))
            .send()
            .await?;

        let transactions = check_status(response)?.json().await?;

        Ok(transactions)
    }

    async fn add_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let response = self
            .client
            .post(self.url(endpoints::ADD_TRANSACTION))
            .json(&new_transaction)
            .send()
            .await?;

        let transaction = check_status(response)?.json().await?;

        Ok(transaction)
    }
}
