//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and listing transactions
//! - The JSON route handlers for creating and listing transactions

mod core;
mod create_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionBuilder, TransactionType, create_transaction_table,
};
pub use create_endpoint::create_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub use core::{count_transactions, create_transaction};
