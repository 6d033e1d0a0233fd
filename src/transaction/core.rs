//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// The direction money moved in a transaction.
///
/// Amounts are stored as magnitudes, so the type alone decides whether a
/// transaction adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money that was earned.
    Income,
    /// Money that was spent.
    #[default]
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON, HTML forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction dated now.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(description: &str, amount: f64, kind: TransactionType) -> TransactionBuilder {
        TransactionBuilder {
            description: description.to_owned(),
            amount,
            kind,
            date: OffsetDateTime::now_utc(),
        }
    }
}

/// The request body for creating a transaction.
///
/// The store assigns the ID and date, so neither is accepted from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The magnitude of the transaction.
    pub amount: f64,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// use crate::transaction::{Transaction, TransactionType};
///
/// let transaction = Transaction::build("Coffee", 4.5, TransactionType::Expense)
///     .date(datetime!(2025-01-15 08:30 UTC));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// A human-readable description of the transaction.
    ///
    /// # Examples
    /// - `"Salary - January 2025"`
    /// - `"Coffee"`
    pub description: String,

    /// The magnitude of the transaction, never negative.
    pub amount: f64,

    /// Whether the money was earned or spent.
    pub kind: TransactionType,

    /// When the transaction was recorded. Defaults to the time the builder
    /// was created.
    pub date: OffsetDateTime,
}

impl TransactionBuilder {
    /// Set the date for the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = date;
        self
    }
}

impl TryFrom<NewTransaction> for TransactionBuilder {
    type Error = Error;

    /// Validate a create request and turn it into a builder dated now.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if the trimmed description is empty,
    /// - or [Error::InvalidAmount] if the amount is negative, infinite or NaN.
    fn try_from(new_transaction: NewTransaction) -> Result<Self, Self::Error> {
        let description = new_transaction.description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        let amount = new_transaction.amount;

        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Transaction::build(description, amount, new_transaction.kind))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, type, date)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, description, amount, type, date",
        )?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.kind,
                builder.date,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve every transaction in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare("SELECT id, description, amount, type, date FROM \"transaction\" ORDER BY id")?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let date = row.get(4)?;

    Ok(Transaction {
        id,
        description,
        amount,
        kind,
        date,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Error,
        transaction::{NewTransaction, Transaction, TransactionBuilder, TransactionType},
    };

    #[test]
    fn transaction_type_round_trips_through_str() {
        assert_eq!(
            "income".parse::<TransactionType>(),
            Ok(TransactionType::Income)
        );
        assert_eq!(
            "expense".parse::<TransactionType>(),
            Ok(TransactionType::Expense)
        );
        assert_eq!(TransactionType::Income.to_string(), "income");
    }

    #[test]
    fn transaction_type_rejects_unknown_names() {
        let result = "refund".parse::<TransactionType>();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("refund".to_owned()))
        );
    }

    #[test]
    fn transaction_type_defaults_to_expense() {
        assert_eq!(TransactionType::default(), TransactionType::Expense);
    }

    #[test]
    fn serializes_with_type_field_and_rfc3339_date() {
        let transaction = Transaction {
            id: 7,
            description: "Coffee".to_owned(),
            amount: 4.5,
            kind: TransactionType::Expense,
            date: datetime!(2025-01-15 08:30 UTC),
        };

        let value = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "description": "Coffee",
                "amount": 4.5,
                "type": "expense",
                "date": "2025-01-15T08:30:00Z",
            })
        );
    }

    #[test]
    fn new_transaction_rejects_unknown_type() {
        let result = serde_json::from_value::<NewTransaction>(json!({
            "description": "Coffee",
            "amount": 4.5,
            "type": "refund",
        }));

        assert!(result.is_err());
    }

    #[test]
    fn builder_trims_description() {
        let builder = TransactionBuilder::try_from(NewTransaction {
            description: "  Salary  ".to_owned(),
            amount: 1000.0,
            kind: TransactionType::Income,
        })
        .unwrap();

        assert_eq!(builder.description, "Salary");
        assert_eq!(builder.amount, 1000.0);
        assert_eq!(builder.kind, TransactionType::Income);
    }

    #[test]
    fn builder_rejects_blank_description() {
        let result = TransactionBuilder::try_from(NewTransaction {
            description: "   ".to_owned(),
            amount: 1.0,
            kind: TransactionType::Expense,
        });

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    #[test]
    fn builder_rejects_negative_amount() {
        let result = TransactionBuilder::try_from(NewTransaction {
            description: "Refund".to_owned(),
            amount: -5.0,
            kind: TransactionType::Income,
        });

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn builder_rejects_infinite_amount() {
        let result = TransactionBuilder::try_from(NewTransaction {
            description: "Lottery".to_owned(),
            amount: f64::INFINITY,
            kind: TransactionType::Income,
        });

        assert_eq!(result, Err(Error::InvalidAmount(f64::INFINITY)));
    }
}
