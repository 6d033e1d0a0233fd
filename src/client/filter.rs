//! Narrowing and truncating the transaction list for display.

use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionType};

/// The most transactions the dashboard lists at once.
pub const RECENT_TRANSACTIONS_LIMIT: usize = 5;

/// Which transactions the dashboard lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every transaction.
    #[default]
    All,
    /// Only income.
    Income,
    /// Only expenses.
    Expense,
}

impl Filter {
    /// Every filter, in the order the filter buttons are shown.
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Income, Filter::Expense];

    /// Whether `transaction` passes this filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            Filter::All => true,
            Filter::Income => transaction.kind == TransactionType::Income,
            Filter::Expense => transaction.kind == TransactionType::Expense,
        }
    }

    /// The lowercase name used in HTML forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Income => "income",
            Filter::Expense => "expense",
        }
    }

    /// The text shown on the filter's button.
    pub fn label(&self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Income => "Income",
            Filter::Expense => "Expense",
        }
    }
}

/// Select the transactions that pass `filter`, keeping their original order.
pub fn filter_transactions(transactions: &[Transaction], filter: Filter) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction))
        .collect()
}

/// The part of the filtered transactions the dashboard lists.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListView<'a> {
    /// The first [RECENT_TRANSACTIONS_LIMIT] filtered transactions.
    pub shown: Vec<&'a Transaction>,
    /// The number of transactions that passed the filter.
    pub total: usize,
}

impl<'a> TransactionListView<'a> {
    /// Filter `transactions` and keep the first [RECENT_TRANSACTIONS_LIMIT].
    pub fn new(transactions: &'a [Transaction], filter: Filter) -> Self {
        let mut shown = filter_transactions(transactions, filter);
        let total = shown.len();
        shown.truncate(RECENT_TRANSACTIONS_LIMIT);

        Self { shown, total }
    }

    /// How many filtered transactions are not listed.
    pub fn remaining(&self) -> usize {
        self.total - self.shown.len()
    }

    /// Whether no transaction passed the filter.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
