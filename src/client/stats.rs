//! Totals derived from the fetched transactions.

use crate::transaction::{Transaction, TransactionType};

/// Income, expense and balance totals over a set of transactions.
///
/// Always derived from the full list, never stored or sent to the API.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stats {
    /// The sum of the amounts of income transactions.
    pub income: f64,
    /// The sum of the amounts of expense transactions.
    pub expenses: f64,
    /// `income - expenses`.
    pub balance: f64,
    /// The number of income transactions.
    pub income_count: usize,
    /// The number of expense transactions.
    pub expense_count: usize,
}

impl Stats {
    /// Sum `transactions` by type.
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = transactions
            .iter()
            .fold(Stats::default(), |mut stats, transaction| {
                match transaction.kind {
                    TransactionType::Income => {
                        stats.income += transaction.amount;
                        stats.income_count += 1;
                    }
                    TransactionType::Expense => {
                        stats.expenses += transaction.amount;
                        stats.expense_count += 1;
                    }
                }

                stats
            });

        stats.balance = stats.income - stats.expenses;
        stats
    }

    /// Whether more money came in than went out (or exactly as much).
    pub fn is_balance_positive(&self) -> bool {
        self.balance >= 0.0
    }
}
