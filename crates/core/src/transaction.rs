use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a money movement. Imports never produce transfers — neither
/// statement dialect carries that information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Direction implied by a signed statement amount: non-negative is income.
    pub fn from_signed(amount: Decimal) -> Self {
        if amount >= Decimal::ZERO {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

/// Minimal view of a transaction already persisted in the user's ledger.
/// Read-only input to duplicate detection; the ledger itself lives behind
/// the app's storage layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub description: String,
}
