use carteira_core::TransactionKind;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Description used when a statement record carries no usable label.
pub(crate) const FALLBACK_DESCRIPTION: &str = "Transação importada";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Ofx,
    Csv,
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Ofx => write!(f, "OFX"),
            FileType::Csv => write!(f, "CSV"),
        }
    }
}

/// The canonical transaction shape both dialect parsers converge on.
///
/// `amount` is always a non-negative magnitude; the sign of the source record
/// lives in `kind`. Records missing a date or an amount never materialize as
/// one of these — they are skipped at parse time instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedTransaction {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub description: String,
    /// OFX `<MEMO>`, carried through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    /// OFX `<CHECKNUM>`, carried through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_num: Option<String>,
    /// OFX financial-institution transaction id; strengthens dedup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitid: Option<String>,
    /// Raw CSV source row, kept for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_line: Option<String>,
}

impl ImportedTransaction {
    /// Builds the canonical record from a signed source amount: the sign
    /// becomes the direction, the magnitude becomes `amount`.
    pub fn from_signed(date: NaiveDate, signed: Decimal, description: String) -> Self {
        ImportedTransaction {
            date,
            amount: signed.abs(),
            kind: TransactionKind::from_signed(signed),
            description,
            memo: None,
            check_num: None,
            fitid: None,
            original_line: None,
        }
    }
}

/// What an import run hands back to the review screen. Immutable once
/// returned; persisting the accepted rows is the caller's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// True iff at least one transaction was extracted. Row-level skips do
    /// not clear it; a fatal condition does.
    pub success: bool,
    pub transactions: Vec<ImportedTransaction>,
    /// Human-readable diagnostics, one per malformed record or fatal fault.
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ImportResult {
    pub(crate) fn for_type(file_type: FileType) -> Self {
        ImportResult {
            file_type: Some(file_type),
            ..ImportResult::default()
        }
    }

    /// A structural failure: no transactions, a single diagnostic.
    pub(crate) fn fatal(file_type: FileType, err: ImportError) -> Self {
        ImportResult {
            errors: vec![err.to_string()],
            ..ImportResult::for_type(file_type)
        }
    }

    pub(crate) fn push_error(&mut self, err: ImportError) {
        self.errors.push(err.to_string());
    }

    /// Stamps `success` and the statement period from the transactions in
    /// their current order. Callers that sort must do so first.
    pub(crate) fn finish(&mut self) {
        self.success = !self.transactions.is_empty();
        self.start_date = self.transactions.first().map(|t| t.date);
        self.end_date = self.transactions.last().map(|t| t.date);
    }
}
