use carteira_core::ExistingTransaction;
use rust_decimal::Decimal;

use crate::model::ImportedTransaction;

/// Amounts closer than one cent count as the same amount.
const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Drops freshly parsed transactions that already exist in the ledger.
///
/// A parsed transaction is a duplicate iff some existing transaction has the
/// same date, an amount within [`AMOUNT_TOLERANCE`], and — when the import
/// carries an OFX fitid — a description containing that fitid. CSV imports
/// have no fitid, so for them date+amount alone decides.
///
/// This runs before anything is offered for persistence; it is the only
/// place re-imports get caught. Input order is preserved and neither slice
/// is mutated.
pub fn filter_duplicates(
    imported: &[ImportedTransaction],
    existing: &[ExistingTransaction],
) -> Vec<ImportedTransaction> {
    let kept: Vec<ImportedTransaction> = imported
        .iter()
        .filter(|tx| !existing.iter().any(|known| is_duplicate(tx, known)))
        .cloned()
        .collect();

    tracing::debug!(
        imported = imported.len(),
        kept = kept.len(),
        "filtered duplicate transactions"
    );
    kept
}

fn is_duplicate(tx: &ImportedTransaction, known: &ExistingTransaction) -> bool {
    if tx.date != known.date {
        return false;
    }
    if (tx.amount - known.amount).abs() > AMOUNT_TOLERANCE {
        return false;
    }
    match &tx.fitid {
        Some(fitid) => known.description.contains(fitid.as_str()),
        None => true,
    }
}
