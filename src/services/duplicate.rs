//! Duplicate detection for imported transactions

use crate::models::Transaction;

/// Whether `candidate` repeats an existing entry
///
/// Only an exact match on date, amount and description counts; category and
/// type are ignored.
pub fn is_duplicate(candidate: &Transaction, ledger: &[Transaction]) -> bool {
    ledger.iter().any(|existing| {
        existing.date == candidate.date
            && existing.amount == candidate.amount
            && existing.description == candidate.description
    })
}
