pub mod dedup;
pub mod recurring;
pub mod similarity;

pub use dedup::{ClassifiedRow, DuplicateDetector, DuplicateSeverity};
pub use recurring::{RecurringDetector, RecurringSuggestion, SuggestionKind};
pub use similarity::{description_similarity, normalize_description};

pub mod import {
    use crate::*;
    use flowcast_core::records::TransactionRecord;

    /// Grades an incoming batch against the ledger for the review screen.
    pub fn preview_duplicates(
        incoming: &[TransactionRecord],
        existing: &[TransactionRecord],
    ) -> Vec<ClassifiedRow> {
        DuplicateDetector::default().preview(incoming, existing)
    }

    /// Drops likely duplicates from an incoming batch, returning the rows
    /// safe to commit.
    pub fn filter_new(
        incoming: &[TransactionRecord],
        existing: &[TransactionRecord],
    ) -> Vec<TransactionRecord> {
        DuplicateDetector::default().filter_new(incoming, existing)
    }

    /// Scans settled transactions for payees worth promoting to recurring
    /// records.
    pub fn suggest_recurring(transactions: &[TransactionRecord]) -> Vec<RecurringSuggestion> {
        RecurringDetector::default().find_recurring(transactions)
    }
}
