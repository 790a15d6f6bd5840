use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use flowcast_core::money::Money;
use flowcast_core::records::TransactionRecord;

use crate::similarity::description_similarity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateSeverity {
    None,
    Possible,
    Likely,
}

/// An incoming row together with its duplicate verdict against the existing
/// ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRow {
    pub row: TransactionRecord,
    pub severity: DuplicateSeverity,
    pub best_score: f64,
}

impl ClassifiedRow {
    pub fn is_duplicate(&self) -> bool {
        self.severity != DuplicateSeverity::None
    }
}

fn default_likely() -> f64 {
    0.85
}

fn default_possible() -> f64 {
    0.6
}

#[derive(Deserialize)]
struct DetectorConfig {
    #[serde(default = "default_likely")]
    likely_threshold: f64,
    #[serde(default = "default_possible")]
    possible_threshold: f64,
}

/// Flags incoming transactions that look like rows already on file. Only
/// rows sharing a date and amount with an existing transaction are compared;
/// description similarity then grades them.
pub struct DuplicateDetector {
    pub likely_threshold: f64,
    pub possible_threshold: f64,
}

impl Default for DuplicateDetector {
    fn default() -> Self {
        Self {
            likely_threshold: default_likely(),
            possible_threshold: default_possible(),
        }
    }
}

impl DuplicateDetector {
    pub fn new(likely_threshold: f64, possible_threshold: f64) -> Self {
        Self {
            likely_threshold,
            possible_threshold,
        }
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        let config: DetectorConfig =
            toml::from_str(toml_content).map_err(|e| format!("Failed to parse TOML: {e}"))?;
        for (name, value) in [
            ("likely_threshold", config.likely_threshold),
            ("possible_threshold", config.possible_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{name} must be between 0.0 and 1.0, got {value}"));
            }
        }
        if config.possible_threshold > config.likely_threshold {
            return Err(format!(
                "possible_threshold ({}) must not exceed likely_threshold ({})",
                config.possible_threshold, config.likely_threshold
            ));
        }
        Ok(Self::new(config.likely_threshold, config.possible_threshold))
    }

    /// Grades every incoming row for the review screen. Nothing is filtered
    /// here; the caller decides what to do with possible duplicates.
    pub fn preview(
        &self,
        incoming: &[TransactionRecord],
        existing: &[TransactionRecord],
    ) -> Vec<ClassifiedRow> {
        let index = index_by_date_and_amount(existing);
        incoming.iter().map(|row| self.classify(row, &index)).collect()
    }

    /// Keeps the incoming rows that are not likely duplicates of an existing
    /// transaction. Possible duplicates pass through; committing them is a
    /// judgement call the caller already had a chance to make in preview.
    pub fn filter_new(
        &self,
        incoming: &[TransactionRecord],
        existing: &[TransactionRecord],
    ) -> Vec<TransactionRecord> {
        let index = index_by_date_and_amount(existing);
        let mut kept = Vec::new();

        for row in incoming {
            let is_duplicate = index.get(&(row.date, row.amount)).is_some_and(|candidates| {
                candidates.iter().any(|candidate| {
                    description_similarity(&row.description, &candidate.description)
                        >= self.likely_threshold
                })
            });
            if !is_duplicate {
                kept.push(row.clone());
            }
        }

        if kept.len() < incoming.len() {
            tracing::debug!(
                "Dropped {} of {} incoming rows as likely duplicates",
                incoming.len() - kept.len(),
                incoming.len()
            );
        }
        kept
    }

    fn classify(
        &self,
        row: &TransactionRecord,
        index: &HashMap<(NaiveDate, Money), Vec<&TransactionRecord>>,
    ) -> ClassifiedRow {
        let candidates = match index.get(&(row.date, row.amount)) {
            Some(candidates) => candidates,
            None => {
                return ClassifiedRow {
                    row: row.clone(),
                    severity: DuplicateSeverity::None,
                    best_score: 0.0,
                };
            }
        };

        let mut best_score = 0.0_f64;
        for candidate in candidates {
            let score = description_similarity(&row.description, &candidate.description);
            if score > best_score {
                best_score = score;
            }
        }

        let severity = if best_score >= self.likely_threshold {
            DuplicateSeverity::Likely
        } else if best_score >= self.possible_threshold {
            DuplicateSeverity::Possible
        } else {
            DuplicateSeverity::None
        };

        ClassifiedRow {
            row: row.clone(),
            severity,
            best_score,
        }
    }
}

fn index_by_date_and_amount(
    existing: &[TransactionRecord],
) -> HashMap<(NaiveDate, Money), Vec<&TransactionRecord>> {
    let mut index: HashMap<(NaiveDate, Money), Vec<&TransactionRecord>> = HashMap::new();
    for transaction in existing {
        index
            .entry((transaction.date, transaction.amount))
            .or_default()
            .push(transaction);
    }
    index
}
