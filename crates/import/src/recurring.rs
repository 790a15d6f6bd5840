use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use flowcast_core::money::Money;
use flowcast_core::records::TransactionRecord;

use crate::similarity::normalize_description;

/// Payees whose outflows look like debt service rather than a plain bill.
const DEBT_KEYWORDS: &[&str] = &["CARD", "LOAN", "CAPITAL ONE", "CHASE", "DISCOVER"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionKind {
    Income,
    Bill,
    Debt,
}

/// A repeated payee worth promoting to an income, bill, or debt record.
/// `amount` is the rounded average of the group, signed by direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringSuggestion {
    pub description: String,
    pub amount: Money,
    pub occurrences: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub kind: SuggestionKind,
}

fn default_min_occurrences() -> usize {
    3
}

fn default_max_amount_spread() -> Money {
    Money::from_cents(100)
}

fn default_min_span_days() -> i64 {
    30
}

#[derive(Deserialize)]
struct DetectorConfig {
    #[serde(default = "default_min_occurrences")]
    min_occurrences: usize,
    #[serde(default = "default_max_amount_spread")]
    max_amount_spread: Money,
    #[serde(default = "default_min_span_days")]
    min_span_days: i64,
}

/// Finds transactions that repeat often enough, steadily enough, and long
/// enough to look like a recurring line item.
pub struct RecurringDetector {
    pub min_occurrences: usize,
    pub max_amount_spread: Money,
    pub min_span_days: i64,
}

impl Default for RecurringDetector {
    fn default() -> Self {
        Self {
            min_occurrences: default_min_occurrences(),
            max_amount_spread: default_max_amount_spread(),
            min_span_days: default_min_span_days(),
        }
    }
}

impl RecurringDetector {
    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        let config: DetectorConfig =
            toml::from_str(toml_content).map_err(|e| format!("Failed to parse TOML: {e}"))?;
        if config.max_amount_spread.is_negative() {
            return Err(format!(
                "max_amount_spread must not be negative, got {}",
                config.max_amount_spread
            ));
        }
        if config.min_span_days < 0 {
            return Err(format!(
                "min_span_days must not be negative, got {}",
                config.min_span_days
            ));
        }
        Ok(Self {
            min_occurrences: config.min_occurrences,
            max_amount_spread: config.max_amount_spread,
            min_span_days: config.min_span_days,
        })
    }

    pub fn find_recurring(&self, transactions: &[TransactionRecord]) -> Vec<RecurringSuggestion> {
        let mut groups: HashMap<(String, bool), Vec<&TransactionRecord>> = HashMap::new();
        for transaction in transactions {
            let key = (
                normalize_description(&transaction.description),
                transaction.is_inflow(),
            );
            groups.entry(key).or_default().push(transaction);
        }

        let mut suggestions = Vec::new();

        for ((description, inflow), mut group) in groups {
            group.sort_by_key(|transaction| transaction.date);

            if group.len() < self.min_occurrences {
                continue;
            }

            let amounts: Vec<Money> = group.iter().map(|t| t.amount.abs()).collect();
            let min = *amounts.iter().min().unwrap();
            let max = *amounts.iter().max().unwrap();
            if max - min > self.max_amount_spread {
                continue;
            }

            let first = group.first().unwrap();
            let last = group.last().unwrap();
            if (last.date - first.date).num_days() < self.min_span_days {
                continue;
            }

            let sum = amounts.iter().fold(Money::zero(), |a, b| a + *b);
            let average =
                Money::from_decimal(sum.as_decimal() / Decimal::from(amounts.len() as u64));
            let amount = if inflow { average } else { -average };
            let kind = suggest_kind(inflow, &description);

            suggestions.push(RecurringSuggestion {
                description,
                amount,
                occurrences: group.len(),
                first_date: first.date,
                last_date: last.date,
                kind,
            });
        }

        // Group order out of the map is arbitrary; pin it down for callers.
        suggestions.sort_by(|a, b| {
            (a.first_date, &a.description).cmp(&(b.first_date, &b.description))
        });

        tracing::debug!("Found {} recurring candidates", suggestions.len());
        suggestions
    }
}

fn suggest_kind(inflow: bool, normalized_description: &str) -> SuggestionKind {
    if inflow {
        return SuggestionKind::Income;
    }
    if DEBT_KEYWORDS
        .iter()
        .any(|keyword| normalized_description.contains(keyword))
    {
        return SuggestionKind::Debt;
    }
    SuggestionKind::Bill
}
