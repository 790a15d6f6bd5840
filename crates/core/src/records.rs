use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::money::Money;
use super::schedule::{Frequency, Schedule, ScheduleError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IncomeId(pub i64);

impl fmt::Display for IncomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillId(pub i64);

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DebtId(pub i64);

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Amount {0} must not be negative")]
    NegativeAmount(Money),
    #[error("Past due amount {0} must not be negative")]
    NegativePastDue(Money),
    #[error("Past due amount {0} is set but the bill is not flagged past due")]
    PastDueWithoutFlag(Money),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A recurring pay stream. Each occurrence adds `amount` to the week it
/// lands in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRule {
    pub id: IncomeId,
    pub name: String,
    pub amount: Money,
    pub schedule: Schedule,
    pub active: bool,
}

impl IncomeRule {
    pub fn new(
        id: IncomeId,
        name: &str,
        amount: Money,
        schedule: Schedule,
    ) -> Result<Self, RecordError> {
        if amount.is_negative() {
            return Err(RecordError::NegativeAmount(amount));
        }
        schedule.require_days()?;
        Ok(IncomeRule {
            id,
            name: name.to_string(),
            amount,
            schedule,
            active: true,
        })
    }
}

/// A recurring obligation, tracked by its next due date rather than a full
/// schedule. A past-due balance is charged once, on the first projected
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillRule {
    pub id: BillId,
    pub name: String,
    pub amount: Money,
    pub frequency: Frequency,
    pub next_due: NaiveDate,
    pub is_past_due: bool,
    pub past_due_amount: Money,
    pub essential: bool,
    pub active: bool,
}

impl BillRule {
    pub fn new(id: BillId, name: &str, amount: Money, frequency: Frequency, next_due: NaiveDate) -> Self {
        BillRule {
            id,
            name: name.to_string(),
            amount,
            frequency,
            next_due,
            is_past_due: false,
            past_due_amount: Money::zero(),
            essential: true,
            active: true,
        }
    }

    pub fn with_past_due(mut self, is_past_due: bool, past_due_amount: Money) -> Result<Self, RecordError> {
        if past_due_amount.is_negative() {
            return Err(RecordError::NegativePastDue(past_due_amount));
        }
        if !is_past_due && !past_due_amount.is_zero() {
            return Err(RecordError::PastDueWithoutFlag(past_due_amount));
        }
        self.is_past_due = is_past_due;
        self.past_due_amount = past_due_amount;
        Ok(self)
    }

    /// The recurrence this bill expands to: anchored at the next due date,
    /// open ended, no pinned days.
    pub fn schedule(&self) -> Schedule {
        Schedule::new(self.frequency, self.next_due)
    }
}

/// A debt paid down by its minimum payment once per month until the balance
/// reaches zero. The APR is informational; projections do not accrue
/// interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtAccount {
    pub id: DebtId,
    pub name: String,
    pub balance: Money,
    pub apr_percent: Decimal,
    pub minimum_payment: Money,
    pub next_due: NaiveDate,
    pub essential: bool,
}

impl DebtAccount {
    pub fn new(
        id: DebtId,
        name: &str,
        balance: Money,
        apr_percent: Decimal,
        minimum_payment: Money,
        next_due: NaiveDate,
    ) -> Self {
        DebtAccount {
            id,
            name: name.to_string(),
            balance,
            apr_percent,
            minimum_payment,
            next_due,
            essential: false,
        }
    }
}

/// A known-good balance at a point in time. Everything later is derived by
/// replaying transactions on top of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBalance {
    pub amount: Money,
    pub as_of: NaiveDate,
}

impl OpeningBalance {
    pub fn new(amount: Money, as_of: NaiveDate) -> Self {
        OpeningBalance { amount, as_of }
    }
}

/// A settled bank transaction. The sign of `amount` carries direction:
/// positive or zero is money in, negative is money out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: Option<String>,
}

impl TransactionRecord {
    pub fn new(date: NaiveDate, description: &str, amount: Money) -> Self {
        TransactionRecord {
            date,
            description: description.to_string(),
            amount,
            category: None,
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn is_inflow(&self) -> bool {
        !self.amount.is_negative()
    }
}
