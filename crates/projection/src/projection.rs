use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use flowcast_core::money::Money;
use flowcast_core::period::DateWindow;
use flowcast_core::records::{BillId, BillRule, DebtAccount, DebtId, IncomeRule};

use crate::calendar;

/// One week of the cash-flow forecast. Each week's `ending_balance` is the
/// next week's `starting_balance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub starting_balance: Money,
    pub total_income: Money,
    pub total_bills: Money,
    pub total_debt_payments: Money,
    pub ending_balance: Money,
}

impl WeekSnapshot {
    /// A week that ends in the red.
    pub fn is_shortfall(&self) -> bool {
        self.ending_balance.is_negative()
    }
}

/// Working copy of a debt while a projection runs. The caller's records are
/// never written back.
#[derive(Debug, Clone, Copy)]
struct DebtSimState {
    balance: Money,
    next_due: NaiveDate,
    minimum_payment: Money,
}

/// Simulates the cash balance week by week: income and bill occurrences come
/// from the recurrence calendar, debts amortize by their minimum payment
/// until the simulated balance reaches zero.
pub struct CashFlowProjector {
    pub weeks: usize,
}

impl Default for CashFlowProjector {
    fn default() -> Self {
        Self { weeks: 26 }
    }
}

impl CashFlowProjector {
    pub fn new(weeks: usize) -> Self {
        Self { weeks }
    }

    /// Runs the forecast with the first seven-day window starting at `today`.
    /// Inactive incomes and bills are ignored.
    pub fn project(
        &self,
        opening_balance: Money,
        today: NaiveDate,
        incomes: &[IncomeRule],
        bills: &[BillRule],
        debts: &[DebtAccount],
    ) -> Vec<WeekSnapshot> {
        tracing::debug!("Projecting {} weeks from {}", self.weeks, today);

        let mut debt_state: HashMap<DebtId, DebtSimState> = debts
            .iter()
            .map(|debt| {
                (
                    debt.id,
                    DebtSimState {
                        balance: debt.balance,
                        next_due: debt.next_due,
                        minimum_payment: debt.minimum_payment,
                    },
                )
            })
            .collect();

        // Each past-due balance is charged once, on the first projected
        // occurrence of its bill.
        let mut pending_past_due: HashMap<BillId, Money> = bills
            .iter()
            .filter(|bill| bill.is_past_due && !bill.past_due_amount.is_zero())
            .map(|bill| (bill.id, bill.past_due_amount))
            .collect();

        let mut snapshots = Vec::with_capacity(self.weeks);
        let mut balance = opening_balance;

        for i in 0..self.weeks {
            let week = DateWindow::week(today, i);

            let total_income = week_income(incomes, week);
            let total_bills = week_bills(bills, &mut pending_past_due, week);
            let total_debt_payments = week_debt_payments(debts, &mut debt_state, week);

            let ending_balance = balance + total_income - total_bills - total_debt_payments;
            snapshots.push(WeekSnapshot {
                week_start: week.start,
                week_end: week.end,
                starting_balance: balance,
                total_income,
                total_bills,
                total_debt_payments,
                ending_balance,
            });
            balance = ending_balance;
        }

        snapshots
    }

    /// `project` with the first window anchored at the local calendar date.
    pub fn project_from_today(
        &self,
        opening_balance: Money,
        incomes: &[IncomeRule],
        bills: &[BillRule],
        debts: &[DebtAccount],
    ) -> Vec<WeekSnapshot> {
        let today = chrono::Local::now().date_naive();
        self.project(opening_balance, today, incomes, bills, debts)
    }
}

fn week_income(incomes: &[IncomeRule], week: DateWindow) -> Money {
    let mut total = Money::zero();
    for rule in incomes.iter().filter(|rule| rule.active) {
        for _date in calendar::occurrences(rule.schedule, week) {
            total = total + rule.amount;
        }
    }
    total
}

fn week_bills(
    bills: &[BillRule],
    pending_past_due: &mut HashMap<BillId, Money>,
    week: DateWindow,
) -> Money {
    let mut total = Money::zero();
    for bill in bills.iter().filter(|bill| bill.active) {
        for _date in calendar::occurrences(bill.schedule(), week) {
            total = total + bill.amount;
            if let Some(past_due) = pending_past_due.remove(&bill.id) {
                total = total + past_due;
            }
        }
    }
    total
}

fn week_debt_payments(
    debts: &[DebtAccount],
    state: &mut HashMap<DebtId, DebtSimState>,
    week: DateWindow,
) -> Money {
    let mut total = Money::zero();
    for debt in debts {
        if let Some(sim) = state.get_mut(&debt.id) {
            if week.contains(sim.next_due) && sim.balance > Money::zero() {
                let payment = sim.minimum_payment.min(sim.balance);
                total = total + payment;
                sim.balance = sim.balance - payment;
                sim.next_due = calendar::add_months(sim.next_due, 1);
            }
        }
    }
    total
}
