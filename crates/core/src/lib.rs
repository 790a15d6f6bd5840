pub mod money;
pub mod period;
pub mod records;
pub mod schedule;

pub use money::Money;
pub use period::DateWindow;
pub use records::{
    BillId, BillRule, DebtAccount, DebtId, IncomeId, IncomeRule, OpeningBalance, RecordError,
    TransactionRecord,
};
pub use schedule::{Frequency, Schedule, ScheduleError};
