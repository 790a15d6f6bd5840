pub mod balance;
pub mod calendar;
pub mod projection;

pub use balance::{balance_as_of, current_balance};
pub use calendar::{add_months, occurrences};
pub use projection::{CashFlowProjector, WeekSnapshot};
