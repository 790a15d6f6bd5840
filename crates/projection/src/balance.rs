use chrono::NaiveDate;

use flowcast_core::money::Money;
use flowcast_core::records::{OpeningBalance, TransactionRecord};

/// The balance right now: the opening amount plus every transaction dated on
/// or after it. Without an opening balance there is nothing to count from.
pub fn current_balance(
    opening: Option<&OpeningBalance>,
    transactions: &[TransactionRecord],
) -> Money {
    replay(opening, transactions, None)
}

/// The balance as of `as_of`, replaying only transactions between the
/// opening date and `as_of`, both inclusive.
pub fn balance_as_of(
    opening: Option<&OpeningBalance>,
    transactions: &[TransactionRecord],
    as_of: NaiveDate,
) -> Money {
    replay(opening, transactions, Some(as_of))
}

fn replay(
    opening: Option<&OpeningBalance>,
    transactions: &[TransactionRecord],
    up_to: Option<NaiveDate>,
) -> Money {
    let opening = match opening {
        Some(opening) => opening,
        None => return Money::zero(),
    };

    let mut total = opening.amount;
    for transaction in transactions {
        if transaction.date < opening.as_of {
            continue;
        }
        if let Some(limit) = up_to {
            if transaction.date > limit {
                continue;
            }
        }
        total = total + transaction.amount;
    }
    total
}
