use chrono::{Datelike, Duration, NaiveDate};

use flowcast_core::period::DateWindow;
use flowcast_core::schedule::{Frequency, Schedule};

/// Expands a schedule into the concrete dates falling inside `window`,
/// in ascending order.
///
/// The anchor sets the phase: weekly and bi-weekly occurrences stay a whole
/// number of periods from it no matter how far ahead the window sits. Monthly
/// and semi-monthly dates past the end of a short month clamp to its last day.
pub fn occurrences(schedule: Schedule, window: DateWindow) -> Vec<NaiveDate> {
    let mut result = Vec::new();

    if let Some(end) = schedule.end {
        if end < window.start {
            return result;
        }
    }

    let mut current = schedule.anchor;

    // A pinned day of month overrides the anchor's own day, starting in the
    // anchor's month.
    if let Some(day1) = schedule.day1 {
        if matches!(schedule.frequency, Frequency::Monthly | Frequency::SemiMonthly) {
            current = clamped_date(current.year(), current.month(), day1);
        }
    }

    if current < window.start {
        current = match first_on_or_after(schedule, current, window.start) {
            Some(date) => date,
            None => return result,
        };
    }

    loop {
        if current > window.end {
            break;
        }
        if let Some(end) = schedule.end {
            if current > end {
                break;
            }
        }
        if current >= window.start {
            result.push(current);
        }
        current = match step(schedule, current) {
            Some(next) => next,
            None => break,
        };
    }

    result
}

/// The same day of month `months` later, clamped to the last day of the
/// target month when the source day does not exist there.
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    clamped_date(year, month as u32, date.day())
}

/// Walks `current` forward period by period until it reaches `target`.
/// Returns `None` for a one-time schedule whose only date lies behind the
/// target.
fn first_on_or_after(schedule: Schedule, mut current: NaiveDate, target: NaiveDate) -> Option<NaiveDate> {
    if schedule.frequency == Frequency::OneTime {
        return if current >= target { Some(current) } else { None };
    }

    while current < target {
        if let Some(end) = schedule.end {
            if current > end {
                break;
            }
        }
        current = step(schedule, current)?;
    }

    Some(current)
}

fn step(schedule: Schedule, current: NaiveDate) -> Option<NaiveDate> {
    match schedule.frequency {
        Frequency::OneTime => None,
        Frequency::Weekly => Some(current + Duration::days(7)),
        Frequency::BiWeekly => Some(current + Duration::days(14)),
        Frequency::SemiMonthly => Some(next_semi_monthly(current, schedule.day1, schedule.day2)),
        Frequency::Monthly => Some(next_monthly(current, schedule.day1)),
        Frequency::Yearly => Some(clamped_date(current.year() + 1, current.month(), current.day())),
    }
}

fn next_monthly(current: NaiveDate, day1: Option<u32>) -> NaiveDate {
    let (year, month) = month_after(current.year(), current.month());
    clamped_date(year, month, day1.unwrap_or(current.day()))
}

/// Semi-monthly dates visit both pay days of each month in turn. Days
/// default to the 1st and 15th when the schedule does not pin them.
fn next_semi_monthly(current: NaiveDate, day1: Option<u32>, day2: Option<u32>) -> NaiveDate {
    let day1 = day1.unwrap_or(1);
    let day2 = day2.unwrap_or(15);

    let dim = days_in_month(current.year(), current.month());
    let d1 = day1.min(dim);
    let d2 = day2.min(dim);

    if current.day() < d1 {
        return clamped_date(current.year(), current.month(), d1);
    }
    if current.day() < d2 {
        return clamped_date(current.year(), current.month(), d2);
    }

    let (year, month) = month_after(current.year(), current.month());
    clamped_date(year, month, day1)
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = month_after(year, month);
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    (first_of_next - Duration::days(1)).day()
}

fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateWindow {
        DateWindow::new(
            date(start.0, start.1, start.2),
            date(end.0, end.1, end.2),
        )
    }

    #[test]
    fn one_time_fires_only_inside_its_window() {
        let schedule = Schedule::new(Frequency::OneTime, date(2024, 3, 15));
        assert_eq!(
            occurrences(schedule, window((2024, 3, 10), (2024, 3, 16))),
            vec![date(2024, 3, 15)]
        );
        assert!(occurrences(schedule, window((2024, 3, 16), (2024, 3, 22))).is_empty());
        assert!(occurrences(schedule, window((2024, 3, 1), (2024, 3, 7))).is_empty());
    }

    #[test]
    fn weekly_lands_once_in_every_seven_day_window() {
        let schedule = Schedule::new(Frequency::Weekly, date(2024, 1, 5));
        for i in 0..30 {
            let w = DateWindow::week(date(2024, 1, 5), i);
            assert_eq!(occurrences(schedule, w).len(), 1, "week {}", i);
        }
    }

    #[test]
    fn bi_weekly_keeps_its_phase_far_from_the_anchor() {
        let anchor = date(2024, 1, 5);
        let schedule = Schedule::new(Frequency::BiWeekly, anchor);
        let found = occurrences(schedule, window((2024, 3, 10), (2024, 3, 16)));
        assert_eq!(found, vec![date(2024, 3, 15)]);
        assert_eq!((found[0] - anchor).num_days() % 14, 0);
    }

    #[test]
    fn monthly_day_31_clamps_to_short_months() {
        let schedule = Schedule::new(Frequency::Monthly, date(2024, 1, 10))
            .with_days(Some(31), None)
            .unwrap();
        assert_eq!(
            occurrences(schedule, window((2024, 2, 26), (2024, 3, 3))),
            vec![date(2024, 2, 29)]
        );
        assert_eq!(
            occurrences(schedule, window((2024, 4, 29), (2024, 5, 5))),
            vec![date(2024, 4, 30)]
        );
        // back on the 31st once the month allows it
        assert_eq!(
            occurrences(schedule, window((2024, 5, 27), (2024, 6, 2))),
            vec![date(2024, 5, 31)]
        );
    }

    #[test]
    fn monthly_day_pin_overrides_the_anchor_day() {
        let schedule = Schedule::new(Frequency::Monthly, date(2024, 1, 10))
            .with_days(Some(25), None)
            .unwrap();
        assert_eq!(
            occurrences(schedule, window((2024, 1, 22), (2024, 1, 28))),
            vec![date(2024, 1, 25)]
        );
    }

    #[test]
    fn semi_monthly_visits_both_pay_days() {
        let schedule = Schedule::new(Frequency::SemiMonthly, date(2024, 3, 1))
            .with_days(Some(1), Some(5))
            .unwrap();
        assert_eq!(
            occurrences(schedule, window((2024, 4, 1), (2024, 4, 7))),
            vec![date(2024, 4, 1), date(2024, 4, 5)]
        );
    }

    #[test]
    fn semi_monthly_yields_twenty_four_dates_a_year() {
        let schedule = Schedule::new(Frequency::SemiMonthly, date(2024, 1, 1))
            .with_days(Some(1), Some(15))
            .unwrap();
        let found = occurrences(schedule, window((2024, 1, 1), (2024, 12, 31)));
        assert_eq!(found.len(), 24);
        assert_eq!(found[0], date(2024, 1, 1));
        assert_eq!(found[23], date(2024, 12, 15));
    }

    #[test]
    fn semi_monthly_defaults_to_first_and_fifteenth() {
        // schedules without pinned days start at their anchor and then fall
        // back to the 1st/15th rhythm
        let schedule = Schedule::new(Frequency::SemiMonthly, date(2024, 3, 20));
        assert_eq!(
            occurrences(schedule, window((2024, 3, 18), (2024, 3, 24))),
            vec![date(2024, 3, 20)]
        );
        assert_eq!(
            occurrences(schedule, window((2024, 4, 1), (2024, 4, 7))),
            vec![date(2024, 4, 1)]
        );
        assert_eq!(
            occurrences(schedule, window((2024, 4, 14), (2024, 4, 20))),
            vec![date(2024, 4, 15)]
        );
    }

    #[test]
    fn end_date_stops_the_series() {
        let schedule = Schedule::new(Frequency::Weekly, date(2024, 1, 5)).with_end(date(2024, 1, 20));
        assert_eq!(
            occurrences(schedule, window((2024, 1, 1), (2024, 1, 31))),
            vec![date(2024, 1, 5), date(2024, 1, 12), date(2024, 1, 19)]
        );
    }

    #[test]
    fn ended_series_yields_nothing_after_its_end() {
        let schedule = Schedule::new(Frequency::Weekly, date(2024, 1, 5)).with_end(date(2024, 1, 20));
        assert!(occurrences(schedule, window((2024, 2, 1), (2024, 2, 7))).is_empty());
    }

    #[test]
    fn anchor_after_the_window_yields_nothing() {
        let schedule = Schedule::new(Frequency::Weekly, date(2024, 6, 1));
        assert!(occurrences(schedule, window((2024, 5, 1), (2024, 5, 7))).is_empty());
    }

    #[test]
    fn occurrence_on_the_window_edges_is_included() {
        let schedule = Schedule::new(Frequency::Weekly, date(2024, 1, 1));
        assert_eq!(
            occurrences(schedule, window((2024, 1, 1), (2024, 1, 7))),
            vec![date(2024, 1, 1)]
        );
        assert_eq!(
            occurrences(schedule, window((2024, 1, 2), (2024, 1, 8))),
            vec![date(2024, 1, 8)]
        );
    }

    #[test]
    fn yearly_clamps_leap_day() {
        let schedule = Schedule::new(Frequency::Yearly, date(2024, 2, 29));
        assert_eq!(
            occurrences(schedule, window((2025, 2, 24), (2025, 3, 2))),
            vec![date(2025, 2, 28)]
        );
    }

    #[test]
    fn add_months_clamps_and_carries_years() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(add_months(date(2024, 2, 29), 1), date(2024, 3, 29));
        assert_eq!(add_months(date(2024, 12, 15), 1), date(2025, 1, 15));
        assert_eq!(add_months(date(2024, 11, 30), 3), date(2025, 2, 28));
    }
}
