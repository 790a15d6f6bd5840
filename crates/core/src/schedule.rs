use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    OneTime,
    Weekly,
    BiWeekly,
    SemiMonthly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::OneTime => write!(f, "One-time"),
            Frequency::Weekly => write!(f, "Weekly"),
            Frequency::BiWeekly => write!(f, "Bi-weekly"),
            Frequency::SemiMonthly => write!(f, "Semi-monthly"),
            Frequency::Monthly => write!(f, "Monthly"),
            Frequency::Yearly => write!(f, "Yearly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "onetime" | "one-time" => Ok(Frequency::OneTime),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" | "bi-weekly" => Ok(Frequency::BiWeekly),
            "semimonthly" | "semi-monthly" => Ok(Frequency::SemiMonthly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(format!("Unknown frequency: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Day of month {0} is outside 1..=31")]
    DayOutOfRange(u32),
    #[error("{0} schedules need a day of month")]
    MissingFirstDay(Frequency),
    #[error("Semi-monthly schedules need a second day of month")]
    MissingSecondDay,
    #[error("First pay day {0} must come before second pay day {1}")]
    DayOrder(u32, u32),
}

/// When a recurring amount lands: a frequency anchored at a start date,
/// optionally bounded by an end date and pinned to days of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub frequency: Frequency,
    pub anchor: NaiveDate,
    pub end: Option<NaiveDate>,
    /// Day of month for monthly schedules, or the first of the two
    /// semi-monthly pay days.
    pub day1: Option<u32>,
    /// Second semi-monthly pay day.
    pub day2: Option<u32>,
}

impl Schedule {
    pub fn new(frequency: Frequency, anchor: NaiveDate) -> Self {
        Schedule {
            frequency,
            anchor,
            end: None,
            day1: None,
            day2: None,
        }
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Pins the schedule to days of the month. Days must sit in 1..=31, and a
    /// semi-monthly pair must be given in order.
    pub fn with_days(mut self, day1: Option<u32>, day2: Option<u32>) -> Result<Self, ScheduleError> {
        for day in [day1, day2].into_iter().flatten() {
            if !(1..=31).contains(&day) {
                return Err(ScheduleError::DayOutOfRange(day));
            }
        }
        if self.frequency == Frequency::SemiMonthly {
            if let (Some(d1), Some(d2)) = (day1, day2) {
                if d1 >= d2 {
                    return Err(ScheduleError::DayOrder(d1, d2));
                }
            }
        }
        self.day1 = day1;
        self.day2 = day2;
        Ok(self)
    }

    /// The stricter day requirements income rules carry: monthly pay needs an
    /// explicit day, semi-monthly pay needs both.
    pub fn require_days(&self) -> Result<(), ScheduleError> {
        match self.frequency {
            Frequency::Monthly | Frequency::SemiMonthly if self.day1.is_none() => {
                Err(ScheduleError::MissingFirstDay(self.frequency))
            }
            Frequency::SemiMonthly if self.day2.is_none() => Err(ScheduleError::MissingSecondDay),
            _ => Ok(()),
        }
    }
}
