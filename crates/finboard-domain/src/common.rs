//! Shared traits and calendar primitives for finance entities.

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DomainError;

/// Exposes a stable identifier for entities kept in collections.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// A calendar month. Always holds a valid first-of-month date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth", into = "RawYearMonth")]
pub struct YearMonth(NaiveDate);

#[derive(Serialize, Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = DomainError;

    fn try_from(raw: RawYearMonth) -> Result<Self, Self::Error> {
        YearMonth::new(raw.year, raw.month)
    }
}

impl From<YearMonth> for RawYearMonth {
    fn from(value: YearMonth) -> Self {
        RawYearMonth {
            year: value.year(),
            month: value.month(),
        }
    }
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(YearMonth)
            .ok_or(DomainError::OutOfRange { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth(date - Duration::days(i64::from(date.day0())))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn next(&self) -> Self {
        self.0
            .checked_add_months(Months::new(1))
            .map(YearMonth)
            .unwrap_or(*self)
    }

    pub fn previous(&self) -> Self {
        self.back(1)
    }

    /// The month `months` before this one, saturating at the calendar minimum.
    pub fn back(&self, months: u32) -> Self {
        self.0
            .checked_sub_months(Months::new(months))
            .map(YearMonth)
            .unwrap_or(*self)
    }

    /// Inclusive `[first day, last day]` range of the month.
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.first_day(),
            end: self.last_day(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month(), self.year())
    }
}

/// Inclusive date range `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// `[today, today + days]`, the look-ahead used for upcoming payments.
    pub fn upcoming(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_signed(Duration::days(i64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First day after the range, used for half-open backend queries.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().unwrap_or(self.end)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_month_rejects_invalid_month() {
        assert_eq!(YearMonth::new(2024, 13), Err(DomainError::InvalidMonth(13)));
        assert_eq!(YearMonth::new(2024, 0), Err(DomainError::InvalidMonth(0)));
    }

    #[test]
    fn year_month_range_handles_leap_february() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.range(), DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let dec = YearMonth::new(2023, 12).unwrap();
        assert_eq!(dec.last_day(), date(2023, 12, 31));
        assert_eq!(dec.next(), YearMonth::new(2024, 1).unwrap());
        assert_eq!(dec.range().end_exclusive(), date(2024, 1, 1));
    }

    #[test]
    fn back_crosses_year_boundary() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.back(5), YearMonth::new(2023, 9).unwrap());
        assert_eq!(feb.previous(), YearMonth::new(2024, 1).unwrap());
    }

    #[test]
    fn of_truncates_to_first_day() {
        assert_eq!(YearMonth::of(date(2024, 3, 17)).first_day(), date(2024, 3, 1));
    }

    #[test]
    fn year_month_serializes_as_year_and_month() {
        let value = serde_json::to_value(YearMonth::new(2024, 5).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({ "year": 2024, "month": 5 }));
        let bad: Result<YearMonth, _> = serde_json::from_value(serde_json::json!({
            "year": 2024,
            "month": 14
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn upcoming_range_is_inclusive() {
        let range = DateRange::upcoming(date(2024, 1, 28), 7);
        assert_eq!(range.end, date(2024, 2, 4));
        assert!(range.contains(date(2024, 1, 28)));
        assert!(range.contains(date(2024, 2, 4)));
        assert!(!range.contains(date(2024, 2, 5)));
        assert_eq!(range.days(), 8);
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).is_err());
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }
}
