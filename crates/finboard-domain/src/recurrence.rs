//! Recurrence rules attached to recurring transactions.

use std::{fmt, str::FromStr};

use chrono::{Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{DomainError, ValidationErrors};

/// Calendar unit a recurrence advances by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceUnit {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

/// Concrete distance between two consecutive occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(i64),
    Months(u32),
}

impl RecurrenceUnit {
    pub const ALL: [RecurrenceUnit; 8] = [
        RecurrenceUnit::Daily,
        RecurrenceUnit::Weekly,
        RecurrenceUnit::Biweekly,
        RecurrenceUnit::Monthly,
        RecurrenceUnit::Bimonthly,
        RecurrenceUnit::Quarterly,
        RecurrenceUnit::Semiannual,
        RecurrenceUnit::Annual,
    ];

    /// Step for `interval` repetitions of this unit.
    pub fn step(self, interval: u32) -> Step {
        match self {
            RecurrenceUnit::Daily => Step::Days(i64::from(interval)),
            RecurrenceUnit::Weekly => Step::Days(7 * i64::from(interval)),
            RecurrenceUnit::Biweekly => Step::Days(14 * i64::from(interval)),
            RecurrenceUnit::Monthly => Step::Months(interval),
            RecurrenceUnit::Bimonthly => Step::Months(interval.saturating_mul(2)),
            RecurrenceUnit::Quarterly => Step::Months(interval.saturating_mul(3)),
            RecurrenceUnit::Semiannual => Step::Months(interval.saturating_mul(6)),
            RecurrenceUnit::Annual => Step::Months(interval.saturating_mul(12)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RecurrenceUnit::Daily => "daily",
            RecurrenceUnit::Weekly => "weekly",
            RecurrenceUnit::Biweekly => "biweekly",
            RecurrenceUnit::Monthly => "monthly",
            RecurrenceUnit::Bimonthly => "bimonthly",
            RecurrenceUnit::Quarterly => "quarterly",
            RecurrenceUnit::Semiannual => "semiannual",
            RecurrenceUnit::Annual => "annual",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            RecurrenceUnit::Daily => "day",
            RecurrenceUnit::Weekly => "week",
            RecurrenceUnit::Biweekly => "fortnight",
            RecurrenceUnit::Monthly => "month",
            RecurrenceUnit::Bimonthly => "two-month period",
            RecurrenceUnit::Quarterly => "quarter",
            RecurrenceUnit::Semiannual => "semester",
            RecurrenceUnit::Annual => "year",
        }
    }
}

impl fmt::Display for RecurrenceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrenceUnit {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        RecurrenceUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "recurrence unit",
                value: value.to_string(),
            })
    }
}

/// "Every `interval` `unit`s from `start_date`, optionally until `end_date`".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub unit: RecurrenceUnit,
    #[serde(default = "RecurrenceRule::default_interval")]
    pub interval: u32,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl RecurrenceRule {
    pub fn new(unit: RecurrenceUnit, start_date: NaiveDate) -> Self {
        Self {
            unit,
            interval: Self::default_interval(),
            start_date,
            end_date: None,
        }
    }

    pub fn default_interval() -> u32 {
        1
    }

    pub fn every(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn step(&self) -> Step {
        self.unit.step(self.interval)
    }

    /// Date of the `index`-th occurrence, always computed from the start date so
    /// month-based rules keep the original day-of-month where it exists.
    /// `None` when the date leaves chrono's representable range.
    pub fn occurrence(&self, index: u64) -> Option<NaiveDate> {
        match self.step() {
            Step::Days(days) => {
                let offset = i64::try_from(index).ok()?.checked_mul(days)?;
                self.start_date
                    .checked_add_signed(Duration::try_days(offset)?)
            }
            Step::Months(months) => {
                let offset = u32::try_from(index.checked_mul(u64::from(months))?).ok()?;
                self.start_date.checked_add_months(Months::new(offset))
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.interval == 0 {
            errors.add("recurrence_interval", "interval must be at least 1");
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                errors.add(
                    "recurrence_end_date",
                    "end date must not be before the start date",
                );
            }
        }
        errors.into_result()
    }

    pub fn label(&self) -> String {
        match self.interval {
            1 => {
                let mut label = self.unit.as_str().to_string();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                label
            }
            n => format!("Every {} {}s", n, self.unit.noun()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn units_map_to_expected_steps() {
        assert_eq!(RecurrenceUnit::Biweekly.step(1), Step::Days(14));
        assert_eq!(RecurrenceUnit::Weekly.step(3), Step::Days(21));
        assert_eq!(RecurrenceUnit::Quarterly.step(2), Step::Months(6));
        assert_eq!(RecurrenceUnit::Semiannual.step(1), Step::Months(6));
        assert_eq!(RecurrenceUnit::Annual.step(1), Step::Months(12));
    }

    #[test]
    fn monthly_occurrences_clamp_without_drifting() {
        let rule = RecurrenceRule::new(RecurrenceUnit::Monthly, date(2024, 1, 31));
        assert_eq!(rule.occurrence(1), Some(date(2024, 2, 29)));
        assert_eq!(rule.occurrence(2), Some(date(2024, 3, 31)));
        assert_eq!(rule.occurrence(3), Some(date(2024, 4, 30)));
    }

    #[test]
    fn annual_rule_from_leap_day_clamps_to_feb_28() {
        let rule = RecurrenceRule::new(RecurrenceUnit::Annual, date(2024, 2, 29));
        assert_eq!(rule.occurrence(1), Some(date(2025, 2, 28)));
        assert_eq!(rule.occurrence(4), Some(date(2028, 2, 29)));
    }

    #[test]
    fn validation_rejects_zero_interval_and_inverted_end() {
        let rule = RecurrenceRule::new(RecurrenceUnit::Weekly, date(2024, 5, 1))
            .every(0)
            .until(date(2024, 4, 1));
        let errors = rule.validate().unwrap_err();
        assert!(errors.contains("recurrence_interval"));
        assert!(errors.contains("recurrence_end_date"));
    }

    #[test]
    fn unit_parsing_is_case_insensitive_and_rejects_unknown() {
        assert_eq!("Quarterly".parse::<RecurrenceUnit>(), Ok(RecurrenceUnit::Quarterly));
        assert!("fortnightly".parse::<RecurrenceUnit>().is_err());
    }

    #[test]
    fn labels_read_naturally() {
        let start = date(2024, 1, 1);
        assert_eq!(RecurrenceRule::new(RecurrenceUnit::Monthly, start).label(), "Monthly");
        assert_eq!(
            RecurrenceRule::new(RecurrenceUnit::Weekly, start).every(2).label(),
            "Every 2 weeks"
        );
    }
}
