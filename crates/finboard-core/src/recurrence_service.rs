//! Lazy expansion of recurrence rules into concrete occurrence dates.

use std::iter::FusedIterator;

use chrono::{Datelike, NaiveDate};

use finboard_domain::{DateRange, RecurrenceRule, Step};

use crate::CoreError;

/// Ascending, deduplicated occurrence dates of one rule inside a window.
///
/// Dates are computed from the rule's start date (`start + k * step`) rather than from the
/// previous occurrence, so clamping a month-end date never drifts later occurrences.
#[derive(Debug, Clone)]
pub struct Occurrences {
    rule: RecurrenceRule,
    index: u64,
    lower: NaiveDate,
    upper: NaiveDate,
    last: Option<NaiveDate>,
    done: bool,
}

impl Occurrences {
    fn new(rule: &RecurrenceRule, window: DateRange) -> Self {
        let upper = match rule.end_date {
            Some(end) => end.min(window.end),
            None => window.end,
        };
        let done = rule.start_date > upper || window.start > upper;
        let index = if done {
            0
        } else {
            first_index_on_or_after(rule, window.start)
        };
        Self {
            rule: rule.clone(),
            index,
            lower: window.start,
            upper,
            last: None,
            done,
        }
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        while !self.done {
            let Some(date) = self.rule.occurrence(self.index) else {
                self.done = true;
                break;
            };
            self.index += 1;
            if date > self.upper {
                self.done = true;
                break;
            }
            if date < self.lower || self.last == Some(date) {
                continue;
            }
            self.last = Some(date);
            return Some(date);
        }
        None
    }
}

impl FusedIterator for Occurrences {}

/// Smallest occurrence index whose date could fall on or after `lower`.
fn first_index_on_or_after(rule: &RecurrenceRule, lower: NaiveDate) -> u64 {
    let start = rule.start_date;
    if lower <= start {
        return 0;
    }
    match rule.step() {
        Step::Days(days) if days > 0 => {
            let delta = (lower - start).num_days();
            u64::try_from((delta + days - 1) / days).unwrap_or(0)
        }
        Step::Months(months) if months > 0 => {
            let elapsed = (lower.year() - start.year()) * 12 + lower.month() as i32
                - start.month() as i32;
            // One step back: the clamped occurrence in the month before may still be skipped.
            let steps = elapsed / months as i32 - 1;
            u64::try_from(steps).unwrap_or(0)
        }
        _ => 0,
    }
}

pub struct RecurrenceService;

impl RecurrenceService {
    /// Expands `rule` within `window`. Rules that fail validation are rejected before any
    /// date is produced.
    pub fn expand(rule: &RecurrenceRule, window: DateRange) -> Result<Occurrences, CoreError> {
        rule.validate().map_err(CoreError::InvalidRule)?;
        Ok(Occurrences::new(rule, window))
    }

    /// Next occurrence on or after `from`, if the series has not ended.
    pub fn next_due(rule: &RecurrenceRule, from: NaiveDate) -> Result<Option<NaiveDate>, CoreError> {
        let horizon = rule.end_date.unwrap_or(NaiveDate::MAX);
        if horizon < from {
            return Ok(None);
        }
        let window = DateRange::new(from, horizon)?;
        Ok(Self::expand(rule, window)?.next())
    }
}
