//! Projection of recurring transactions into a future window.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use finboard_domain::{DateRange, Transaction, TransactionKind, TransactionStatus};

use crate::{recurrence_service::RecurrenceService, schedule_service::DEFAULT_UPCOMING_DAYS};

const MAX_FORECAST_OCCURRENCES: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduledStatus {
    Overdue,
    Pending,
    Future,
}

impl ScheduledStatus {
    pub fn classify(scheduled: NaiveDate, reference: NaiveDate) -> ScheduledStatus {
        if scheduled < reference {
            return ScheduledStatus::Overdue;
        }
        let pending_cutoff = reference + Duration::days(i64::from(DEFAULT_UPCOMING_DAYS));
        if scheduled <= pending_cutoff {
            ScheduledStatus::Pending
        } else {
            ScheduledStatus::Future
        }
    }
}

/// One projected occurrence of a recurring transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedOccurrence {
    pub transaction_id: Uuid,
    pub description: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub occurrence_index: usize,
    pub status: ScheduledStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ForecastTotals {
    pub generated: usize,
    pub projected_income: Decimal,
    pub projected_expense: Decimal,
    pub net: Decimal,
}

impl ForecastTotals {
    fn from_occurrences(occurrences: &[ProjectedOccurrence]) -> Self {
        let mut totals = ForecastTotals {
            generated: occurrences.len(),
            ..ForecastTotals::default()
        };
        for item in occurrences {
            match item.kind {
                TransactionKind::Income => totals.projected_income += item.amount,
                TransactionKind::Expense => totals.projected_expense += item.amount,
            }
        }
        totals.net = totals.projected_income - totals.projected_expense;
        totals
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub window: DateRange,
    pub reference_date: NaiveDate,
    pub occurrences: Vec<ProjectedOccurrence>,
    pub totals: ForecastTotals,
    /// Recurring transactions left out because their rule is invalid.
    pub skipped: Vec<Uuid>,
    /// Recurring transactions whose occurrences were cut off at the per-transaction cap.
    pub truncated: Vec<Uuid>,
}

pub struct ForecastService;

impl ForecastService {
    /// Expands every non-cancelled recurring transaction within `window`.
    ///
    /// At most `MAX_FORECAST_OCCURRENCES` dates are projected per transaction; templates
    /// that reach the cap are listed in [`Forecast::truncated`].
    pub fn window(transactions: &[Transaction], window: DateRange, reference: NaiveDate) -> Forecast {
        let mut occurrences = Vec::new();
        let mut skipped = Vec::new();
        let mut truncated = Vec::new();

        for template in transactions
            .iter()
            .filter(|txn| txn.is_recurring() && txn.status != TransactionStatus::Cancelled)
        {
            let Some(rule) = template.recurrence.as_ref() else {
                continue;
            };
            let mut dates = match RecurrenceService::expand(rule, window) {
                Ok(dates) => dates,
                Err(_) => {
                    skipped.push(template.id);
                    continue;
                }
            };
            let start = occurrences.len();
            occurrences.extend(dates.by_ref().take(MAX_FORECAST_OCCURRENCES).enumerate().map(
                |(index, date)| ProjectedOccurrence {
                    transaction_id: template.id,
                    description: template.description.clone(),
                    kind: template.kind,
                    amount: template.amount,
                    date,
                    account_id: template.account_id,
                    category_id: template.category_id,
                    occurrence_index: index,
                    status: ScheduledStatus::classify(date, reference),
                },
            ));
            if occurrences.len() - start == MAX_FORECAST_OCCURRENCES && dates.next().is_some() {
                truncated.push(template.id);
            }
        }

        occurrences.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.description.cmp(&b.description))
        });
        let totals = ForecastTotals::from_occurrences(&occurrences);

        Forecast {
            window,
            reference_date: reference,
            occurrences,
            totals,
            skipped,
            truncated,
        }
    }
}
