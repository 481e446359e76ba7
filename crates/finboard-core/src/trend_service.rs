//! Rolling month-by-month income and expense series.

use rust_decimal::Decimal;
use serde::Serialize;

use finboard_domain::{Transaction, YearMonth};

use crate::{summary_service::SummaryService, CoreError};

/// Default rolling window length, in months.
pub const DEFAULT_TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub period: YearMonth,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeriesStats {
    pub total: Decimal,
    pub mean: Decimal,
    /// Month-over-month change of the latest month, `None` when the previous month is 0.
    pub change_percent: Option<Decimal>,
}

impl SeriesStats {
    fn from_values(values: &[Decimal]) -> Self {
        let total: Decimal = values.iter().copied().sum();
        let mean = if values.is_empty() {
            Decimal::ZERO
        } else {
            total / Decimal::from(values.len())
        };
        let change_percent = match values {
            [.., previous, last] if !previous.is_zero() => {
                Some((*last - *previous) * Decimal::ONE_HUNDRED / *previous)
            }
            _ => None,
        };
        Self {
            total,
            mean,
            change_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendReport {
    /// Oldest month first, ending at the requested month.
    pub months: Vec<MonthlyTotals>,
    pub income: SeriesStats,
    pub expense: SeriesStats,
}

pub struct TrendService;

impl TrendService {
    /// Paid totals for the `months` calendar months up to and including `end`.
    pub fn rolling(
        transactions: &[Transaction],
        end: YearMonth,
        months: u32,
    ) -> Result<TrendReport, CoreError> {
        if months == 0 {
            return Err(CoreError::EmptyTrendWindow);
        }
        let series: Vec<MonthlyTotals> = (0..months)
            .rev()
            .map(|offset| {
                let period = end.back(offset);
                let totals = SummaryService::period_totals(transactions, period);
                MonthlyTotals {
                    period,
                    income: totals.income,
                    expense: totals.expense,
                    balance: totals.balance,
                }
            })
            .collect();

        let income: Vec<Decimal> = series.iter().map(|month| month.income).collect();
        let expense: Vec<Decimal> = series.iter().map(|month| month.expense).collect();
        Ok(TrendReport {
            income: SeriesStats::from_values(&income),
            expense: SeriesStats::from_values(&expense),
            months: series,
        })
    }
}
