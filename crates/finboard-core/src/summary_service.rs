//! Period totals and groupings behind the report and dashboard views.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use finboard_domain::{
    Account, Category, CategoryKind, FilterSet, PaymentType, Transaction, TransactionKind,
    YearMonth,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Paid income and expense inside a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl PeriodTotals {
    fn add(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Income => self.income += transaction.amount,
            TransactionKind::Expense => self.expense += transaction.amount,
        }
        self.balance = self.income - self.expense;
    }

    /// Expense as a percentage of income, 0 without income.
    pub fn spending_ratio(&self) -> Decimal {
        percentage_of(self.expense, self.income)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category_id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub total: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountGroup {
    pub account_id: Uuid,
    pub name: String,
    pub color: String,
    pub total: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

/// Paid expense split by payment type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaymentTypeBreakdown {
    pub one_time: Decimal,
    pub fixed: Decimal,
    pub recurring: Decimal,
}

impl PaymentTypeBreakdown {
    pub fn get(&self, payment_type: PaymentType) -> Decimal {
        match payment_type {
            PaymentType::OneTime => self.one_time,
            PaymentType::Fixed => self.fixed,
            PaymentType::Recurring => self.recurring,
        }
    }

    pub fn total(&self) -> Decimal {
        self.one_time + self.fixed + self.recurring
    }
}

/// Totals over a listing regardless of status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    pub count: usize,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportView {
    pub period: YearMonth,
    pub totals: PeriodTotals,
    pub spending_ratio: Decimal,
    pub income_by_category: Vec<CategoryGroup>,
    pub expense_by_category: Vec<CategoryGroup>,
    pub expense_by_account: Vec<AccountGroup>,
    pub by_payment_type: PaymentTypeBreakdown,
}

/// `part / whole * 100`, 0 when `whole` is 0.
pub fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part * HUNDRED / whole
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Paid transactions dated inside `period`.
    pub fn paid_in_period(
        transactions: &[Transaction],
        period: YearMonth,
    ) -> impl Iterator<Item = &Transaction> {
        transactions
            .iter()
            .filter(move |txn| txn.is_paid() && period.contains(txn.transaction_date))
    }

    pub fn period_totals(transactions: &[Transaction], period: YearMonth) -> PeriodTotals {
        Self::totals(Self::paid_in_period(transactions, period))
    }

    fn totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        for txn in transactions {
            totals.add(txn);
        }
        totals
    }

    /// Paid `kind` transactions grouped by category. Uncategorised transactions and
    /// categories of the other type get no group but still count towards the grand total,
    /// so percentages are shares of every paid `kind` amount.
    pub fn group_by_category<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        categories: &[Category],
        kind: TransactionKind,
    ) -> Vec<CategoryGroup> {
        let wanted = CategoryKind::from(kind);
        let mut sums: HashMap<Uuid, (Decimal, usize)> = HashMap::new();
        let mut grand_total = Decimal::ZERO;
        for txn in transactions {
            if !txn.is_paid() || txn.kind != kind {
                continue;
            }
            grand_total += txn.amount;
            if let Some(category_id) = txn.category_id {
                let entry = sums.entry(category_id).or_default();
                entry.0 += txn.amount;
                entry.1 += 1;
            }
        }

        let mut groups: Vec<CategoryGroup> = categories
            .iter()
            .filter(|category| category.kind == wanted)
            .filter_map(|category| {
                let (total, count) = sums.get(&category.id).copied()?;
                (!total.is_zero()).then(|| CategoryGroup {
                    category_id: category.id,
                    name: category.name.clone(),
                    color: category.color.clone(),
                    icon: category.icon.clone(),
                    total,
                    count,
                    percentage: Decimal::ZERO,
                })
            })
            .collect();

        for group in &mut groups {
            group.percentage = percentage_of(group.total, grand_total);
        }
        groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        groups
    }

    /// Paid expenses grouped by account.
    pub fn group_by_account<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        accounts: &[Account],
    ) -> Vec<AccountGroup> {
        let mut sums: HashMap<Uuid, (Decimal, usize)> = HashMap::new();
        let mut grand_total = Decimal::ZERO;
        for txn in transactions {
            if txn.is_paid() && txn.kind == TransactionKind::Expense {
                grand_total += txn.amount;
                let entry = sums.entry(txn.account_id).or_default();
                entry.0 += txn.amount;
                entry.1 += 1;
            }
        }

        let mut groups: Vec<AccountGroup> = accounts
            .iter()
            .filter_map(|account| {
                let (total, count) = sums.get(&account.id).copied()?;
                (!total.is_zero()).then(|| AccountGroup {
                    account_id: account.id,
                    name: account.name.clone(),
                    color: account.color.clone(),
                    total,
                    count,
                    percentage: Decimal::ZERO,
                })
            })
            .collect();

        for group in &mut groups {
            group.percentage = percentage_of(group.total, grand_total);
        }
        groups.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        groups
    }

    pub fn by_payment_type<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> PaymentTypeBreakdown {
        let mut breakdown = PaymentTypeBreakdown::default();
        for txn in transactions {
            if !txn.is_paid() || txn.kind != TransactionKind::Expense {
                continue;
            }
            let bucket = match txn.payment_type {
                PaymentType::OneTime => &mut breakdown.one_time,
                PaymentType::Fixed => &mut breakdown.fixed,
                PaymentType::Recurring => &mut breakdown.recurring,
            };
            *bucket += txn.amount;
        }
        breakdown
    }

    /// Totals of a listing as displayed, counting every status.
    pub fn listing(transactions: &[Transaction]) -> ListingSummary {
        let mut summary = ListingSummary {
            count: transactions.len(),
            ..ListingSummary::default()
        };
        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => summary.income += txn.amount,
                TransactionKind::Expense => summary.expense += txn.amount,
            }
        }
        summary.net = summary.income - summary.expense;
        summary
    }

    /// Full report for the transactions matching `filters`.
    pub fn report(
        transactions: &[Transaction],
        categories: &[Category],
        accounts: &[Account],
        filters: &FilterSet,
    ) -> ReportView {
        let matching: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| filters.matches(txn))
            .collect();
        let totals = Self::totals(matching.iter().copied().filter(|txn| txn.is_paid()));

        ReportView {
            period: filters.period,
            totals,
            spending_ratio: totals.spending_ratio(),
            income_by_category: Self::group_by_category(
                matching.iter().copied(),
                categories,
                TransactionKind::Income,
            ),
            expense_by_category: Self::group_by_category(
                matching.iter().copied(),
                categories,
                TransactionKind::Expense,
            ),
            expense_by_account: Self::group_by_account(matching.iter().copied(), accounts),
            by_payment_type: Self::by_payment_type(matching.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_zero_whole_is_zero() {
        assert_eq!(percentage_of(Decimal::from(5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            percentage_of(Decimal::from(1), Decimal::from(4)),
            Decimal::from(25)
        );
    }

    #[test]
    fn spending_ratio_uses_income_as_base() {
        let totals = PeriodTotals {
            income: Decimal::from(4000),
            expense: Decimal::from(1000),
            balance: Decimal::from(3000),
        };
        assert_eq!(totals.spending_ratio(), Decimal::from(25));
        assert_eq!(PeriodTotals::default().spending_ratio(), Decimal::ZERO);
    }
}
