//! Budget limits compared against actual spending.

use std::{cmp::Ordering, fmt};

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use finboard_domain::{Budget, Category, Transaction, TransactionKind, YearMonth};

use crate::summary_service::{percentage_of, SummaryService};

/// Whether spending is aligned with the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    OverBudget,
    UnderBudget,
    Empty,
}

impl BudgetStatus {
    pub fn classify(limit: Decimal, spent: Decimal) -> Self {
        if limit.is_zero() && spent.is_zero() {
            return BudgetStatus::Empty;
        }
        match spent.cmp(&limit) {
            Ordering::Greater => BudgetStatus::OverBudget,
            Ordering::Less => BudgetStatus::UnderBudget,
            Ordering::Equal => BudgetStatus::OnTrack,
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::OnTrack => "On Track",
            BudgetStatus::OverBudget => "Over Budget",
            BudgetStatus::UnderBudget => "Under Budget",
            BudgetStatus::Empty => "Empty",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetUsage {
    pub budget_id: Uuid,
    pub category_id: Uuid,
    pub category_name: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub status: BudgetStatus,
}

pub struct BudgetService;

impl BudgetService {
    /// Usage of each active budget for `period`, using paid expenses of that month.
    pub fn usage(
        budgets: &[Budget],
        categories: &[Category],
        transactions: &[Transaction],
        period: YearMonth,
    ) -> Vec<BudgetUsage> {
        let groups = SummaryService::group_by_category(
            SummaryService::paid_in_period(transactions, period),
            categories,
            TransactionKind::Expense,
        );
        budgets
            .iter()
            .filter(|budget| budget.applies_to(period))
            .map(|budget| {
                let spent = groups
                    .iter()
                    .find(|group| group.category_id == budget.category_id)
                    .map_or(Decimal::ZERO, |group| group.total);
                let category_name = categories
                    .iter()
                    .find(|category| category.id == budget.category_id)
                    .map_or_else(String::new, |category| category.name.clone());
                BudgetUsage {
                    budget_id: budget.id,
                    category_id: budget.category_id,
                    category_name,
                    limit: budget.limit_amount,
                    spent,
                    remaining: budget.limit_amount - spent,
                    percent_used: percentage_of(spent, budget.limit_amount),
                    status: BudgetStatus::classify(budget.limit_amount, spent),
                }
            })
            .collect()
    }
}
