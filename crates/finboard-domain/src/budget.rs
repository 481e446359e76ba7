use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, ValidationErrors};

/// A monthly spending limit for one expense category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub limit_amount: Decimal,
    pub active: bool,
}

impl Budget {
    pub fn from_draft(id: Uuid, owner_id: Uuid, draft: BudgetDraft) -> Result<Self, ValidationErrors> {
        draft.validate()?;
        Ok(Self {
            id,
            owner_id,
            category_id: draft.category_id,
            month: draft.period.month(),
            year: draft.period.year(),
            limit_amount: draft.limit_amount,
            active: true,
        })
    }

    /// The month this budget applies to, `None` for a malformed row.
    pub fn period(&self) -> Option<YearMonth> {
        YearMonth::new(self.year, self.month).ok()
    }

    pub fn applies_to(&self, period: YearMonth) -> bool {
        self.active && self.period() == Some(period)
    }
}

impl Identifiable for Budget {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetDraft {
    pub category_id: Uuid,
    pub period: YearMonth,
    pub limit_amount: Decimal,
}

impl BudgetDraft {
    pub fn new(category_id: Uuid, period: YearMonth, limit_amount: Decimal) -> Self {
        Self {
            category_id,
            period,
            limit_amount,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.limit_amount <= Decimal::ZERO {
            errors.add("limit_amount", "limit must be a positive number");
        }
        errors.into_result()
    }
}
