//! Wire rows exchanged with the REST backend. Transactions are stored flat, with the
//! recurrence rule spread over four nullable columns and tags in a join table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use finboard_domain::{
    AccountDraft, BudgetDraft, CategoryDraft, PaymentType, RecurrenceRule, RecurrenceUnit,
    TagDraft, Transaction, TransactionDraft, TransactionKind, TransactionStatus,
    ValidationErrors,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagLink {
    pub tag_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub transaction_type: TransactionKind,
    pub payment_type: PaymentType,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub account_id: Uuid,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recurrence_unit: Option<RecurrenceUnit>,
    #[serde(default)]
    pub recurrence_interval: Option<u32>,
    #[serde(default)]
    pub recurrence_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub recurrence_end_date: Option<NaiveDate>,
    #[serde(default)]
    pub transaction_tags: Vec<TagLink>,
}

impl TransactionRow {
    /// Rebuilds the nested rule; rows missing the unit or start date have none.
    pub fn recurrence(&self) -> Option<RecurrenceRule> {
        let unit = self.recurrence_unit?;
        let start_date = self.recurrence_start_date?;
        Some(RecurrenceRule {
            unit,
            interval: self
                .recurrence_interval
                .unwrap_or_else(RecurrenceRule::default_interval),
            start_date,
            end_date: self.recurrence_end_date,
        })
    }

    pub fn into_transaction(self) -> Transaction {
        let recurrence = self.recurrence();
        let mut tags: Vec<Uuid> = self.transaction_tags.into_iter().map(|link| link.tag_id).collect();
        tags.sort();
        tags.dedup();
        Transaction {
            id: self.id,
            owner_id: self.owner_id,
            description: self.description,
            amount: self.amount,
            kind: self.transaction_type,
            payment_type: self.payment_type,
            transaction_date: self.transaction_date,
            due_date: self.due_date,
            status: self.status,
            account_id: self.account_id,
            category_id: self.category_id,
            notes: self.notes,
            tags,
            recurrence,
        }
    }
}

/// Insert/update body for the transactions table. Nulls are sent so updates clear
/// columns the draft no longer sets.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub description: &'a str,
    pub amount: Decimal,
    pub transaction_type: TransactionKind,
    pub payment_type: PaymentType,
    pub transaction_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub account_id: Uuid,
    pub category_id: Option<Uuid>,
    pub notes: Option<&'a str>,
    pub recurrence_unit: Option<RecurrenceUnit>,
    pub recurrence_interval: Option<u32>,
    pub recurrence_start_date: Option<NaiveDate>,
    pub recurrence_end_date: Option<NaiveDate>,
}

impl<'a> TransactionPayload<'a> {
    pub fn new(owner_id: Option<Uuid>, draft: &'a TransactionDraft) -> Result<Self, ValidationErrors> {
        let account_id = draft
            .account_id
            .ok_or_else(|| ValidationErrors::single("account_id", "account is required"))?;
        let rule = draft.recurrence.as_ref();
        Ok(Self {
            owner_id,
            description: draft.description.trim(),
            amount: draft.amount,
            transaction_type: draft.kind,
            payment_type: draft.payment_type,
            transaction_date: draft.transaction_date,
            due_date: draft.due_date,
            status: draft.status,
            account_id,
            category_id: draft.category_id,
            notes: draft.notes.as_deref(),
            recurrence_unit: rule.map(|rule| rule.unit),
            recurrence_interval: rule.map(|rule| rule.interval),
            recurrence_start_date: rule.map(|rule| rule.start_date),
            recurrence_end_date: rule.and_then(|rule| rule.end_date),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagLinkPayload {
    pub transaction_id: Uuid,
    pub tag_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAccount<'a> {
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub draft: &'a AccountDraft,
    pub current_balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCategory<'a> {
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub draft: &'a CategoryDraft,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTag<'a> {
    pub owner_id: Uuid,
    #[serde(flatten)]
    pub draft: &'a TagDraft,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub month: u32,
    pub year: i32,
    pub limit_amount: Decimal,
    pub active: bool,
}

impl NewBudget {
    pub fn new(owner_id: Uuid, draft: &BudgetDraft) -> Self {
        Self {
            owner_id,
            category_id: draft.category_id,
            month: draft.period.month(),
            year: draft.period.year(),
            limit_amount: draft.limit_amount,
            active: true,
        }
    }
}
