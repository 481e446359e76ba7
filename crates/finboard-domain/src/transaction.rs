//! Domain models for income and expense transactions.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, DomainError, RecurrenceRule, ValidationErrors};

/// A single income or expense entry. `amount` is always positive; the sign comes
/// from `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub payment_type: PaymentType,
    pub transaction_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub status: TransactionStatus,
    pub account_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Transaction {
    /// Builds the canonical row for a validated draft. Fails when the draft has no
    /// account, which `TransactionDraft::validate` reports as a field error.
    pub fn from_draft(
        id: Uuid,
        owner_id: Uuid,
        draft: TransactionDraft,
    ) -> Result<Self, ValidationErrors> {
        let draft = draft.validated()?;
        let account_id = draft
            .account_id
            .ok_or_else(|| ValidationErrors::single("account_id", "account is required"))?;
        Ok(Self {
            id,
            owner_id,
            description: draft.description.trim().to_string(),
            amount: draft.amount,
            kind: draft.kind,
            payment_type: draft.payment_type,
            transaction_date: draft.transaction_date,
            due_date: draft.due_date,
            status: draft.status,
            account_id,
            category_id: draft.category_id,
            notes: draft.notes,
            tags: draft.tags,
            recurrence: draft.recurrence,
        })
    }

    /// Due date, defaulting to the transaction date.
    pub fn due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.transaction_date)
    }

    /// `+amount` for income, `-amount` for expenses.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == TransactionStatus::Paid
    }

    pub fn is_recurring(&self) -> bool {
        self.payment_type == PaymentType::Recurring && self.recurrence.is_some()
    }

    /// Status as seen on `today`: open entries whose due date has passed read as
    /// overdue, everything else keeps its stored status.
    pub fn effective_status(&self, today: NaiveDate) -> TransactionStatus {
        match self.status {
            TransactionStatus::Pending | TransactionStatus::Scheduled
                if self.due_date() < today =>
            {
                TransactionStatus::Overdue
            }
            status => status,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.effective_status(today) == TransactionStatus::Overdue
    }

    /// Still awaiting payment and not yet late.
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.effective_status(today).is_open()
    }

    pub fn has_tag(&self, tag_id: Uuid) -> bool {
        self.tags.contains(&tag_id)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("{} {} [{}]", self.description, self.signed_amount(), self.status)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(DomainError::UnknownVariant {
                kind: "transaction type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    #[default]
    OneTime,
    Fixed,
    Recurring,
}

impl PaymentType {
    pub const ALL: [PaymentType; 3] = [PaymentType::OneTime, PaymentType::Fixed, PaymentType::Recurring];

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentType::OneTime => "one_time",
            PaymentType::Fixed => "fixed",
            PaymentType::Recurring => "recurring",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        PaymentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "payment type",
                value: value.to_string(),
            })
    }
}

/// Enumerates the lifecycle state of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
    Scheduled,
    Cancelled,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 5] = [
        TransactionStatus::Pending,
        TransactionStatus::Paid,
        TransactionStatus::Overdue,
        TransactionStatus::Scheduled,
        TransactionStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Overdue => "overdue",
            TransactionStatus::Scheduled => "scheduled",
            TransactionStatus::Cancelled => "cancelled",
        }
    }

    /// Pending or scheduled.
    pub fn is_open(self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Scheduled)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        TransactionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "transaction status",
                value: value.to_string(),
            })
    }
}

/// User-editable fields of a transaction, submitted for create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    #[serde(default)]
    pub payment_type: PaymentType,
    pub transaction_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
    #[serde(default)]
    pub recurrence: Option<RecurrenceRule>,
}

impl TransactionDraft {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
        account_id: Uuid,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            kind,
            payment_type: PaymentType::OneTime,
            transaction_date,
            due_date: None,
            status: TransactionStatus::Pending,
            account_id: Some(account_id),
            category_id: None,
            notes: None,
            tags: Vec::new(),
            recurrence: None,
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = payment_type;
        self
    }

    pub fn with_tags(mut self, tags: Vec<Uuid>) -> Self {
        self.tags = tags;
        self
    }

    /// Marks the draft as recurring under `rule`.
    pub fn recurring(mut self, rule: RecurrenceRule) -> Self {
        self.payment_type = PaymentType::Recurring;
        self.recurrence = Some(rule);
        self
    }

    /// Copies the editable fields of an existing transaction.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount,
            kind: transaction.kind,
            payment_type: transaction.payment_type,
            transaction_date: transaction.transaction_date,
            due_date: transaction.due_date,
            status: transaction.status,
            account_id: Some(transaction.account_id),
            category_id: transaction.category_id,
            notes: transaction.notes.clone(),
            tags: transaction.tags.clone(),
            recurrence: transaction.recurrence.clone(),
        }
    }

    /// Drops fields that have no meaning for the chosen payment type and blanks
    /// out empty notes.
    pub fn normalize(mut self) -> Self {
        if self.payment_type != PaymentType::Recurring {
            self.recurrence = None;
        }
        if self
            .notes
            .as_deref()
            .is_some_and(|notes| notes.trim().is_empty())
        {
            self.notes = None;
        }
        self.tags.sort();
        self.tags.dedup();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.description.trim().is_empty() {
            errors.add("description", "description is required");
        }
        if self.amount <= Decimal::ZERO {
            errors.add("amount", "amount must be a positive number");
        }
        if self.account_id.is_none() {
            errors.add("account_id", "account is required");
        }
        match (self.payment_type, &self.recurrence) {
            (PaymentType::Recurring, None) => {
                errors.add("recurrence_unit", "recurrence unit is required");
                errors.add("recurrence_start_date", "recurrence start date is required");
            }
            (PaymentType::Recurring, Some(rule)) => {
                if let Err(rule_errors) = rule.validate() {
                    errors.merge(rule_errors);
                }
            }
            (_, Some(_)) => {
                errors.add(
                    "recurrence",
                    "recurrence is only allowed for recurring payments",
                );
            }
            (_, None) => {}
        }
        errors.into_result()
    }

    /// Normalizes and validates in one step.
    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let draft = self.normalize();
        draft.validate()?;
        Ok(draft)
    }
}
