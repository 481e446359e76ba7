//! Domain types for money accounts.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, DomainError, ValidationErrors};

pub const DEFAULT_ACCOUNT_COLOR: &str = "#3B82F6";

/// Represents a money account that transactions are booked against.
///
/// `current_balance` is derived: the initial balance plus the signed amounts of every
/// paid transaction referencing the account. Accounts are never deleted, only
/// deactivated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_limit: Option<Decimal>,
    pub color: String,
    pub active: bool,
}

impl Account {
    /// Builds a fresh account row from a validated draft; the balance starts at the
    /// initial balance.
    pub fn from_draft(id: Uuid, owner_id: Uuid, draft: AccountDraft) -> Result<Self, ValidationErrors> {
        let draft = draft.validated()?;
        Ok(Self {
            id,
            owner_id,
            name: draft.name.trim().to_string(),
            kind: draft.kind,
            institution: draft.institution,
            initial_balance: draft.initial_balance,
            current_balance: draft.initial_balance,
            credit_limit: draft.credit_limit,
            color: draft.color,
            active: draft.active,
        })
    }

    /// Overwrites the editable fields, shifting the derived balance by the change in
    /// initial balance.
    pub fn apply_draft(&mut self, draft: AccountDraft) -> Result<(), ValidationErrors> {
        let draft = draft.validated()?;
        self.current_balance += draft.initial_balance - self.initial_balance;
        self.name = draft.name.trim().to_string();
        self.kind = draft.kind;
        self.institution = draft.institution;
        self.initial_balance = draft.initial_balance;
        self.credit_limit = draft.credit_limit;
        self.color = draft.color;
        self.active = draft.active;
        Ok(())
    }

    /// Remaining credit for credit cards: limit plus (negative) balance.
    pub fn available_credit(&self) -> Option<Decimal> {
        match self.kind {
            AccountKind::CreditCard => self.credit_limit.map(|limit| limit + self.current_balance),
            _ => None,
        }
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} {} ({})", self.kind.icon(), self.name, self.kind.label())
    }
}

/// Supported account types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
    DebitCard,
    Cash,
    Investment,
}

impl AccountKind {
    pub const ALL: [AccountKind; 6] = [
        AccountKind::Checking,
        AccountKind::Savings,
        AccountKind::CreditCard,
        AccountKind::DebitCard,
        AccountKind::Cash,
        AccountKind::Investment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::CreditCard => "credit_card",
            AccountKind::DebitCard => "debit_card",
            AccountKind::Cash => "cash",
            AccountKind::Investment => "investment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
            AccountKind::CreditCard => "Credit card",
            AccountKind::DebitCard => "Debit card",
            AccountKind::Cash => "Cash",
            AccountKind::Investment => "Investment",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            AccountKind::Checking => "🏦",
            AccountKind::Savings => "💰",
            AccountKind::CreditCard | AccountKind::DebitCard => "💳",
            AccountKind::Cash => "💵",
            AccountKind::Investment => "📈",
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        AccountKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "account type",
                value: value.to_string(),
            })
    }
}

/// User-editable account fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub initial_balance: Decimal,
    #[serde(default)]
    pub credit_limit: Option<Decimal>,
    #[serde(default = "AccountDraft::default_color")]
    pub color: String,
    #[serde(default = "AccountDraft::default_active")]
    pub active: bool,
}

impl AccountDraft {
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            name: name.into(),
            kind,
            institution: None,
            initial_balance: Decimal::ZERO,
            credit_limit: None,
            color: Self::default_color(),
            active: true,
        }
    }

    pub fn default_color() -> String {
        DEFAULT_ACCOUNT_COLOR.into()
    }

    pub fn default_active() -> bool {
        true
    }

    pub fn with_initial_balance(mut self, initial_balance: Decimal) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    pub fn with_credit_limit(mut self, limit: Decimal) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    pub fn with_institution(mut self, institution: impl Into<String>) -> Self {
        self.institution = Some(institution.into());
        self
    }

    pub fn from_account(account: &Account) -> Self {
        Self {
            name: account.name.clone(),
            kind: account.kind,
            institution: account.institution.clone(),
            initial_balance: account.initial_balance,
            credit_limit: account.credit_limit,
            color: account.color.clone(),
            active: account.active,
        }
    }

    /// Credit limits only apply to credit cards; blank institutions become `None`.
    pub fn normalize(mut self) -> Self {
        if self.kind != AccountKind::CreditCard {
            self.credit_limit = None;
        }
        if self
            .institution
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            self.institution = None;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "account name is required");
        }
        if self.credit_limit.is_some_and(|limit| limit < Decimal::ZERO) {
            errors.add("credit_limit", "credit limit cannot be negative");
        }
        errors.into_result()
    }

    pub fn validated(self) -> Result<Self, ValidationErrors> {
        let draft = self.normalize();
        draft.validate()?;
        Ok(draft)
    }
}
