//! Ephemeral transaction filters driving listing, reports and dashboard queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DateRange, PaymentType, Transaction, TransactionKind, TransactionStatus, YearMonth};

/// Active filter selection. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    pub period: YearMonth,
    #[serde(default)]
    pub account_id: Option<Uuid>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default, rename = "transaction_type")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub payment_type: Option<PaymentType>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub tag_id: Option<Uuid>,
}

impl FilterSet {
    /// A filter on `period` with every selector empty.
    pub fn for_period(period: YearMonth) -> Self {
        Self {
            period,
            account_id: None,
            category_id: None,
            kind: None,
            payment_type: None,
            status: None,
            tag_id: None,
        }
    }

    /// Default filter state: the month containing `today`, no selectors.
    pub fn cleared(today: NaiveDate) -> Self {
        Self::for_period(YearMonth::of(today))
    }

    /// Resets to [`FilterSet::cleared`]. Applying it twice is the same as once.
    pub fn clear(&mut self, today: NaiveDate) {
        *self = Self::cleared(today);
    }

    pub fn has_active_filters(&self, today: NaiveDate) -> bool {
        *self != Self::cleared(today)
    }

    pub fn has_selectors(&self) -> bool {
        self.account_id.is_some()
            || self.category_id.is_some()
            || self.kind.is_some()
            || self.payment_type.is_some()
            || self.status.is_some()
            || self.tag_id.is_some()
    }

    pub fn date_range(&self) -> DateRange {
        self.period.range()
    }

    /// Whether a transaction passes every selector. Status compares the stored status.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.period.contains(transaction.transaction_date)
            && self.account_id.map_or(true, |id| transaction.account_id == id)
            && self
                .category_id
                .map_or(true, |id| transaction.category_id == Some(id))
            && self.kind.map_or(true, |kind| transaction.kind == kind)
            && self
                .payment_type
                .map_or(true, |payment_type| transaction.payment_type == payment_type)
            && self.status.map_or(true, |status| transaction.status == status)
            && self.tag_id.map_or(true, |id| transaction.has_tag(id))
    }

    /// Merges a partial update. Returns `true` when the month/year changed.
    pub fn apply(&mut self, patch: FilterPatch) -> bool {
        let previous = self.period;
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(account_id) = patch.account_id {
            self.account_id = account_id;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(payment_type) = patch.payment_type {
            self.payment_type = payment_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(tag_id) = patch.tag_id {
            self.tag_id = tag_id;
        }
        previous != self.period
    }
}

/// Partial filter update. The outer `Option` means "leave unchanged"; `Some(None)`
/// clears a selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub period: Option<YearMonth>,
    pub account_id: Option<Option<Uuid>>,
    pub category_id: Option<Option<Uuid>>,
    pub kind: Option<Option<TransactionKind>>,
    pub payment_type: Option<Option<PaymentType>>,
    pub status: Option<Option<TransactionStatus>>,
    pub tag_id: Option<Option<Uuid>>,
}

impl FilterPatch {
    pub fn period(period: YearMonth) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    pub fn account(mut self, account_id: Option<Uuid>) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: Option<Uuid>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn payment_type(mut self, payment_type: Option<PaymentType>) -> Self {
        self.payment_type = Some(payment_type);
        self
    }

    pub fn status(mut self, status: Option<TransactionStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn tag(mut self, tag_id: Option<Uuid>) -> Self {
        self.tag_id = Some(tag_id);
        self
    }
}
