use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use finboard_domain::{
    Account, AccountDraft, Budget, BudgetDraft, Category, CategoryDraft, DateRange, FilterSet,
    Tag, TagDraft, Transaction, TransactionDraft, YearMonth,
};

use crate::StoreResult;

/// Headline figures of the dashboard as computed by the data store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_income: Decimal,
    #[serde(default)]
    pub total_expense: Decimal,
    #[serde(default)]
    pub pending_count: usize,
    #[serde(default)]
    pub overdue_count: usize,
}

/// Expense total of one category in a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub category_id: Uuid,
    pub category_name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
    pub total: Decimal,
}

/// Remote persistence contract. Every call is a single request; failures are returned,
/// never retried.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Active accounts, ordered by name.
    async fn list_accounts(&self, owner: Uuid) -> StoreResult<Vec<Account>>;
    async fn create_account(&self, owner: Uuid, draft: &AccountDraft) -> StoreResult<Account>;
    async fn update_account(&self, id: Uuid, draft: &AccountDraft) -> StoreResult<Account>;

    /// Active categories, ordered by name.
    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>>;
    async fn create_category(&self, owner: Uuid, draft: &CategoryDraft) -> StoreResult<Category>;
    async fn update_category(&self, id: Uuid, draft: &CategoryDraft) -> StoreResult<Category>;

    /// Transactions matching `filters`, newest transaction date first.
    async fn list_transactions(
        &self,
        owner: Uuid,
        filters: &FilterSet,
    ) -> StoreResult<Vec<Transaction>>;
    /// Every transaction dated inside `range`, newest first.
    async fn list_transactions_between(
        &self,
        owner: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Transaction>>;
    async fn create_transaction(
        &self,
        owner: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction>;
    async fn update_transaction(
        &self,
        id: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction>;
    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()>;

    /// Tags ordered by name.
    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>>;
    async fn create_tag(&self, owner: Uuid, draft: &TagDraft) -> StoreResult<Tag>;
    async fn delete_tag(&self, id: Uuid) -> StoreResult<()>;

    /// Active budgets of `period`.
    async fn list_budgets(&self, owner: Uuid, period: YearMonth) -> StoreResult<Vec<Budget>>;
    async fn create_budget(&self, owner: Uuid, draft: &BudgetDraft) -> StoreResult<Budget>;

    /// Paid totals of `period`; `today` anchors the pending and overdue projection.
    async fn dashboard_summary(
        &self,
        owner: Uuid,
        period: YearMonth,
        today: NaiveDate,
    ) -> StoreResult<DashboardSummary>;
    /// Open transactions due within `[today, today + days]`, earliest first.
    async fn upcoming_payments(
        &self,
        owner: Uuid,
        today: NaiveDate,
        days: u32,
    ) -> StoreResult<Vec<Transaction>>;
    /// Paid expense per category for `period`, largest first.
    async fn category_spend(
        &self,
        owner: Uuid,
        period: YearMonth,
    ) -> StoreResult<Vec<CategorySpend>>;
}
