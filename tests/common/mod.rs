#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use finboard::FinanceStore;
use finboard_core::FixedClock;
use finboard_domain::{
    Account, AccountDraft, Budget, BudgetDraft, Category, CategoryDraft, DateRange, FilterSet,
    Tag, TagDraft, Transaction, TransactionDraft, YearMonth,
};
use finboard_store::{
    CategorySpend, DashboardSummary, DataStore, MemoryStore, StoreError, StoreResult,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn today() -> NaiveDate {
    date(2024, 3, 15)
}

pub fn march() -> YearMonth {
    YearMonth::new(2024, 3).expect("valid month")
}

/// Memory-backed data store whose operations can be switched to fail, recording every
/// call it receives.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    broken: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn break_op(&self, op: &'static str) {
        self.broken.lock().unwrap().insert(op);
    }

    pub fn repair(&self, op: &'static str) {
        self.broken.lock().unwrap().remove(op);
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn enter(&self, op: &'static str) -> StoreResult<()> {
        self.calls.lock().unwrap().push(op);
        if self.broken.lock().unwrap().contains(op) {
            return Err(StoreError::Status {
                status: 503,
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for FlakyStore {
    async fn list_accounts(&self, owner: Uuid) -> StoreResult<Vec<Account>> {
        self.enter("list_accounts")?;
        self.inner.list_accounts(owner).await
    }

    async fn create_account(&self, owner: Uuid, draft: &AccountDraft) -> StoreResult<Account> {
        self.enter("create_account")?;
        self.inner.create_account(owner, draft).await
    }

    async fn update_account(&self, id: Uuid, draft: &AccountDraft) -> StoreResult<Account> {
        self.enter("update_account")?;
        self.inner.update_account(id, draft).await
    }

    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>> {
        self.enter("list_categories")?;
        self.inner.list_categories(owner).await
    }

    async fn create_category(&self, owner: Uuid, draft: &CategoryDraft) -> StoreResult<Category> {
        self.enter("create_category")?;
        self.inner.create_category(owner, draft).await
    }

    async fn update_category(&self, id: Uuid, draft: &CategoryDraft) -> StoreResult<Category> {
        self.enter("update_category")?;
        self.inner.update_category(id, draft).await
    }

    async fn list_transactions(
        &self,
        owner: Uuid,
        filters: &FilterSet,
    ) -> StoreResult<Vec<Transaction>> {
        self.enter("list_transactions")?;
        self.inner.list_transactions(owner, filters).await
    }

    async fn list_transactions_between(
        &self,
        owner: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Transaction>> {
        self.enter("list_transactions_between")?;
        self.inner.list_transactions_between(owner, range).await
    }

    async fn create_transaction(
        &self,
        owner: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        self.enter("create_transaction")?;
        self.inner.create_transaction(owner, draft).await
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        self.enter("update_transaction")?;
        self.inner.update_transaction(id, draft).await
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        self.enter("delete_transaction")?;
        self.inner.delete_transaction(id).await
    }

    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>> {
        self.enter("list_tags")?;
        self.inner.list_tags(owner).await
    }

    async fn create_tag(&self, owner: Uuid, draft: &TagDraft) -> StoreResult<Tag> {
        self.enter("create_tag")?;
        self.inner.create_tag(owner, draft).await
    }

    async fn delete_tag(&self, id: Uuid) -> StoreResult<()> {
        self.enter("delete_tag")?;
        self.inner.delete_tag(id).await
    }

    async fn list_budgets(&self, owner: Uuid, period: YearMonth) -> StoreResult<Vec<Budget>> {
        self.enter("list_budgets")?;
        self.inner.list_budgets(owner, period).await
    }

    async fn create_budget(&self, owner: Uuid, draft: &BudgetDraft) -> StoreResult<Budget> {
        self.enter("create_budget")?;
        self.inner.create_budget(owner, draft).await
    }

    async fn dashboard_summary(
        &self,
        owner: Uuid,
        period: YearMonth,
        today: NaiveDate,
    ) -> StoreResult<DashboardSummary> {
        self.enter("dashboard_summary")?;
        self.inner.dashboard_summary(owner, period, today).await
    }

    async fn upcoming_payments(
        &self,
        owner: Uuid,
        today: NaiveDate,
        days: u32,
    ) -> StoreResult<Vec<Transaction>> {
        self.enter("upcoming_payments")?;
        self.inner.upcoming_payments(owner, today, days).await
    }

    async fn category_spend(
        &self,
        owner: Uuid,
        period: YearMonth,
    ) -> StoreResult<Vec<CategorySpend>> {
        self.enter("category_spend")?;
        self.inner.category_spend(owner, period).await
    }
}

/// A finance store over a fresh [`FlakyStore`], pinned to [`today`].
pub fn finance() -> FinanceStore<FlakyStore> {
    FinanceStore::with_clock(
        FlakyStore::new(),
        Uuid::new_v4(),
        Arc::new(FixedClock::new(today())),
    )
}
