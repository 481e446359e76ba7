//! In-process implementation of the data store contract.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use finboard_core::{BalanceService, ScheduleService, SummaryService};
use finboard_domain::{
    Account, AccountDraft, Budget, BudgetDraft, Category, CategoryDraft, DateRange, FilterSet,
    Identifiable, Tag, TagDraft, Transaction, TransactionDraft, TransactionKind, YearMonth,
};

use crate::{CategorySpend, DashboardSummary, DataStore, StoreError, StoreResult};

#[derive(Debug, Default, Clone)]
struct Tables {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    tags: Vec<Tag>,
    budgets: Vec<Budget>,
}

/// Keeps every table in memory and derives balances the way the remote backend does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        // A poisoned lock still holds consistent tables: every write is a single push/replace.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every transaction of `owner`, regardless of filters.
    pub fn transactions_of(&self, owner: Uuid) -> Vec<Transaction> {
        self.tables()
            .transactions
            .iter()
            .filter(|txn| txn.owner_id == owner)
            .cloned()
            .collect()
    }
}

fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.transaction_date
            .cmp(&a.transaction_date)
            .then_with(|| a.description.cmp(&b.description))
    });
}

fn position<T: Identifiable>(items: &[T], id: Uuid, entity: &'static str) -> StoreResult<usize> {
    items
        .iter()
        .position(|item| item.id() == id)
        .ok_or(StoreError::NotFound { entity, id })
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn list_accounts(&self, owner: Uuid) -> StoreResult<Vec<Account>> {
        let tables = self.tables();
        let mut accounts: Vec<Account> = tables
            .accounts
            .iter()
            .filter(|account| account.owner_id == owner && account.active)
            .cloned()
            .collect();
        BalanceService::reconcile(&mut accounts, &tables.transactions);
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(%owner, count = accounts.len(), "list accounts");
        Ok(accounts)
    }

    async fn create_account(&self, owner: Uuid, draft: &AccountDraft) -> StoreResult<Account> {
        let account = Account::from_draft(Uuid::new_v4(), owner, draft.clone())?;
        debug!(%owner, account = %account.id, "create account");
        self.tables().accounts.push(account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: Uuid, draft: &AccountDraft) -> StoreResult<Account> {
        let mut tables = self.tables();
        let index = position(&tables.accounts, id, "account")?;
        let mut account = tables.accounts[index].clone();
        account.apply_draft(draft.clone())?;
        account.current_balance = BalanceService::current_balance(&account, &tables.transactions);
        tables.accounts[index] = account.clone();
        debug!(%id, "update account");
        Ok(account)
    }

    async fn list_categories(&self, owner: Uuid) -> StoreResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .tables()
            .categories
            .iter()
            .filter(|category| category.owner_id == owner && category.active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(%owner, count = categories.len(), "list categories");
        Ok(categories)
    }

    async fn create_category(&self, owner: Uuid, draft: &CategoryDraft) -> StoreResult<Category> {
        let category = Category::from_draft(Uuid::new_v4(), owner, draft.clone())?;
        debug!(%owner, category = %category.id, "create category");
        self.tables().categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: Uuid, draft: &CategoryDraft) -> StoreResult<Category> {
        let mut tables = self.tables();
        let index = position(&tables.categories, id, "category")?;
        let mut category = tables.categories[index].clone();
        category.apply_draft(draft.clone())?;
        tables.categories[index] = category.clone();
        debug!(%id, "update category");
        Ok(category)
    }

    async fn list_transactions(
        &self,
        owner: Uuid,
        filters: &FilterSet,
    ) -> StoreResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .tables()
            .transactions
            .iter()
            .filter(|txn| txn.owner_id == owner && filters.matches(txn))
            .cloned()
            .collect();
        newest_first(&mut transactions);
        debug!(%owner, period = %filters.period, count = transactions.len(), "list transactions");
        Ok(transactions)
    }

    async fn list_transactions_between(
        &self,
        owner: Uuid,
        range: DateRange,
    ) -> StoreResult<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .tables()
            .transactions
            .iter()
            .filter(|txn| txn.owner_id == owner && range.contains(txn.transaction_date))
            .cloned()
            .collect();
        newest_first(&mut transactions);
        debug!(%owner, count = transactions.len(), "list transactions in range");
        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        owner: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        let transaction = Transaction::from_draft(Uuid::new_v4(), owner, draft.clone())?;
        let mut tables = self.tables();
        position(&tables.accounts, transaction.account_id, "account")?;
        tables.transactions.push(transaction.clone());
        debug!(%owner, transaction = %transaction.id, "create transaction");
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        id: Uuid,
        draft: &TransactionDraft,
    ) -> StoreResult<Transaction> {
        let mut tables = self.tables();
        let index = position(&tables.transactions, id, "transaction")?;
        let owner = tables.transactions[index].owner_id;
        let transaction = Transaction::from_draft(id, owner, draft.clone())?;
        position(&tables.accounts, transaction.account_id, "account")?;
        tables.transactions[index] = transaction.clone();
        debug!(%id, "update transaction");
        Ok(transaction)
    }

    async fn delete_transaction(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables();
        let index = position(&tables.transactions, id, "transaction")?;
        tables.transactions.remove(index);
        debug!(%id, "delete transaction");
        Ok(())
    }

    async fn list_tags(&self, owner: Uuid) -> StoreResult<Vec<Tag>> {
        let mut tags: Vec<Tag> = self
            .tables()
            .tags
            .iter()
            .filter(|tag| tag.owner_id == owner)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(%owner, count = tags.len(), "list tags");
        Ok(tags)
    }

    async fn create_tag(&self, owner: Uuid, draft: &TagDraft) -> StoreResult<Tag> {
        let tag = Tag::from_draft(Uuid::new_v4(), owner, draft.clone())?;
        debug!(%owner, tag = %tag.id, "create tag");
        self.tables().tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete_tag(&self, id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables();
        let index = position(&tables.tags, id, "tag")?;
        tables.tags.remove(index);
        for txn in tables.transactions.iter_mut() {
            txn.tags.retain(|tag| *tag != id);
        }
        debug!(%id, "delete tag");
        Ok(())
    }

    async fn list_budgets(&self, owner: Uuid, period: YearMonth) -> StoreResult<Vec<Budget>> {
        let budgets: Vec<Budget> = self
            .tables()
            .budgets
            .iter()
            .filter(|budget| budget.owner_id == owner && budget.applies_to(period))
            .cloned()
            .collect();
        debug!(%owner, %period, count = budgets.len(), "list budgets");
        Ok(budgets)
    }

    async fn create_budget(&self, owner: Uuid, draft: &BudgetDraft) -> StoreResult<Budget> {
        let budget = Budget::from_draft(Uuid::new_v4(), owner, draft.clone())?;
        debug!(%owner, budget = %budget.id, "create budget");
        self.tables().budgets.push(budget.clone());
        Ok(budget)
    }

    async fn dashboard_summary(
        &self,
        owner: Uuid,
        period: YearMonth,
        today: NaiveDate,
    ) -> StoreResult<DashboardSummary> {
        let transactions = self.transactions_of(owner);
        let totals = SummaryService::period_totals(&transactions, period);
        debug!(%owner, %period, %today, "dashboard summary");
        Ok(DashboardSummary {
            total_income: totals.income,
            total_expense: totals.expense,
            pending_count: ScheduleService::pending_count(&transactions, today),
            overdue_count: ScheduleService::overdue_count(&transactions, today),
        })
    }

    async fn upcoming_payments(
        &self,
        owner: Uuid,
        today: NaiveDate,
        days: u32,
    ) -> StoreResult<Vec<Transaction>> {
        let upcoming = ScheduleService::upcoming(&self.transactions_of(owner), today, days);
        debug!(%owner, %today, days, count = upcoming.len(), "upcoming payments");
        Ok(upcoming)
    }

    async fn category_spend(
        &self,
        owner: Uuid,
        period: YearMonth,
    ) -> StoreResult<Vec<CategorySpend>> {
        let transactions = self.transactions_of(owner);
        let categories: Vec<Category> = self
            .tables()
            .categories
            .iter()
            .filter(|category| category.owner_id == owner)
            .cloned()
            .collect();
        let groups = SummaryService::group_by_category(
            SummaryService::paid_in_period(&transactions, period),
            &categories,
            TransactionKind::Expense,
        );
        debug!(%owner, %period, count = groups.len(), "category spend");
        Ok(groups
            .into_iter()
            .map(|group| CategorySpend {
                category_id: group.category_id,
                category_name: group.name,
                color: group.color,
                icon: group.icon,
                total: group.total,
            })
            .collect())
    }
}
