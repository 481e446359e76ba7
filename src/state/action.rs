use chrono::NaiveDate;
use uuid::Uuid;

use finboard_core::TrendReport;
use finboard_domain::{
    Account, Budget, Category, FilterPatch, FilterSet, Identifiable, Tag, Transaction,
};

use super::{AppState, DashboardData, Resource};

/// Every transition the state accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetAccounts(Vec<Account>),
    SetCategories(Vec<Category>),
    SetTransactions(Vec<Transaction>),
    SetTags(Vec<Tag>),
    SetBudgets(Vec<Budget>),
    SetDashboard(DashboardData),
    SetTrend(TrendReport),
    SetLoading(Resource, bool),
    PatchFilters(FilterPatch),
    ClearFilters { today: NaiveDate },
    AddAccount(Account),
    UpdateAccount(Account),
    DeactivateAccount(Uuid),
    AddCategory(Category),
    UpdateCategory(Category),
    AddTransaction(Transaction),
    UpdateTransaction(Transaction),
    DeleteTransaction(Uuid),
    AddTag(Tag),
    DeleteTag(Uuid),
    AddBudget(Budget),
}

impl Action {
    /// Loading flags are bookkeeping; every other action changes what derived views see.
    pub fn changes_data(&self) -> bool {
        !matches!(self, Action::SetLoading(..))
    }
}

fn replace<T: Identifiable>(items: &mut [T], updated: T) {
    if let Some(slot) = items.iter_mut().find(|item| item.id() == updated.id()) {
        *slot = updated;
    }
}

fn remove<T: Identifiable>(items: &mut Vec<T>, id: Uuid) {
    items.retain(|item| item.id() != id);
}

impl AppState {
    /// Applies one transition.
    pub fn apply(&mut self, action: Action) {
        if action.changes_data() {
            self.revision += 1;
        }
        match action {
            Action::SetAccounts(accounts) => self.accounts = accounts,
            Action::SetCategories(categories) => self.categories = categories,
            Action::SetTransactions(transactions) => self.transactions = transactions,
            Action::SetTags(tags) => self.tags = tags,
            Action::SetBudgets(budgets) => self.budgets = budgets,
            Action::SetDashboard(dashboard) => self.dashboard = dashboard,
            Action::SetTrend(trend) => self.trend = Some(trend),
            Action::SetLoading(resource, loading) => self.loading.set(resource, loading),
            Action::PatchFilters(patch) => {
                self.filters.apply(patch);
            }
            Action::ClearFilters { today } => self.filters = FilterSet::cleared(today),
            Action::AddAccount(account) => self.accounts.push(account),
            Action::UpdateAccount(account) => replace(&mut self.accounts, account),
            Action::DeactivateAccount(id) => remove(&mut self.accounts, id),
            Action::AddCategory(category) => self.categories.push(category),
            Action::UpdateCategory(category) => replace(&mut self.categories, category),
            // Listings are newest first; a fresh entry goes on top.
            Action::AddTransaction(transaction) => self.transactions.insert(0, transaction),
            Action::UpdateTransaction(transaction) => replace(&mut self.transactions, transaction),
            Action::DeleteTransaction(id) => remove(&mut self.transactions, id),
            Action::AddTag(tag) => self.tags.push(tag),
            Action::DeleteTag(id) => {
                remove(&mut self.tags, id);
                for txn in &mut self.transactions {
                    txn.tags.retain(|tag| *tag != id);
                }
                if self.filters.tag_id == Some(id) {
                    self.filters.tag_id = None;
                }
            }
            Action::AddBudget(budget) => self.budgets.push(budget),
        }
    }
}
