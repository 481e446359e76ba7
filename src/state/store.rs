use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use finboard_config::{Config, Preferences};
use finboard_core::{
    AccountsOverview, BalanceService, BudgetService, BudgetUsage, Clock, Forecast,
    ForecastService, ListingSummary, ReportView, ScheduleService, StatusCounts,
    SummaryService, SystemClock, TrendService,
};
use finboard_domain::{
    Account, AccountDraft, Budget, BudgetDraft, Category, CategoryDraft, DateRange, FilterPatch,
    Tag, TagDraft, Transaction, TransactionDraft, ValidationErrors, YearMonth,
};
use finboard_store::{DataStore, StoreError, StoreResult};

use super::{notice::NoticeQueue, Action, AppState, DashboardData, Notice, Resource};
use crate::{
    errors::AppError,
    transfer::{self, ReportDocument},
};

/// Derived figures for the current filters, rebuilt only when the state revision or the
/// reference date moves.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedReport {
    pub revision: u64,
    pub reference_date: NaiveDate,
    pub report: ReportView,
    pub listing: ListingSummary,
    pub statuses: StatusCounts,
}

impl DerivedReport {
    fn build(state: &AppState, reference_date: NaiveDate) -> Self {
        Self {
            revision: state.revision(),
            reference_date,
            report: SummaryService::report(
                &state.transactions,
                &state.categories,
                &state.accounts,
                &state.filters,
            ),
            listing: SummaryService::listing(&state.transactions),
            statuses: ScheduleService::status_counts(&state.transactions, reference_date),
        }
    }

    fn is_current(&self, revision: u64, reference_date: NaiveDate) -> bool {
        self.revision == revision && self.reference_date == reference_date
    }
}

/// Owns the application state for one owner and routes every change through the data
/// store first. Failed calls leave the state as it was and queue an error notice.
pub struct FinanceStore<S: DataStore> {
    store: S,
    clock: Arc<dyn Clock>,
    state: AppState,
    preferences: Preferences,
    trend_months: u32,
    upcoming_days: u32,
    notices: NoticeQueue,
    derived: Option<DerivedReport>,
}

impl<S: DataStore> FinanceStore<S> {
    pub fn new(store: S, owner_id: Uuid) -> Self {
        Self::with_clock(store, owner_id, Arc::new(SystemClock))
    }

    pub fn with_clock(store: S, owner_id: Uuid, clock: Arc<dyn Clock>) -> Self {
        let today = clock.today();
        Self {
            store,
            clock,
            state: AppState::new(owner_id, today),
            preferences: Preferences::default(),
            trend_months: Config::default_trend_months(),
            upcoming_days: Config::default_upcoming_days(),
            notices: NoticeQueue::default(),
            derived: None,
        }
    }

    /// Builds a store from validated configuration.
    pub fn from_config(store: S, config: &Config, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        config.validate()?;
        let mut finance = Self::with_clock(store, config.owner()?, clock);
        finance.preferences = config.preferences.clone();
        finance.trend_months = config.trend_months;
        finance.upcoming_days = config.upcoming_days;
        Ok(finance)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn data_store(&self) -> &S {
        &self.store
    }

    pub fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    /// Hands over every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    fn owner(&self) -> Uuid {
        self.state.owner_id
    }

    fn dispatch(&mut self, action: Action) {
        self.state.apply(action);
    }

    fn succeed(&mut self, message: &str) {
        self.notices.push(Notice::success(message));
    }

    fn fail(&mut self, message: &str, err: StoreError) -> AppError {
        error!(error = %err, "{message}");
        self.notices.push(Notice::error(message));
        AppError::from(err)
    }

    /// Clears the loading flag and either dispatches the fetched rows or records the failure.
    fn settle<T>(
        &mut self,
        resource: Resource,
        result: StoreResult<T>,
        into: fn(T) -> Action,
    ) -> Result<(), StoreError> {
        self.dispatch(Action::SetLoading(resource, false));
        match result {
            Ok(rows) => {
                self.dispatch(into(rows));
                debug!(%resource, "loaded");
                Ok(())
            }
            Err(err) => {
                warn!(%resource, error = %err, "load failed");
                self.notices
                    .push(Notice::error(format!("could not load {resource}")));
                Err(err)
            }
        }
    }

    /// Fetches accounts, categories, tags and budgets concurrently. One failure does not
    /// stop the others; all failures are reported together.
    pub async fn load_initial_data(&mut self) -> Result<(), AppError> {
        let owner = self.owner();
        let period = self.state.filters.period;
        for resource in [
            Resource::Accounts,
            Resource::Categories,
            Resource::Tags,
            Resource::Budgets,
        ] {
            self.dispatch(Action::SetLoading(resource, true));
        }

        let (accounts, categories, tags, budgets) = tokio::join!(
            self.store.list_accounts(owner),
            self.store.list_categories(owner),
            self.store.list_tags(owner),
            self.store.list_budgets(owner, period),
        );

        let mut failures = Vec::new();
        let outcomes = [
            (Resource::Accounts, self.settle(Resource::Accounts, accounts, Action::SetAccounts)),
            (
                Resource::Categories,
                self.settle(Resource::Categories, categories, Action::SetCategories),
            ),
            (Resource::Tags, self.settle(Resource::Tags, tags, Action::SetTags)),
            (Resource::Budgets, self.settle(Resource::Budgets, budgets, Action::SetBudgets)),
        ];
        for (resource, outcome) in outcomes {
            if let Err(err) = outcome {
                failures.push((resource, err));
            }
        }

        if failures.is_empty() {
            info!(owner = %owner, "initial data loaded");
            Ok(())
        } else {
            error!(owner = %owner, failed = failures.len(), "initial load incomplete");
            Err(AppError::Startup(failures))
        }
    }

    pub async fn load_accounts(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Accounts, true));
        let result = self.store.list_accounts(self.owner()).await;
        Ok(self.settle(Resource::Accounts, result, Action::SetAccounts)?)
    }

    pub async fn load_categories(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Categories, true));
        let result = self.store.list_categories(self.owner()).await;
        Ok(self.settle(Resource::Categories, result, Action::SetCategories)?)
    }

    /// Re-fetches the transaction listing for the current filters.
    pub async fn load_transactions(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Transactions, true));
        let filters = self.state.filters;
        let result = self.store.list_transactions(self.owner(), &filters).await;
        Ok(self.settle(Resource::Transactions, result, Action::SetTransactions)?)
    }

    pub async fn load_tags(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Tags, true));
        let result = self.store.list_tags(self.owner()).await;
        Ok(self.settle(Resource::Tags, result, Action::SetTags)?)
    }

    pub async fn load_budgets(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Budgets, true));
        let period = self.state.filters.period;
        let result = self.store.list_budgets(self.owner(), period).await;
        Ok(self.settle(Resource::Budgets, result, Action::SetBudgets)?)
    }

    /// Summary, upcoming payments and category spend of the filtered month, fetched together.
    pub async fn load_dashboard_data(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Dashboard, true));
        let owner = self.owner();
        let today = self.clock.today();
        let period = self.state.filters.period;

        let (summary, upcoming, category_spend) = tokio::join!(
            self.store.dashboard_summary(owner, period, today),
            self.store.upcoming_payments(owner, today, self.upcoming_days),
            self.store.category_spend(owner, period),
        );
        let result = summary.and_then(|summary| {
            Ok(DashboardData {
                summary,
                upcoming: upcoming?,
                category_spend: category_spend?,
            })
        });
        Ok(self.settle(Resource::Dashboard, result, Action::SetDashboard)?)
    }

    /// Rolling income/expense trend ending at the filtered month.
    pub async fn load_reports(&mut self) -> Result<(), AppError> {
        self.dispatch(Action::SetLoading(Resource::Reports, true));
        let end = self.state.filters.period;
        let months = self.trend_months.max(1);
        let start = end.back(months - 1);
        let range = DateRange::new(start.first_day(), end.last_day()).map_err(|err| {
            self.dispatch(Action::SetLoading(Resource::Reports, false));
            AppError::Core(err.into())
        })?;

        let fetched = self.store.list_transactions_between(self.owner(), range).await;
        let trend = match fetched {
            Ok(transactions) => match TrendService::rolling(&transactions, end, months) {
                Ok(trend) => Ok(trend),
                Err(err) => {
                    self.dispatch(Action::SetLoading(Resource::Reports, false));
                    return Err(err.into());
                }
            },
            Err(err) => Err(err),
        };
        Ok(self.settle(Resource::Reports, trend, Action::SetTrend)?)
    }

    pub async fn create_account(&mut self, draft: AccountDraft) -> Result<Account, AppError> {
        let draft = draft.validated()?;
        match self.store.create_account(self.owner(), &draft).await {
            Ok(account) => {
                info!(account = %account.id, "account created");
                self.dispatch(Action::AddAccount(account.clone()));
                self.succeed("Account created");
                Ok(account)
            }
            Err(err) => Err(self.fail("Could not create account", err)),
        }
    }

    pub async fn update_account(&mut self, id: Uuid, draft: AccountDraft) -> Result<Account, AppError> {
        let draft = draft.validated()?;
        match self.store.update_account(id, &draft).await {
            Ok(account) => {
                info!(account = %id, "account updated");
                if account.active {
                    self.dispatch(Action::UpdateAccount(account.clone()));
                } else {
                    self.dispatch(Action::DeactivateAccount(id));
                }
                self.succeed("Account updated");
                Ok(account)
            }
            Err(err) => Err(self.fail("Could not update account", err)),
        }
    }

    /// Accounts are never removed from the data store, only flagged inactive.
    pub async fn deactivate_account(&mut self, id: Uuid) -> Result<Account, AppError> {
        let Some(account) = self.state.account(id) else {
            return Err(ValidationErrors::single("account_id", "unknown account").into());
        };
        let mut draft = AccountDraft::from_account(account);
        draft.active = false;
        match self.store.update_account(id, &draft).await {
            Ok(account) => {
                info!(account = %id, "account deactivated");
                self.dispatch(Action::DeactivateAccount(id));
                self.succeed("Account deactivated");
                Ok(account)
            }
            Err(err) => Err(self.fail("Could not deactivate account", err)),
        }
    }

    pub async fn create_category(&mut self, draft: CategoryDraft) -> Result<Category, AppError> {
        draft.validate()?;
        match self.store.create_category(self.owner(), &draft).await {
            Ok(category) => {
                info!(category = %category.id, "category created");
                self.dispatch(Action::AddCategory(category.clone()));
                self.succeed("Category created");
                Ok(category)
            }
            Err(err) => Err(self.fail("Could not create category", err)),
        }
    }

    pub async fn update_category(
        &mut self,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<Category, AppError> {
        draft.validate()?;
        match self.store.update_category(id, &draft).await {
            Ok(category) => {
                info!(category = %id, "category updated");
                self.dispatch(Action::UpdateCategory(category.clone()));
                self.succeed("Category updated");
                Ok(category)
            }
            Err(err) => Err(self.fail("Could not update category", err)),
        }
    }

    /// A chosen category must exist and accept the transaction type.
    fn check_category(&self, draft: &TransactionDraft) -> Result<(), ValidationErrors> {
        let Some(category_id) = draft.category_id else {
            return Ok(());
        };
        match self.state.category(category_id) {
            Some(category) if category.accepts(draft.kind) => Ok(()),
            Some(_) => Err(ValidationErrors::single(
                "category_id",
                "category does not match the transaction type",
            )),
            None => Err(ValidationErrors::single("category_id", "unknown category")),
        }
    }

    fn prepare(&self, draft: TransactionDraft) -> Result<TransactionDraft, ValidationErrors> {
        let draft = draft.validated()?;
        self.check_category(&draft)?;
        Ok(draft)
    }

    /// Balances are derived by the data store, so accounts are re-fetched afterwards.
    pub async fn create_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> Result<Transaction, AppError> {
        let draft = self.prepare(draft)?;
        match self.store.create_transaction(self.owner(), &draft).await {
            Ok(transaction) => {
                info!(transaction = %transaction.id, "transaction created");
                self.dispatch(Action::AddTransaction(transaction.clone()));
                self.succeed("Transaction created");
                self.refresh_balances().await;
                Ok(transaction)
            }
            Err(err) => Err(self.fail("Could not create transaction", err)),
        }
    }

    pub async fn update_transaction(
        &mut self,
        id: Uuid,
        draft: TransactionDraft,
    ) -> Result<Transaction, AppError> {
        let draft = self.prepare(draft)?;
        match self.store.update_transaction(id, &draft).await {
            Ok(transaction) => {
                info!(transaction = %id, "transaction updated");
                self.dispatch(Action::UpdateTransaction(transaction.clone()));
                self.succeed("Transaction updated");
                self.refresh_balances().await;
                Ok(transaction)
            }
            Err(err) => Err(self.fail("Could not update transaction", err)),
        }
    }

    pub async fn delete_transaction(&mut self, id: Uuid) -> Result<(), AppError> {
        match self.store.delete_transaction(id).await {
            Ok(()) => {
                info!(transaction = %id, "transaction deleted");
                self.dispatch(Action::DeleteTransaction(id));
                self.succeed("Transaction deleted");
                self.refresh_balances().await;
                Ok(())
            }
            Err(err) => Err(self.fail("Could not delete transaction", err)),
        }
    }

    async fn refresh_balances(&mut self) {
        // The mutation already succeeded; a failed refresh only queues its own notice.
        if let Err(err) = self.load_accounts().await {
            debug!(error = %err, "balance refresh failed");
        }
    }

    pub async fn create_tag(&mut self, draft: TagDraft) -> Result<Tag, AppError> {
        draft.validate()?;
        match self.store.create_tag(self.owner(), &draft).await {
            Ok(tag) => {
                info!(tag = %tag.id, "tag created");
                self.dispatch(Action::AddTag(tag.clone()));
                self.succeed("Tag created");
                Ok(tag)
            }
            Err(err) => Err(self.fail("Could not create tag", err)),
        }
    }

    pub async fn delete_tag(&mut self, id: Uuid) -> Result<(), AppError> {
        match self.store.delete_tag(id).await {
            Ok(()) => {
                info!(tag = %id, "tag deleted");
                self.dispatch(Action::DeleteTag(id));
                self.succeed("Tag deleted");
                Ok(())
            }
            Err(err) => Err(self.fail("Could not delete tag", err)),
        }
    }

    pub async fn create_budget(&mut self, draft: BudgetDraft) -> Result<Budget, AppError> {
        draft.validate()?;
        match self.store.create_budget(self.owner(), &draft).await {
            Ok(budget) => {
                info!(budget = %budget.id, "budget created");
                if budget.applies_to(self.state.filters.period) {
                    self.dispatch(Action::AddBudget(budget.clone()));
                }
                self.succeed("Budget created");
                Ok(budget)
            }
            Err(err) => Err(self.fail("Could not create budget", err)),
        }
    }

    /// Merges `patch` into the filters and re-fetches the listing. A month change also
    /// refreshes budgets and the dashboard.
    pub async fn update_filters(&mut self, patch: FilterPatch) -> Result<(), AppError> {
        let previous = self.state.filters.period;
        self.dispatch(Action::PatchFilters(patch));
        self.after_filter_change(previous).await
    }

    /// Back to the current month with no selectors.
    pub async fn clear_filters(&mut self) -> Result<(), AppError> {
        let previous = self.state.filters.period;
        let today = self.clock.today();
        self.dispatch(Action::ClearFilters { today });
        self.after_filter_change(previous).await
    }

    async fn after_filter_change(&mut self, previous: YearMonth) -> Result<(), AppError> {
        let transactions = self.load_transactions().await;
        if self.state.filters.period != previous {
            debug!(period = %self.state.filters.period, "period changed");
            let budgets = self.load_budgets().await;
            let dashboard = self.load_dashboard_data().await;
            transactions?;
            budgets?;
            dashboard?;
            return Ok(());
        }
        transactions
    }

    /// Report, listing summary and status counts for the loaded listing, memoised on the
    /// state revision and today's date.
    pub fn report(&mut self) -> &DerivedReport {
        let today = self.clock.today();
        let revision = self.state.revision();
        if self
            .derived
            .as_ref()
            .is_some_and(|derived| !derived.is_current(revision, today))
        {
            self.derived = None;
        }
        let state = &self.state;
        self.derived
            .get_or_insert_with(|| DerivedReport::build(state, today))
    }

    /// Occurrences of the loaded recurring transactions within `window`.
    pub fn forecast(&self, window: DateRange) -> Forecast {
        ForecastService::window(&self.state.transactions, window, self.clock.today())
    }

    pub fn accounts_overview(&self) -> AccountsOverview {
        BalanceService::overview(&self.state.accounts)
    }

    pub fn budget_usage(&self) -> Vec<BudgetUsage> {
        BudgetService::usage(
            &self.state.budgets,
            &self.state.categories,
            &self.state.transactions,
            self.state.filters.period,
        )
    }

    /// Writes the current preferences to `dir` as a settings backup.
    pub fn export_settings(&mut self, dir: &Path) -> Result<PathBuf, AppError> {
        match transfer::export_settings(dir, &self.preferences, self.clock.now()) {
            Ok(path) => {
                info!(path = %path.display(), "settings exported");
                self.succeed("Settings exported");
                Ok(path)
            }
            Err(err) => {
                error!(error = %err, "settings export failed");
                self.notices.push(Notice::error("Could not export settings"));
                Err(err.into())
            }
        }
    }

    /// Replaces the preferences with a backup's. Nothing changes unless the whole
    /// document parses.
    pub fn import_settings(&mut self, path: &Path) -> Result<&Preferences, AppError> {
        match transfer::read_settings(path) {
            Ok(document) => {
                info!(path = %path.display(), "settings imported");
                self.preferences = document.settings;
                self.succeed("Settings imported");
                Ok(&self.preferences)
            }
            Err(err) => {
                warn!(error = %err, "settings import rejected");
                self.notices.push(Notice::error(err.to_string()));
                Err(err.into())
            }
        }
    }

    /// Writes the report of the filtered month plus its transactions to `dir`.
    pub fn export_report(&mut self, dir: &Path) -> Result<PathBuf, AppError> {
        let exported_at = self.clock.now();
        let period = self.state.filters.period;
        let report = self.report().report.clone();
        let document = ReportDocument::new(&report, &self.state.transactions, exported_at);
        let path = dir.join(transfer::report_file_name(period));
        match transfer::write_document(&path, &document) {
            Ok(()) => {
                info!(path = %path.display(), "report exported");
                self.succeed("Report exported");
                Ok(path)
            }
            Err(err) => {
                error!(error = %err, "report export failed");
                self.notices.push(Notice::error("Could not export report"));
                Err(err.into())
            }
        }
    }
}
