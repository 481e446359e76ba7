//! Application state: the loaded snapshot, the transitions that change it and the
//! async orchestrator that talks to the data store.

mod action;
mod notice;
mod store;

pub use action::Action;
pub use notice::{Notice, NoticeLevel};
pub use store::{DerivedReport, FinanceStore};

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use finboard_core::TrendReport;
use finboard_domain::{Account, Budget, Category, FilterSet, Tag, Transaction};
use finboard_store::{CategorySpend, DashboardSummary};

/// Data sets that are fetched independently and carry their own loading flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Dashboard,
    Transactions,
    Accounts,
    Categories,
    Reports,
    Tags,
    Budgets,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Dashboard,
        Resource::Transactions,
        Resource::Accounts,
        Resource::Categories,
        Resource::Reports,
        Resource::Tags,
        Resource::Budgets,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Transactions => "transactions",
            Resource::Accounts => "accounts",
            Resource::Categories => "categories",
            Resource::Reports => "reports",
            Resource::Tags => "tags",
            Resource::Budgets => "budgets",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadingFlags {
    pub dashboard: bool,
    pub transactions: bool,
    pub accounts: bool,
    pub categories: bool,
    pub reports: bool,
    pub tags: bool,
    pub budgets: bool,
}

impl LoadingFlags {
    pub fn get(&self, resource: Resource) -> bool {
        match resource {
            Resource::Dashboard => self.dashboard,
            Resource::Transactions => self.transactions,
            Resource::Accounts => self.accounts,
            Resource::Categories => self.categories,
            Resource::Reports => self.reports,
            Resource::Tags => self.tags,
            Resource::Budgets => self.budgets,
        }
    }

    pub fn set(&mut self, resource: Resource, loading: bool) {
        let flag = match resource {
            Resource::Dashboard => &mut self.dashboard,
            Resource::Transactions => &mut self.transactions,
            Resource::Accounts => &mut self.accounts,
            Resource::Categories => &mut self.categories,
            Resource::Reports => &mut self.reports,
            Resource::Tags => &mut self.tags,
            Resource::Budgets => &mut self.budgets,
        };
        *flag = loading;
    }

    pub fn any(&self) -> bool {
        Resource::ALL.iter().any(|resource| self.get(*resource))
    }
}

/// Figures shown on the dashboard, as last fetched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardData {
    pub summary: DashboardSummary,
    pub upcoming: Vec<Transaction>,
    pub category_spend: Vec<CategorySpend>,
}

/// Snapshot of everything loaded for one owner. Only [`Action`]s change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub owner_id: Uuid,
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub tags: Vec<Tag>,
    pub budgets: Vec<Budget>,
    pub filters: FilterSet,
    pub loading: LoadingFlags,
    pub dashboard: DashboardData,
    pub trend: Option<TrendReport>,
    revision: u64,
}

impl AppState {
    pub fn new(owner_id: Uuid, today: NaiveDate) -> Self {
        Self {
            owner_id,
            accounts: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            tags: Vec::new(),
            budgets: Vec::new(),
            filters: FilterSet::cleared(today),
            loading: LoadingFlags::default(),
            dashboard: DashboardData::default(),
            trend: None,
            revision: 0,
        }
    }

    /// Bumped by every action that changes data or filters.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn account(&self, id: Uuid) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn tag(&self, id: Uuid) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.id == id)
    }
}
