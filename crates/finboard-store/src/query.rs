//! PostgREST query-string builders. Pure functions so the request shape can be tested
//! without a server.

use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use finboard_domain::{DateRange, FilterSet, YearMonth};

pub type Query = Vec<(&'static str, String)>;

pub const ACCOUNTS: &str = "accounts";
pub const CATEGORIES: &str = "categories";
pub const TRANSACTIONS: &str = "transactions";
pub const TRANSACTION_TAGS: &str = "transaction_tags";
pub const TAGS: &str = "tags";
pub const BUDGETS: &str = "budgets";
pub const DASHBOARD_SUMMARY: &str = "dashboard_summary";
pub const MONTHLY_REPORT: &str = "monthly_report";

/// Transaction columns plus the tag links embedded through the join table.
pub const TRANSACTION_SELECT: &str = "*,transaction_tags(tag_id)";

fn eq(value: impl ToString) -> String {
    format!("eq.{}", value.to_string())
}

pub fn by_id(id: Uuid) -> Query {
    vec![("id", eq(id))]
}

pub fn active_by_name(owner: Uuid) -> Query {
    vec![
        ("owner_id", eq(owner)),
        ("active", eq(true)),
        ("order", "name".into()),
    ]
}

pub fn tags(owner: Uuid) -> Query {
    vec![("owner_id", eq(owner)), ("order", "name".into())]
}

/// Half-open `[first day, first day of next month)` bounds of a month.
pub fn month_bounds(period: YearMonth) -> (NaiveDate, NaiveDate) {
    (period.first_day(), period.next().first_day())
}

pub fn transactions(owner: Uuid, filters: &FilterSet) -> Query {
    let (from, until) = month_bounds(filters.period);
    let mut query: Query = vec![
        ("select", TRANSACTION_SELECT.into()),
        ("owner_id", eq(owner)),
        ("transaction_date", format!("gte.{from}")),
        ("transaction_date", format!("lt.{until}")),
    ];
    if let Some(category_id) = filters.category_id {
        query.push(("category_id", eq(category_id)));
    }
    if let Some(account_id) = filters.account_id {
        query.push(("account_id", eq(account_id)));
    }
    if let Some(kind) = filters.kind {
        query.push(("transaction_type", eq(kind.as_str())));
    }
    if let Some(payment_type) = filters.payment_type {
        query.push(("payment_type", eq(payment_type.as_str())));
    }
    if let Some(status) = filters.status {
        query.push(("status", eq(status.as_str())));
    }
    query.push(("order", "transaction_date.desc".into()));
    query
}

pub fn transactions_between(owner: Uuid, range: DateRange) -> Query {
    vec![
        ("select", TRANSACTION_SELECT.into()),
        ("owner_id", eq(owner)),
        ("transaction_date", format!("gte.{}", range.start)),
        ("transaction_date", format!("lte.{}", range.end)),
        ("order", "transaction_date.desc".into()),
    ]
}

pub fn upcoming(owner: Uuid, today: NaiveDate, days: u32) -> Query {
    let until = today
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    // Rows without a due date fall due on their transaction date.
    let window = format!(
        "(and(due_date.gte.{today},due_date.lte.{until}),\
         and(due_date.is.null,transaction_date.gte.{today},transaction_date.lte.{until}))"
    );
    vec![
        ("select", TRANSACTION_SELECT.into()),
        ("owner_id", eq(owner)),
        ("status", "in.(pending,scheduled)".into()),
        ("or", window),
        ("order", "due_date.nullslast,transaction_date".into()),
    ]
}

pub fn budgets(owner: Uuid, period: YearMonth) -> Query {
    vec![
        ("owner_id", eq(owner)),
        ("month", eq(period.month())),
        ("year", eq(period.year())),
        ("active", eq(true)),
    ]
}

pub fn dashboard(owner: Uuid, period: YearMonth) -> Query {
    vec![
        ("owner_id", eq(owner)),
        ("month", eq(period.month())),
        ("year", eq(period.year())),
    ]
}

pub fn category_spend(owner: Uuid, period: YearMonth) -> Query {
    vec![
        ("owner_id", eq(owner)),
        ("month", eq(period.month())),
        ("year", eq(period.year())),
        ("transaction_type", eq("expense")),
        ("order", "total.desc".into()),
    ]
}

pub fn tag_links(transaction_id: Uuid) -> Query {
    vec![("transaction_id", eq(transaction_id))]
}
