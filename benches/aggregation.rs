use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use finboard_core::{ForecastService, RecurrenceService, SummaryService, TrendService};
use finboard_domain::{
    Account, AccountDraft, AccountKind, Category, CategoryDraft, CategoryKind, DateRange,
    FilterSet, RecurrenceRule, RecurrenceUnit, Transaction, TransactionDraft, TransactionKind,
    TransactionStatus, YearMonth,
};
use rust_decimal::Decimal;
use uuid::Uuid;

struct Sample {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
}

fn build_sample(txn_count: usize) -> Sample {
    let owner = Uuid::new_v4();
    let checking = Account::from_draft(
        Uuid::new_v4(),
        owner,
        AccountDraft::new("Checking", AccountKind::Checking),
    )
    .expect("account");
    let categories: Vec<Category> = ["Groceries", "Rent", "Transport", "Leisure"]
        .iter()
        .map(|name| {
            Category::from_draft(
                Uuid::new_v4(),
                owner,
                CategoryDraft::new(*name, CategoryKind::Expense),
            )
            .expect("category")
        })
        .collect();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let transactions = (0..txn_count)
        .map(|idx| {
            let date = start + Duration::days((idx % 365) as i64);
            let kind = if idx % 5 == 0 {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            };
            let mut draft = TransactionDraft::new(
                format!("Entry {idx}"),
                Decimal::new(5_000 + (idx % 100) as i64 * 25, 2),
                kind,
                checking.id,
                date,
            );
            if kind == TransactionKind::Expense {
                draft = draft.with_category(categories[idx % categories.len()].id);
            }
            if idx % 3 != 0 {
                draft = draft.with_status(TransactionStatus::Paid);
            }
            if idx % 50 == 0 {
                draft = draft.recurring(RecurrenceRule::new(RecurrenceUnit::Monthly, date));
            }
            Transaction::from_draft(Uuid::new_v4(), owner, draft).expect("transaction")
        })
        .collect();

    Sample {
        accounts: vec![checking],
        categories,
        transactions,
    }
}

fn bench_reports(c: &mut Criterion) {
    let sample = build_sample(black_box(10_000));
    let filters = FilterSet::for_period(YearMonth::new(2024, 6).unwrap());

    c.bench_function("report_10k", |b| {
        b.iter(|| {
            let report = SummaryService::report(
                &sample.transactions,
                &sample.categories,
                &sample.accounts,
                &filters,
            );
            black_box(report);
        })
    });

    c.bench_function("trend_12_months_10k", |b| {
        b.iter(|| {
            let trend = TrendService::rolling(&sample.transactions, filters.period, 12)
                .expect("trend");
            black_box(trend);
        })
    });
}

fn bench_recurrence(c: &mut Criterion) {
    let sample = build_sample(black_box(10_000));
    let reference = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let window = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    )
    .unwrap();

    c.bench_function("forecast_window_10k", |b| {
        b.iter(|| {
            let forecast = ForecastService::window(&sample.transactions, window, reference);
            black_box(forecast);
        })
    });

    let daily = RecurrenceRule::new(
        RecurrenceUnit::Daily,
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
    );
    c.bench_function("expand_daily_far_start", |b| {
        b.iter(|| {
            let count = RecurrenceService::expand(&daily, window)
                .expect("expand")
                .count();
            black_box(count);
        })
    });
}

criterion_group!(benches, bench_reports, bench_recurrence);
criterion_main!(benches);
