use chrono::NaiveDate;
use finboard_domain::{
    AccountDraft, AccountKind, BudgetDraft, CategoryDraft, CategoryKind, FilterSet, TagDraft,
    TransactionDraft, TransactionKind, TransactionStatus, YearMonth,
};
use finboard_store::{DataStore, MemoryStore, StoreError};
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march() -> YearMonth {
    YearMonth::new(2024, 3).unwrap()
}

#[tokio::test]
async fn accounts_are_listed_by_name_with_derived_balance() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let wallet = store
        .create_account(owner, &AccountDraft::new("Wallet", AccountKind::Cash))
        .await
        .unwrap();
    let checking = store
        .create_account(
            owner,
            &AccountDraft::new("Checking", AccountKind::Checking)
                .with_initial_balance(Decimal::from(1000)),
        )
        .await
        .unwrap();

    let paid = TransactionDraft::new(
        "Groceries",
        Decimal::from(150),
        TransactionKind::Expense,
        checking.id,
        date(2024, 3, 5),
    )
    .with_status(TransactionStatus::Paid);
    let pending = TransactionDraft::new(
        "Salary",
        Decimal::from(3000),
        TransactionKind::Income,
        checking.id,
        date(2024, 3, 28),
    );
    store.create_transaction(owner, &paid).await.unwrap();
    store.create_transaction(owner, &pending).await.unwrap();

    let accounts = store.list_accounts(owner).await.unwrap();
    let names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Checking", "Wallet"]);
    assert_eq!(accounts[0].current_balance, Decimal::from(850));
    assert_eq!(accounts[1].id, wallet.id);
    assert_eq!(accounts[1].current_balance, Decimal::ZERO);
}

#[tokio::test]
async fn deactivated_rows_are_hidden_from_listings() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let account = store
        .create_account(owner, &AccountDraft::new("Old card", AccountKind::CreditCard))
        .await
        .unwrap();
    let mut draft = AccountDraft::from_account(&account);
    draft.active = false;
    store.update_account(account.id, &draft).await.unwrap();

    let category = store
        .create_category(owner, &CategoryDraft::new("Hobbies", CategoryKind::Expense))
        .await
        .unwrap();
    let mut category_draft = CategoryDraft::from_category(&category);
    category_draft.active = false;
    store
        .update_category(category.id, &category_draft)
        .await
        .unwrap();

    assert!(store.list_accounts(owner).await.unwrap().is_empty());
    assert!(store.list_categories(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn listings_are_scoped_to_owner() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    store
        .create_tag(owner, &TagDraft::new("travel"))
        .await
        .unwrap();

    assert_eq!(store.list_tags(owner).await.unwrap().len(), 1);
    assert!(store.list_tags(Uuid::new_v4()).await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_drafts_are_rejected_with_field_errors() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let account = store
        .create_account(owner, &AccountDraft::new("Checking", AccountKind::Checking))
        .await
        .unwrap();
    let draft = TransactionDraft::new(
        "  ",
        Decimal::ZERO,
        TransactionKind::Expense,
        account.id,
        date(2024, 3, 1),
    );

    match store.create_transaction(owner, &draft).await {
        Err(StoreError::Validation(errors)) => {
            assert!(errors.contains("description"));
            assert!(errors.contains("amount"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();

    let err = store.delete_transaction(missing).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "transaction", id } if id == missing));

    let draft = TransactionDraft::new(
        "Orphan",
        Decimal::from(10),
        TransactionKind::Expense,
        Uuid::new_v4(),
        date(2024, 3, 1),
    );
    let err = store
        .create_transaction(Uuid::new_v4(), &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "account", .. }));
}

#[tokio::test]
async fn filtered_listing_is_newest_first_and_honours_tags() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let account = store
        .create_account(owner, &AccountDraft::new("Checking", AccountKind::Checking))
        .await
        .unwrap();
    let tag = store
        .create_tag(owner, &TagDraft::new("work"))
        .await
        .unwrap();

    for (day, tagged) in [(3, true), (20, false), (12, true)] {
        let mut draft = TransactionDraft::new(
            format!("Entry {day}"),
            Decimal::from(10),
            TransactionKind::Expense,
            account.id,
            date(2024, 3, day),
        );
        if tagged {
            draft = draft.with_tags(vec![tag.id]);
        }
        store.create_transaction(owner, &draft).await.unwrap();
    }
    let april = TransactionDraft::new(
        "Next month",
        Decimal::from(10),
        TransactionKind::Expense,
        account.id,
        date(2024, 4, 1),
    );
    store.create_transaction(owner, &april).await.unwrap();

    let mut filters = FilterSet::for_period(march());
    let all = store.list_transactions(owner, &filters).await.unwrap();
    let days: Vec<u32> = all
        .iter()
        .map(|txn| chrono::Datelike::day(&txn.transaction_date))
        .collect();
    assert_eq!(days, vec![20, 12, 3]);

    filters.tag_id = Some(tag.id);
    let tagged = store.list_transactions(owner, &filters).await.unwrap();
    assert_eq!(tagged.len(), 2);

    store.delete_tag(tag.id).await.unwrap();
    let after = store.list_transactions(owner, &filters).await.unwrap();
    assert!(after.is_empty());
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_owner() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let account = store
        .create_account(owner, &AccountDraft::new("Checking", AccountKind::Checking))
        .await
        .unwrap();
    let created = store
        .create_transaction(
            owner,
            &TransactionDraft::new(
                "Internet",
                Decimal::from(80),
                TransactionKind::Expense,
                account.id,
                date(2024, 3, 10),
            ),
        )
        .await
        .unwrap();

    let draft = TransactionDraft::from_transaction(&created).with_status(TransactionStatus::Paid);
    let updated = store
        .update_transaction(created.id, &draft)
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.owner_id, owner);
    assert_eq!(updated.status, TransactionStatus::Paid);

    let accounts = store.list_accounts(owner).await.unwrap();
    assert_eq!(accounts[0].current_balance, Decimal::from(-80));
}

#[tokio::test]
async fn dashboard_projects_overdue_from_due_date() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let account = store
        .create_account(owner, &AccountDraft::new("Checking", AccountKind::Checking))
        .await
        .unwrap();
    let today = date(2024, 3, 15);

    let late = TransactionDraft::new(
        "Water bill",
        Decimal::from(40),
        TransactionKind::Expense,
        account.id,
        date(2024, 3, 1),
    )
    .with_due_date(date(2024, 3, 10));
    let soon = TransactionDraft::new(
        "Phone bill",
        Decimal::from(60),
        TransactionKind::Expense,
        account.id,
        date(2024, 3, 1),
    )
    .with_due_date(date(2024, 3, 18));
    let salary = TransactionDraft::new(
        "Salary",
        Decimal::from(2000),
        TransactionKind::Income,
        account.id,
        date(2024, 3, 5),
    )
    .with_status(TransactionStatus::Paid);
    for draft in [&late, &soon, &salary] {
        store.create_transaction(owner, draft).await.unwrap();
    }

    let summary = store
        .dashboard_summary(owner, YearMonth::of(today), today)
        .await
        .unwrap();
    assert_eq!(summary.total_income, Decimal::from(2000));
    assert_eq!(summary.total_expense, Decimal::ZERO);
    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.pending_count, 1);

    let upcoming = store.upcoming_payments(owner, today, 7).await.unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].description, "Phone bill");
}

#[tokio::test]
async fn budgets_and_category_spend_follow_the_month() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let account = store
        .create_account(owner, &AccountDraft::new("Checking", AccountKind::Checking))
        .await
        .unwrap();
    let food = store
        .create_category(owner, &CategoryDraft::new("Food", CategoryKind::Expense))
        .await
        .unwrap();
    store
        .create_budget(owner, &BudgetDraft::new(food.id, march(), Decimal::from(500)))
        .await
        .unwrap();

    let groceries = TransactionDraft::new(
        "Groceries",
        Decimal::from(120),
        TransactionKind::Expense,
        account.id,
        date(2024, 3, 8),
    )
    .with_category(food.id)
    .with_status(TransactionStatus::Paid);
    store.create_transaction(owner, &groceries).await.unwrap();

    assert_eq!(store.list_budgets(owner, march()).await.unwrap().len(), 1);
    assert!(store
        .list_budgets(owner, march().next())
        .await
        .unwrap()
        .is_empty());

    let spend = store.category_spend(owner, march()).await.unwrap();
    assert_eq!(spend.len(), 1);
    assert_eq!(spend[0].category_name, "Food");
    assert_eq!(spend[0].total, Decimal::from(120));
}
