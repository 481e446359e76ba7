//! Derived account balances.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use finboard_domain::{Account, AccountKind, Transaction};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountsOverview {
    pub total_balance: Decimal,
    pub active_accounts: usize,
    pub by_kind: BTreeMap<AccountKind, Decimal>,
}

pub struct BalanceService;

impl BalanceService {
    /// Initial balance plus the signed amounts of paid transactions on the account.
    pub fn current_balance(account: &Account, transactions: &[Transaction]) -> Decimal {
        transactions
            .iter()
            .filter(|txn| txn.account_id == account.id && txn.is_paid())
            .fold(account.initial_balance, |balance, txn| {
                balance + txn.signed_amount()
            })
    }

    /// Recomputes `current_balance` of every account from `transactions`.
    pub fn reconcile(accounts: &mut [Account], transactions: &[Transaction]) {
        for account in accounts.iter_mut() {
            account.current_balance = Self::current_balance(account, transactions);
        }
    }

    pub fn overview(accounts: &[Account]) -> AccountsOverview {
        let mut overview = AccountsOverview::default();
        for account in accounts.iter().filter(|account| account.active) {
            overview.total_balance += account.current_balance;
            overview.active_accounts += 1;
            *overview.by_kind.entry(account.kind).or_default() += account.current_balance;
        }
        overview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finboard_domain::{AccountDraft, TransactionDraft, TransactionKind, TransactionStatus};
    use uuid::Uuid;

    #[test]
    fn overview_skips_inactive_accounts() {
        let owner = Uuid::new_v4();
        let mut checking = Account::from_draft(
            Uuid::new_v4(),
            owner,
            AccountDraft::new("Checking", AccountKind::Checking).with_initial_balance(Decimal::from(300)),
        )
        .unwrap();
        let savings = Account::from_draft(
            Uuid::new_v4(),
            owner,
            AccountDraft::new("Savings", AccountKind::Savings).with_initial_balance(Decimal::from(700)),
        )
        .unwrap();
        let mut closed = savings.clone();
        closed.id = Uuid::new_v4();
        closed.active = false;

        let paid = Transaction::from_draft(
            Uuid::new_v4(),
            owner,
            TransactionDraft::new(
                "Salary",
                Decimal::from(50),
                TransactionKind::Income,
                checking.id,
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            )
            .with_status(TransactionStatus::Paid),
        )
        .unwrap();
        checking.current_balance = BalanceService::current_balance(&checking, &[paid]);

        let overview = BalanceService::overview(&[checking, savings, closed]);
        assert_eq!(overview.active_accounts, 2);
        assert_eq!(overview.total_balance, Decimal::from(1050));
        assert_eq!(overview.by_kind.get(&AccountKind::Checking), Some(&Decimal::from(350)));
    }
}
