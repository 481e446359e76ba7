//! Due-date views: upcoming payments, overdue and pending counts.

use chrono::NaiveDate;
use serde::Serialize;

use finboard_domain::{DateRange, Transaction, TransactionStatus};

/// Default look-ahead for upcoming payments, in days.
pub const DEFAULT_UPCOMING_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub overdue: usize,
    pub paid: usize,
    pub cancelled: usize,
}

pub struct ScheduleService;

impl ScheduleService {
    /// Open transactions due within `[today, today + days]`, earliest first.
    pub fn upcoming(transactions: &[Transaction], today: NaiveDate, days: u32) -> Vec<Transaction> {
        let window = DateRange::upcoming(today, days);
        let mut upcoming: Vec<Transaction> = transactions
            .iter()
            .filter(|txn| txn.is_open(today) && window.contains(txn.due_date()))
            .cloned()
            .collect();
        upcoming.sort_by(|a, b| {
            a.due_date()
                .cmp(&b.due_date())
                .then_with(|| a.description.cmp(&b.description))
        });
        upcoming
    }

    /// Transactions whose effective status is overdue, oldest due date first.
    pub fn overdue(transactions: &[Transaction], today: NaiveDate) -> Vec<&Transaction> {
        let mut overdue: Vec<&Transaction> = transactions
            .iter()
            .filter(|txn| txn.is_overdue(today))
            .collect();
        overdue.sort_by_key(|txn| txn.due_date());
        overdue
    }

    pub fn overdue_count(transactions: &[Transaction], today: NaiveDate) -> usize {
        transactions.iter().filter(|txn| txn.is_overdue(today)).count()
    }

    /// Pending or scheduled entries that are not yet late.
    pub fn pending_count(transactions: &[Transaction], today: NaiveDate) -> usize {
        transactions.iter().filter(|txn| txn.is_open(today)).count()
    }

    pub fn status_counts(transactions: &[Transaction], today: NaiveDate) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for txn in transactions {
            match txn.effective_status(today) {
                TransactionStatus::Pending | TransactionStatus::Scheduled => counts.pending += 1,
                TransactionStatus::Overdue => counts.overdue += 1,
                TransactionStatus::Paid => counts.paid += 1,
                TransactionStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }
}
