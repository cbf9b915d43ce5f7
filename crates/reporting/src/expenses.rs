use serde::Serialize;

use tailorshop_core::{Money, TimestampCandidate};
use tailorshop_expenses::{DailyExpense, WorkerExpense};

use crate::aggregator::RevenueAggregator;
use crate::buckets::Buckets;
use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordKind, RecordRef};

/// Shop and worker expenses per day, kept apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpenseTotals {
    pub shop_by_date: Buckets,
    pub worker_by_date: Buckets,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExpenseTotals {
    pub fn total_expenses(&self) -> Money {
        self.shop_total() + self.worker_total()
    }

    pub fn shop_total(&self) -> Money {
        self.shop_by_date.total()
    }

    pub fn worker_total(&self) -> Money {
        self.worker_by_date.total()
    }

    /// Shop and worker expenses merged per day.
    pub fn by_date(&self) -> Buckets {
        self.shop_by_date.merged(&self.worker_by_date)
    }
}

impl RevenueAggregator {
    pub fn sum_expenses(&self, daily: &[DailyExpense], worker: &[WorkerExpense]) -> ExpenseTotals {
        let mut log = DiagnosticLog::default();

        let mut shop_by_date = Buckets::new();
        for (position, expense) in daily.iter().enumerate() {
            let record = RecordRef::of(RecordKind::DailyExpense, position, expense);
            let cost: Money = expense
                .cost_components()
                .into_iter()
                .map(|(field, value)| self.amount(record, field, value, &mut log))
                .sum();
            let key = self.bucket(
                record,
                &[TimestampCandidate::new("Date", &expense.date)],
                &mut log,
            );
            shop_by_date.add(key, cost);
        }

        let mut worker_by_date = Buckets::new();
        for (position, expense) in worker.iter().enumerate() {
            let record = RecordRef::of(RecordKind::WorkerExpense, position, expense);
            let paid = self.amount(record, "Amt_Paid", &expense.amt_paid, &mut log);
            let key = self.bucket(
                record,
                &[TimestampCandidate::new("date", &expense.date)],
                &mut log,
            );
            worker_by_date.add(key, paid);
        }

        let totals = ExpenseTotals {
            shop_by_date,
            worker_by_date,
            diagnostics: log.into_vec(),
        };
        tracing::debug!(
            daily = daily.len(),
            worker = worker.len(),
            expenses = %totals.total_expenses(),
            "expenses summed"
        );
        totals
    }
}
