//! Cash actually collected: advances when orders are taken and balances when
//! they are settled.

use serde::Serialize;

use tailorshop_core::{DayKey, Money};
use tailorshop_sales::Order;

use crate::aggregator::RevenueAggregator;
use crate::buckets::Buckets;
use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordKind, RecordRef};
use crate::expenses::ExpenseTotals;
use crate::scope::Scope;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionTotals {
    pub advance_by_date: Buckets,
    pub remaining_by_date: Buckets,
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectionTotals {
    pub fn total_collected(&self) -> Money {
        self.advance_by_date.total() + self.remaining_by_date.total()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionsReport {
    pub scope: Scope,
    pub advance: Money,
    pub remaining: Money,
    pub total_collected: Money,
    pub expenses: Money,
    /// Collected cash less expenses.
    pub net_cash: Money,
    pub diagnostics: Vec<Diagnostic>,
}

impl RevenueAggregator {
    /// Advances go to the day the order was taken; balances of paid orders go
    /// to the day the order was last updated (when it was marked paid).
    pub fn collect_payments(&self, orders: &[Order]) -> CollectionTotals {
        let mut log = DiagnosticLog::default();
        let mut advance_by_date = Buckets::new();
        let mut remaining_by_date = Buckets::new();

        for (position, order) in orders.iter().enumerate() {
            let record = RecordRef::of(RecordKind::Order, position, order);

            let advance = self.amount(record, "payment_amount", &order.payment_amount, &mut log);
            if advance.is_positive() {
                let key = self.bucket(record, &order.day_candidates(), &mut log);
                advance_by_date.add(key, advance);
            }

            if order.is_paid() {
                let total = self.amount(record, "total_amt", &order.total_amt, &mut log);
                let balance = (total - advance).non_negative();
                if balance.is_positive() {
                    let key = self.bucket(record, &order.settlement_candidates(), &mut log);
                    remaining_by_date.add(key, balance);
                }
            }
        }

        CollectionTotals {
            advance_by_date,
            remaining_by_date,
            diagnostics: log.into_vec(),
        }
    }

    pub fn compute_collections(&self, snapshot: &Snapshot, scope: Scope) -> CollectionsReport {
        let collected = self.collect_payments(&snapshot.orders);
        let ExpenseTotals {
            shop_by_date,
            worker_by_date,
            diagnostics: expense_diagnostics,
        } = self.sum_expenses(&snapshot.daily_expenses, &snapshot.worker_expenses);

        let in_scope = |key: DayKey| scope.contains(key);
        let advance = collected.advance_by_date.total_where(in_scope);
        let remaining = collected.remaining_by_date.total_where(in_scope);
        let expenses = shop_by_date.total_where(in_scope) + worker_by_date.total_where(in_scope);
        let total_collected = advance + remaining;

        let diagnostics = snapshot
            .intake
            .iter()
            .cloned()
            .chain(collected.diagnostics)
            .chain(expense_diagnostics)
            .collect();

        tracing::info!(
            scope = %scope,
            advance = %advance,
            remaining = %remaining,
            expenses = %expenses,
            "collections computed"
        );
        CollectionsReport {
            scope,
            advance,
            remaining,
            total_collected,
            expenses,
            net_cash: total_collected - expenses,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn key(s: &str) -> DayKey {
        s.parse().unwrap()
    }

    fn orders() -> Vec<Order> {
        serde_json::from_value(json!([
            {
                "id": 1,
                "payment_status": "paid",
                "total_amt": 1200,
                "payment_amount": 200,
                "order_date": "2025-09-01",
                "updated_at": "2025-09-09T12:00:00Z"
            },
            {
                "id": 2,
                "payment_status": "pending",
                "total_amt": 900,
                "payment_amount": 300,
                "order_date": "2025-09-09"
            },
            {
                "id": 3,
                "payment_status": "paid",
                "total_amt": 500,
                "payment_amount": 500,
                "order_date": "2025-09-05"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn advances_and_balances_land_on_their_own_days() {
        let totals = RevenueAggregator::default().collect_payments(&orders());

        assert_eq!(totals.advance_by_date.get(key("2025-09-01")), Money::from_rupees(200));
        assert_eq!(totals.advance_by_date.get(key("2025-09-09")), Money::from_rupees(300));
        assert_eq!(totals.advance_by_date.get(key("2025-09-05")), Money::from_rupees(500));
        assert_eq!(totals.remaining_by_date.get(key("2025-09-09")), Money::from_rupees(1000));
        // Fully prepaid order leaves nothing to collect.
        assert_eq!(totals.remaining_by_date.len(), 1);
        assert_eq!(totals.total_collected(), Money::from_rupees(2000));
    }

    #[test]
    fn settlement_falls_back_to_order_date() {
        let orders: Vec<Order> = serde_json::from_value(json!([{
            "payment_status": "paid",
            "total_amt": 400,
            "updated_at": "garbage",
            "order_date": "2025-09-03"
        }]))
        .unwrap();

        let totals = RevenueAggregator::default().collect_payments(&orders);

        assert_eq!(totals.remaining_by_date.get(key("2025-09-03")), Money::from_rupees(400));
        assert!(matches!(
            totals.diagnostics.as_slice(),
            [Diagnostic::UnparseableTimestamp { field: "updated_at", .. }]
        ));
    }

    #[test]
    fn report_nets_expenses_for_the_scope() {
        let snapshot = Snapshot {
            orders: orders(),
            worker_expenses: serde_json::from_value(json!([
                {"Amt_Paid": 250, "date": "2025-09-09"},
                {"Amt_Paid": 75, "date": "2025-09-01"}
            ]))
            .unwrap(),
            ..Snapshot::default()
        };
        let day = Scope::Day(NaiveDate::from_ymd_opt(2025, 9, 9).unwrap());

        let report = RevenueAggregator::default().compute_collections(&snapshot, day);

        assert_eq!(report.advance, Money::from_rupees(300));
        assert_eq!(report.remaining, Money::from_rupees(1000));
        assert_eq!(report.total_collected, Money::from_rupees(1300));
        assert_eq!(report.expenses, Money::from_rupees(250));
        assert_eq!(report.net_cash, Money::from_rupees(1050));
    }
}
