use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use tailorshop_billing::Bill;
use tailorshop_core::{BillId, Entity, Money};
use tailorshop_sales::Order;

use crate::aggregator::RevenueAggregator;
use crate::buckets::Buckets;
use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordKind, RecordRef};

/// Realized revenue: the totals of bills behind paid orders, per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueTotals {
    pub by_date: Buckets,
    /// Distinct bills that contributed.
    pub bills_counted: usize,
    pub paid_orders: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl RevenueTotals {
    pub fn total_revenue(&self) -> Money {
        self.by_date.total()
    }
}

impl RevenueAggregator {
    /// Sums the bills referenced by paid orders.
    ///
    /// Each referenced bill counts once however many paid orders point at it.
    /// The bill's own total is used, never the order's. Every bill row
    /// carrying a referenced id is summed, so rows sharing an id all count and
    /// each extra row raises a `DuplicateBill` diagnostic.
    pub fn select_paid_revenue(&self, orders: &[Order], bills: &[Bill]) -> RevenueTotals {
        let mut log = DiagnosticLog::default();

        let mut paid_orders = 0;
        let mut referenced: BTreeMap<BillId, RecordRef> = BTreeMap::new();
        for (position, order) in orders.iter().enumerate() {
            if !order.is_paid() {
                continue;
            }
            paid_orders += 1;
            if let Some(bill_id) = order.bill_id {
                referenced
                    .entry(bill_id)
                    .or_insert_with(|| RecordRef::of(RecordKind::Order, position, order));
            }
        }

        let mut index: HashMap<BillId, Vec<(usize, &Bill)>> = HashMap::with_capacity(bills.len());
        for (position, bill) in bills.iter().enumerate() {
            if let Some(id) = bill.id() {
                index.entry(id).or_default().push((position, bill));
            }
        }

        let mut by_date = Buckets::new();
        let mut bills_counted = 0;
        for (bill_id, order_ref) in referenced {
            let Some(rows) = index.get(&bill_id) else {
                log.record(Diagnostic::DanglingReference {
                    record: order_ref,
                    bill_id,
                });
                continue;
            };
            for (nth, &(position, bill)) in rows.iter().enumerate() {
                let record = RecordRef::of(RecordKind::Bill, position, bill);
                if nth > 0 {
                    log.record(Diagnostic::DuplicateBill { record, bill_id });
                }
                let amount = self.amount(record, "total_amt", &bill.total_amt, &mut log);
                let key = self.bucket(record, &bill.date_candidates(), &mut log);
                by_date.add(key, amount);
            }
            bills_counted += 1;
        }

        let totals = RevenueTotals {
            by_date,
            bills_counted,
            paid_orders,
            diagnostics: log.into_vec(),
        };
        tracing::debug!(
            paid_orders,
            bills_counted,
            revenue = %totals.total_revenue(),
            "paid revenue selected"
        );
        totals
    }
}
