use serde::Serialize;
use serde_json::Value as JsonValue;

use tailorshop_core::{DayBucketer, DayKey, Money};
use tailorshop_sales::Order;

use crate::aggregator::RevenueAggregator;
use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordKind, RecordRef};
use crate::error::ReportResult;
use crate::scope::Scope;
use crate::snapshot::Snapshot;

/// Revenue, expenses and net profit for one scope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitReport {
    pub scope: Scope,
    pub revenue: Money,
    pub expenses: Money,
    pub shop_expenses: Money,
    pub worker_expenses: Money,
    pub net_profit: Money,
    pub order_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProfitReport {
    /// True when some record was skipped or absorbed as zero, so a zero figure
    /// may not mean "no data".
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl RevenueAggregator {
    pub fn compute_profit(&self, snapshot: &Snapshot, scope: Scope) -> ProfitReport {
        let revenue = self.select_paid_revenue(&snapshot.orders, &snapshot.bills);
        let expenses = self.sum_expenses(&snapshot.daily_expenses, &snapshot.worker_expenses);

        let mut log = DiagnosticLog::default();
        let order_count = self.count_orders(&snapshot.orders, scope, &mut log);

        let in_scope = |key: DayKey| scope.contains(key);
        let revenue_total = revenue.by_date.total_where(in_scope);
        let shop_expenses = expenses.shop_by_date.total_where(in_scope);
        let worker_expenses = expenses.worker_by_date.total_where(in_scope);
        let expense_total = shop_expenses + worker_expenses;

        let diagnostics: Vec<Diagnostic> = snapshot
            .intake
            .iter()
            .cloned()
            .chain(revenue.diagnostics)
            .chain(expenses.diagnostics)
            .chain(log.into_vec())
            .collect();

        let report = ProfitReport {
            scope,
            revenue: revenue_total,
            expenses: expense_total,
            shop_expenses,
            worker_expenses,
            net_profit: revenue_total - expense_total,
            order_count,
            diagnostics,
        };
        tracing::info!(
            scope = %report.scope,
            revenue = %report.revenue,
            expenses = %report.expenses,
            net_profit = %report.net_profit,
            order_count = report.order_count,
            diagnostics = report.diagnostics.len(),
            "profit computed"
        );
        report
    }

    /// Orders in scope, whatever their payment status.
    pub(crate) fn count_orders(
        &self,
        orders: &[Order],
        scope: Scope,
        log: &mut DiagnosticLog,
    ) -> usize {
        if scope == Scope::AllTime {
            return orders.len();
        }
        orders
            .iter()
            .enumerate()
            .filter(|(position, order)| {
                let record = RecordRef::of(RecordKind::Order, *position, *order);
                scope.contains(self.bucket(record, &order.day_candidates(), log))
            })
            .count()
    }
}

/// Reads the four raw collections and computes the report for `scope`.
///
/// Fails only when a collection is neither null nor an array.
pub fn compute_profit_json(
    orders: &JsonValue,
    bills: &JsonValue,
    daily_expenses: &JsonValue,
    worker_expenses: &JsonValue,
    scope: Scope,
    bucketer: DayBucketer,
) -> ReportResult<ProfitReport> {
    let snapshot = Snapshot::from_collections(orders, bills, daily_expenses, worker_expenses)?;
    Ok(RevenueAggregator::new(bucketer).compute_profit(&snapshot, scope))
}
