//! Day-by-day and week-by-week profit tables with summary statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use tailorshop_core::{DateRange, DayKey, Money};

use crate::aggregator::RevenueAggregator;
use crate::collections::CollectionTotals;
use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordKind, RecordRef};
use crate::expenses::ExpenseTotals;
use crate::revenue::RevenueTotals;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub revenue: Money,
    pub shop_expenses: Money,
    pub worker_expenses: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub advance_collected: Money,
    pub remaining_collected: Money,
    pub order_count: usize,
}

/// Totals over a run of days, e.g. one week of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodProfit {
    pub label: String,
    pub range: DateRange,
    pub revenue: Money,
    pub shop_expenses: Money,
    pub worker_expenses: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub advance_collected: Money,
    pub remaining_collected: Money,
    pub order_count: usize,
    pub days: Vec<DailyProfit>,
}

impl PeriodProfit {
    fn from_days(label: String, range: DateRange, days: Vec<DailyProfit>) -> Self {
        let sum = |f: fn(&DailyProfit) -> Money| days.iter().map(f).sum::<Money>();
        let revenue = sum(|d| d.revenue);
        let shop_expenses = sum(|d| d.shop_expenses);
        let worker_expenses = sum(|d| d.worker_expenses);
        let total_expenses = shop_expenses + worker_expenses;
        Self {
            label,
            range,
            revenue,
            shop_expenses,
            worker_expenses,
            total_expenses,
            net_profit: revenue - total_expenses,
            advance_collected: sum(|d| d.advance_collected),
            remaining_collected: sum(|d| d.remaining_collected),
            order_count: days.iter().map(|d| d.order_count).sum(),
            days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitSummary {
    pub days: usize,
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    pub average_daily_profit: Money,
    /// Net profit as a percentage of revenue; zero without revenue.
    pub profit_margin: f64,
    pub best_day: NaiveDate,
    pub best_day_profit: Money,
    pub worst_day: NaiveDate,
    pub worst_day_profit: Money,
}

impl ProfitSummary {
    /// `None` for an empty slice. Ties for best or worst go to the earliest
    /// row.
    pub fn from_days(days: &[DailyProfit]) -> Option<Self> {
        let first = days.first()?;

        let mut best = first;
        let mut worst = first;
        for day in &days[1..] {
            if day.net_profit > best.net_profit {
                best = day;
            }
            if day.net_profit < worst.net_profit {
                worst = day;
            }
        }

        let total_revenue: Money = days.iter().map(|d| d.revenue).sum();
        let total_expenses: Money = days.iter().map(|d| d.total_expenses).sum();
        let net_profit = total_revenue - total_expenses;
        let profit_margin = if total_revenue.is_positive() {
            net_profit.as_rupees() / total_revenue.as_rupees() * 100.0
        } else {
            0.0
        };

        Some(Self {
            days: days.len(),
            total_revenue,
            total_expenses,
            net_profit,
            average_daily_profit: net_profit.average_over(days.len()),
            profit_margin,
            best_day: best.date,
            best_day_profit: best.net_profit,
            worst_day: worst.date,
            worst_day_profit: worst.net_profit,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBreakdown {
    pub range: DateRange,
    pub days: Vec<DailyProfit>,
    pub summary: Option<ProfitSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyBreakdown {
    pub range: DateRange,
    pub weeks: Vec<PeriodProfit>,
    pub summary: Option<ProfitSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Every per-day figure for one snapshot, bucketed once.
struct Ledger {
    revenue: RevenueTotals,
    expenses: ExpenseTotals,
    collections: CollectionTotals,
    orders: BTreeMap<DayKey, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl Ledger {
    fn build(aggregator: &RevenueAggregator, snapshot: &Snapshot) -> Self {
        let mut revenue = aggregator.select_paid_revenue(&snapshot.orders, &snapshot.bills);
        let mut expenses =
            aggregator.sum_expenses(&snapshot.daily_expenses, &snapshot.worker_expenses);
        let mut collections = aggregator.collect_payments(&snapshot.orders);

        let mut log = DiagnosticLog::default();
        let mut orders = BTreeMap::new();
        for (position, order) in snapshot.orders.iter().enumerate() {
            let record = RecordRef::of(RecordKind::Order, position, order);
            let key = aggregator.bucket(record, &order.day_candidates(), &mut log);
            *orders.entry(key).or_insert(0) += 1;
        }

        let diagnostics = snapshot
            .intake
            .iter()
            .cloned()
            .chain(std::mem::take(&mut revenue.diagnostics))
            .chain(std::mem::take(&mut expenses.diagnostics))
            .chain(std::mem::take(&mut collections.diagnostics))
            .chain(log.into_vec())
            .collect();

        Self {
            revenue,
            expenses,
            collections,
            orders,
            diagnostics,
        }
    }

    fn day(&self, date: NaiveDate) -> DailyProfit {
        let key = DayKey::Day(date);
        let revenue = self.revenue.by_date.get(key);
        let shop_expenses = self.expenses.shop_by_date.get(key);
        let worker_expenses = self.expenses.worker_by_date.get(key);
        let total_expenses = shop_expenses + worker_expenses;
        DailyProfit {
            date,
            revenue,
            shop_expenses,
            worker_expenses,
            total_expenses,
            net_profit: revenue - total_expenses,
            advance_collected: self.collections.advance_by_date.get(key),
            remaining_collected: self.collections.remaining_by_date.get(key),
            order_count: self.orders.get(&key).copied().unwrap_or(0),
        }
    }

    fn days(&self, range: DateRange) -> Vec<DailyProfit> {
        range.days().map(|date| self.day(date)).collect()
    }
}

impl RevenueAggregator {
    /// One zero-filled row per day of `range`.
    pub fn daily_breakdown(&self, snapshot: &Snapshot, range: DateRange) -> DailyBreakdown {
        let ledger = Ledger::build(self, snapshot);
        let days = ledger.days(range);
        let summary = ProfitSummary::from_days(&days);
        tracing::info!(%range, days = days.len(), "daily breakdown computed");
        DailyBreakdown {
            range,
            days,
            summary,
            diagnostics: ledger.diagnostics,
        }
    }

    /// Sunday-to-Saturday weeks of `range`, the first and last clipped to it,
    /// labelled `Week 1`, `Week 2`, ...
    pub fn weekly_breakdown(&self, snapshot: &Snapshot, range: DateRange) -> WeeklyBreakdown {
        let ledger = Ledger::build(self, snapshot);
        let weeks: Vec<PeriodProfit> = range
            .weeks_within()
            .into_iter()
            .enumerate()
            .map(|(i, week)| PeriodProfit::from_days(format!("Week {}", i + 1), week, ledger.days(week)))
            .collect();
        let all_days: Vec<DailyProfit> = weeks.iter().flat_map(|w| w.days.iter().cloned()).collect();
        let summary = ProfitSummary::from_days(&all_days);
        tracing::info!(%range, weeks = weeks.len(), "weekly breakdown computed");
        WeeklyBreakdown {
            range,
            weeks,
            summary,
            diagnostics: ledger.diagnostics,
        }
    }
}
