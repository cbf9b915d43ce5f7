//! Revenue aggregation for the shop's profit screens.
//!
//! Pure, synchronous computation over an immutable [`Snapshot`] of orders,
//! bills and expenses: paid-bill revenue, expenses, net profit, per-day and
//! per-week breakdowns and cash collections, all bucketed into calendar days
//! under a fixed UTC offset. No IO and no shared mutable state, so a single
//! [`RevenueAggregator`] can serve concurrent callers.
//!
//! Per-record problems (bad amounts, bad dates, dangling bill references) never
//! abort a report; they become zero contributions plus a [`Diagnostic`]. Only a
//! malformed input shape is an error ([`ReportError::InvalidInput`]).

pub mod aggregator;
pub mod breakdown;
pub mod buckets;
pub mod collections;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expenses;
pub mod profit;
pub mod revenue;
pub mod scope;
pub mod snapshot;

pub use aggregator::RevenueAggregator;
pub use breakdown::{DailyBreakdown, DailyProfit, PeriodProfit, ProfitSummary, WeeklyBreakdown};
pub use buckets::Buckets;
pub use collections::{CollectionTotals, CollectionsReport};
pub use config::ReportConfig;
pub use diagnostics::{Diagnostic, RecordKind, RecordRef};
pub use error::{ReportError, ReportResult};
pub use expenses::ExpenseTotals;
pub use profit::{ProfitReport, compute_profit_json};
pub use revenue::RevenueTotals;
pub use scope::{DateFilter, Scope};
pub use snapshot::Snapshot;
