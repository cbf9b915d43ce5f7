use tailorshop_core::{AmountField, DayBucketer, DayKey, Money, TimestampCandidate};

use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordRef};

/// Turns snapshots into revenue, expense and profit figures.
///
/// Stateless apart from the calendar it buckets with: every operation reads
/// its inputs and returns a fresh value, so one aggregator can be shared
/// across threads freely.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RevenueAggregator {
    bucketer: DayBucketer,
}

impl RevenueAggregator {
    pub fn new(bucketer: DayBucketer) -> Self {
        Self { bucketer }
    }

    pub fn bucketer(&self) -> &DayBucketer {
        &self.bucketer
    }

    /// Walks `chain` and records what had to be skipped on the way.
    pub(crate) fn bucket(
        &self,
        record: RecordRef,
        chain: &[TimestampCandidate<'_>],
        log: &mut DiagnosticLog,
    ) -> DayKey {
        let resolved = self.bucketer.resolve(chain);
        for field in resolved.rejected {
            log.record(Diagnostic::UnparseableTimestamp { record, field });
        }
        if resolved.key.is_unbucketed() {
            log.record(Diagnostic::Unbucketed { record });
        }
        resolved.key
    }

    /// Missing amounts are zero without comment; non-numeric ones are zero
    /// and diagnosed.
    pub(crate) fn amount(
        &self,
        record: RecordRef,
        field: &'static str,
        value: &AmountField,
        log: &mut DiagnosticLog,
    ) -> Money {
        if value.is_invalid() {
            log.record(Diagnostic::UnparseableAmount { record, field });
        }
        value.or_zero()
    }
}
