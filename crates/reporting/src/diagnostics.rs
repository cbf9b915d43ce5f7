//! Typed record-level diagnostics.
//!
//! A report that comes out as zero can be told apart from one that came out
//! as zero because rows were skipped or could not be read.

use serde::Serialize;
use tracing::Level;

use tailorshop_core::{BillId, Entity};

/// Which snapshot collection a record came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Order,
    Bill,
    DailyExpense,
    WorkerExpense,
}

impl RecordKind {
    pub fn collection(&self) -> &'static str {
        match self {
            RecordKind::Order => "orders",
            RecordKind::Bill => "bills",
            RecordKind::DailyExpense => "daily_expenses",
            RecordKind::WorkerExpense => "worker_expenses",
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            RecordKind::Order => "order",
            RecordKind::Bill => "bill",
            RecordKind::DailyExpense => "daily expense",
            RecordKind::WorkerExpense => "worker expense",
        }
    }
}

/// Points at one record of a snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordRef {
    pub kind: RecordKind,
    /// Index within its collection as supplied.
    pub position: usize,
    pub id: Option<i64>,
}

impl RecordRef {
    pub fn new(kind: RecordKind, position: usize, id: Option<i64>) -> Self {
        Self { kind, position, id }
    }

    pub fn of<E: Entity>(kind: RecordKind, position: usize, record: &E) -> Self {
        Self::new(kind, position, record.id().map(Into::into))
    }
}

impl core::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{} #{id} (position {})", self.kind.noun(), self.position),
            None => write!(f, "{} at position {}", self.kind.noun(), self.position),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Element skipped on intake: not an object, or a field of the wrong type.
    MalformedRecord { record: RecordRef, reason: String },
    /// A timestamp field was present but unparseable and was skipped.
    UnparseableTimestamp {
        record: RecordRef,
        field: &'static str,
    },
    /// A monetary field was present but not numeric; counted as zero.
    UnparseableAmount {
        record: RecordRef,
        field: &'static str,
    },
    /// A paid order references a bill missing from the snapshot.
    DanglingReference { record: RecordRef, bill_id: BillId },
    /// A further bill row carries an id already seen; its total is summed too.
    DuplicateBill { record: RecordRef, bill_id: BillId },
    /// No timestamp in the record's fallback chain was usable.
    Unbucketed { record: RecordRef },
}

impl Diagnostic {
    pub fn record(&self) -> &RecordRef {
        match self {
            Diagnostic::MalformedRecord { record, .. }
            | Diagnostic::UnparseableTimestamp { record, .. }
            | Diagnostic::UnparseableAmount { record, .. }
            | Diagnostic::DanglingReference { record, .. }
            | Diagnostic::DuplicateBill { record, .. }
            | Diagnostic::Unbucketed { record } => record,
        }
    }

    /// Only dangling references drop revenue outright; everything else is
    /// absorbed per record.
    pub(crate) fn level(&self) -> Level {
        match self {
            Diagnostic::DanglingReference { .. } => Level::WARN,
            _ => Level::DEBUG,
        }
    }

    fn emit(&self) {
        if self.level() == Level::WARN {
            tracing::warn!(diagnostic = %self, "paid order excluded from revenue");
        } else {
            tracing::debug!(diagnostic = %self, "record absorbed with defaults");
        }
    }
}

impl core::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Diagnostic::MalformedRecord { record, reason } => {
                write!(f, "{record}: malformed record skipped ({reason})")
            }
            Diagnostic::UnparseableTimestamp { record, field } => {
                write!(f, "{record}: `{field}` is not a timestamp")
            }
            Diagnostic::UnparseableAmount { record, field } => {
                write!(f, "{record}: `{field}` is not numeric, counted as zero")
            }
            Diagnostic::DanglingReference { record, bill_id } => {
                write!(f, "{record}: bill #{bill_id} not found")
            }
            Diagnostic::DuplicateBill { record, bill_id } => {
                write!(f, "{record}: bill #{bill_id} appears more than once, summed")
            }
            Diagnostic::Unbucketed { record } => {
                write!(f, "{record}: no usable date, left unbucketed")
            }
        }
    }
}

/// Collects diagnostics, logging each as it is raised.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog(Vec<Diagnostic>);

impl DiagnosticLog {
    pub(crate) fn record(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.0.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}
