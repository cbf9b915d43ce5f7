//! Snapshot intake from the data-access layer's JSON.

use std::io::Read;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use tailorshop_billing::Bill;
use tailorshop_expenses::{DailyExpense, WorkerExpense};
use tailorshop_sales::Order;

use crate::diagnostics::{Diagnostic, DiagnosticLog, RecordKind, RecordRef};
use crate::error::{ReportError, ReportResult};

static ABSENT: JsonValue = JsonValue::Null;

/// Immutable input to one aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub bills: Vec<Bill>,
    pub daily_expenses: Vec<DailyExpense>,
    pub worker_expenses: Vec<WorkerExpense>,
    /// Records skipped while reading the snapshot.
    pub intake: Vec<Diagnostic>,
}

impl Snapshot {
    pub fn new(
        orders: Vec<Order>,
        bills: Vec<Bill>,
        daily_expenses: Vec<DailyExpense>,
        worker_expenses: Vec<WorkerExpense>,
    ) -> Self {
        Self {
            orders,
            bills,
            daily_expenses,
            worker_expenses,
            intake: Vec::new(),
        }
    }

    /// Reads `{"orders": [...], "bills": [...], "daily_expenses": [...],
    /// "worker_expenses": [...]}`. Absent or null collections are empty.
    pub fn from_json(document: &JsonValue) -> ReportResult<Self> {
        let JsonValue::Object(map) = document else {
            return Err(ReportError::invalid_input(
                "snapshot",
                "an object",
                json_type(document),
            ));
        };
        let field = |kind: RecordKind| map.get(kind.collection()).unwrap_or(&ABSENT);
        Self::from_collections(
            field(RecordKind::Order),
            field(RecordKind::Bill),
            field(RecordKind::DailyExpense),
            field(RecordKind::WorkerExpense),
        )
    }

    pub fn from_collections(
        orders: &JsonValue,
        bills: &JsonValue,
        daily_expenses: &JsonValue,
        worker_expenses: &JsonValue,
    ) -> ReportResult<Self> {
        let mut log = DiagnosticLog::default();
        let snapshot = Self {
            orders: read_collection(RecordKind::Order, orders, &mut log)?,
            bills: read_collection(RecordKind::Bill, bills, &mut log)?,
            daily_expenses: read_collection(RecordKind::DailyExpense, daily_expenses, &mut log)?,
            worker_expenses: read_collection(RecordKind::WorkerExpense, worker_expenses, &mut log)?,
            intake: Vec::new(),
        };

        let intake = log.into_vec();
        tracing::debug!(
            orders = snapshot.orders.len(),
            bills = snapshot.bills.len(),
            daily_expenses = snapshot.daily_expenses.len(),
            worker_expenses = snapshot.worker_expenses.len(),
            skipped = intake.len(),
            "snapshot loaded"
        );
        Ok(Self { intake, ..snapshot })
    }

    pub fn from_reader<R: Read>(reader: R) -> ReportResult<Self> {
        let document: JsonValue = serde_json::from_reader(reader)?;
        Self::from_json(&document)
    }
}

fn read_collection<T: DeserializeOwned>(
    kind: RecordKind,
    value: &JsonValue,
    log: &mut DiagnosticLog,
) -> ReportResult<Vec<T>> {
    let items = match value {
        JsonValue::Null => return Ok(Vec::new()),
        JsonValue::Array(items) => items,
        other => {
            return Err(ReportError::invalid_input(
                kind.collection(),
                "an array",
                json_type(other),
            ));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let id = item.get("id").and_then(JsonValue::as_i64);
        let record = RecordRef::new(kind, position, id);

        if !item.is_object() {
            log.record(Diagnostic::MalformedRecord {
                record,
                reason: format!("expected an object, found {}", json_type(item)),
            });
            continue;
        }

        match T::deserialize(item) {
            Ok(parsed) => records.push(parsed),
            Err(e) => log.record(Diagnostic::MalformedRecord {
                record,
                reason: e.to_string(),
            }),
        }
    }
    Ok(records)
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
