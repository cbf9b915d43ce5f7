use serde::Deserialize;

use tailorshop_core::{AmountField, BillId, Entity, Money, TimestampCandidate, TimestampField};

/// A customer bill aggregating one or more garment orders into a single total.
///
/// Only the columns reporting needs are read; the rest of the row (customer,
/// garment quantities, measurements) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Bill {
    pub id: Option<BillId>,
    pub total_amt: AmountField,
    /// Advance taken when the bill was written.
    pub payment_amount: AmountField,
    pub date_issue: TimestampField,
    pub due_date: TimestampField,
    pub today_date: TimestampField,
}

impl Bill {
    /// Total amount as billed. Zero or negative totals are kept as-is.
    pub fn total(&self) -> Money {
        self.total_amt.or_zero()
    }

    /// Fallback chain for the day a bill's revenue is attributed to:
    /// issue date, then due date, then the "today" date.
    pub fn date_candidates(&self) -> [TimestampCandidate<'_>; 3] {
        [
            TimestampCandidate::new("date_issue", &self.date_issue),
            TimestampCandidate::new("due_date", &self.due_date),
            TimestampCandidate::new("today_date", &self.today_date),
        ]
    }
}

impl Entity for Bill {
    type Id = BillId;

    fn id(&self) -> Option<BillId> {
        self.id
    }
}
