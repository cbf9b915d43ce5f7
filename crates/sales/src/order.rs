use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use tailorshop_core::{
    AmountField, BillId, Entity, Money, OrderId, TimestampCandidate, TimestampField,
};

/// Payment status of an order.
///
/// Stored as free text by the order screens; normalized by trimming and
/// lowercasing. Anything unrecognised is kept verbatim in `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
    Other(String),
}

impl PaymentStatus {
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "pending" => PaymentStatus::Pending,
            "paid" => PaymentStatus::Paid,
            "cancelled" | "canceled" => PaymentStatus::Cancelled,
            _ => PaymentStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentStatus::Paid)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Other(s) => s,
        }
    }
}

impl Serialize for PaymentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PaymentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match JsonValue::deserialize(deserializer)? {
            JsonValue::Null => PaymentStatus::Pending,
            JsonValue::String(s) => PaymentStatus::parse(&s),
            other => PaymentStatus::Other(other.to_string()),
        })
    }
}

/// A single garment/work item, linked to the bill it was written on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: Option<OrderId>,
    pub bill_id: Option<BillId>,
    pub payment_status: PaymentStatus,
    /// Order total.
    pub total_amt: AmountField,
    /// Advance paid when the order was taken.
    pub payment_amount: AmountField,
    pub order_date: TimestampField,
    /// Touched when the order is edited, including when it is marked paid.
    pub updated_at: TimestampField,
    pub created_at: TimestampField,
}

impl Order {
    pub fn is_paid(&self) -> bool {
        self.payment_status.is_paid()
    }

    /// Fallback chain for the day an order belongs to.
    pub fn day_candidates(&self) -> [TimestampCandidate<'_>; 3] {
        [
            TimestampCandidate::new("order_date", &self.order_date),
            TimestampCandidate::new("updated_at", &self.updated_at),
            TimestampCandidate::new("created_at", &self.created_at),
        ]
    }

    /// Fallback chain for the day the final payment was collected.
    pub fn settlement_candidates(&self) -> [TimestampCandidate<'_>; 3] {
        [
            TimestampCandidate::new("updated_at", &self.updated_at),
            TimestampCandidate::new("order_date", &self.order_date),
            TimestampCandidate::new("created_at", &self.created_at),
        ]
    }

    pub fn advance_paid(&self) -> Money {
        self.payment_amount.or_zero()
    }

    /// Amount collected when the order is settled: total less advance, never
    /// negative.
    pub fn balance_due(&self) -> Money {
        (self.total_amt.or_zero() - self.advance_paid()).non_negative()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> Option<OrderId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_status_normalizes_case_and_whitespace() {
        assert_eq!(PaymentStatus::parse(" PAID "), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::parse("Paid"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::parse("canceled"), PaymentStatus::Cancelled);
        assert_eq!(PaymentStatus::parse(""), PaymentStatus::Pending);
        assert_eq!(
            PaymentStatus::parse("partially paid"),
            PaymentStatus::Other("partially paid".to_string())
        );
        assert!(!PaymentStatus::parse("unpaid").is_paid());
    }

    #[test]
    fn deserializes_a_database_row() {
        let order: Order = serde_json::from_value(json!({
            "id": 5012,
            "bill_id": "10",
            "payment_status": "Paid",
            "total_amt": "1200",
            "payment_amount": 200,
            "order_date": "2025-09-09",
            "updated_at": "2025-09-10T12:00:00+00:00",
            "garment_type": "Shirt",
            "Work_pay": 150
        }))
        .unwrap();

        assert_eq!(order.id, Some(OrderId::new(5012)));
        assert_eq!(order.bill_id, Some(BillId::new(10)));
        assert!(order.is_paid());
        assert_eq!(order.balance_due(), Money::from_rupees(1000));
        assert_eq!(Entity::id(&order).map(i64::from), Some(5012));
    }

    #[test]
    fn missing_fields_default() {
        let order: Order = serde_json::from_value(json!({"bill_id": null})).unwrap();
        assert_eq!(order.bill_id, None);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total_amt, AmountField::Missing);
        assert_eq!(order.order_date, TimestampField::Missing);
    }

    #[test]
    fn balance_due_never_goes_negative() {
        let order: Order = serde_json::from_value(json!({
            "total_amt": 500,
            "payment_amount": 800
        }))
        .unwrap();
        assert_eq!(order.balance_due(), Money::ZERO);
    }

    #[test]
    fn non_string_status_is_kept_as_other() {
        let order: Order = serde_json::from_value(json!({"payment_status": 1})).unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Other("1".to_string()));
        assert_eq!(serde_json::to_value(&order.payment_status).unwrap(), json!("1"));
    }
}
