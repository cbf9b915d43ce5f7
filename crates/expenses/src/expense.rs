use serde::Deserialize;

use tailorshop_core::{AmountField, Entity, ExpenseId, Money, TimestampField, WorkerId};

/// One day's shop running costs (`Daily_Expenses` row).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DailyExpense {
    pub id: Option<ExpenseId>,
    pub material_cost: AmountField,
    #[serde(rename = "miscellaneous_Cost", alias = "miscellaneous_cost")]
    pub miscellaneous_cost: AmountField,
    /// Tea and snacks for the workshop.
    pub chai_pani_cost: AmountField,
    #[serde(rename = "Date", alias = "date")]
    pub date: TimestampField,
}

impl DailyExpense {
    pub fn cost_components(&self) -> [(&'static str, &AmountField); 3] {
        [
            ("material_cost", &self.material_cost),
            ("miscellaneous_Cost", &self.miscellaneous_cost),
            ("chai_pani_cost", &self.chai_pani_cost),
        ]
    }

    /// Sum of all cost components; missing or non-numeric ones count as zero.
    pub fn total_cost(&self) -> Money {
        self.cost_components()
            .iter()
            .map(|(_, amount)| amount.or_zero())
            .sum()
    }
}

impl Entity for DailyExpense {
    type Id = ExpenseId;

    fn id(&self) -> Option<ExpenseId> {
        self.id
    }
}

/// A payment made to a worker (`Worker_Expense` row).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerExpense {
    pub id: Option<ExpenseId>,
    pub worker_id: Option<WorkerId>,
    #[serde(rename = "Amt_Paid", alias = "amt_paid")]
    pub amt_paid: AmountField,
    #[serde(alias = "Date")]
    pub date: TimestampField,
}

impl WorkerExpense {
    pub fn paid(&self) -> Money {
        self.amt_paid.or_zero()
    }
}

impl Entity for WorkerExpense {
    type Id = ExpenseId;

    fn id(&self) -> Option<ExpenseId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn daily_expense_sums_its_components() {
        let expense: DailyExpense = serde_json::from_value(json!({
            "id": 3,
            "material_cost": 100,
            "miscellaneous_Cost": "50",
            "chai_pani_cost": 25,
            "Date": "2025-09-09"
        }))
        .unwrap();

        assert_eq!(expense.total_cost(), Money::from_rupees(175));
        assert!(expense.date.instant().is_some());
    }

    #[test]
    fn bad_components_count_as_zero() {
        let expense: DailyExpense = serde_json::from_value(json!({
            "material_cost": "lots",
            "chai_pani_cost": 30,
            "date": "2025-09-09"
        }))
        .unwrap();

        assert!(expense.material_cost.is_invalid());
        assert_eq!(expense.miscellaneous_cost, AmountField::Missing);
        assert_eq!(expense.total_cost(), Money::from_rupees(30));
    }

    #[test]
    fn worker_expense_reads_amount_paid() {
        let expense: WorkerExpense = serde_json::from_value(json!({
            "id": 9,
            "worker_id": 4,
            "name": "Ravi",
            "Amt_Paid": 200,
            "date": "2025-09-09"
        }))
        .unwrap();

        assert_eq!(expense.worker_id, Some(WorkerId::new(4)));
        assert_eq!(expense.paid(), Money::from_rupees(200));
    }
}
