use proptest::prelude::*;

use serde_json::{Value, json};
use tailorshop_core::Money;
use tailorshop_reporting::{RevenueAggregator, Scope, Snapshot};

/// Timestamps spread over a few days around IST midnight, plus the odd
/// unparseable or missing one.
fn timestamp() -> impl Strategy<Value = Value> {
    prop_oneof![
        8 => (1u32..=4, 0u32..24, 0u32..60)
            .prop_map(|(d, h, m)| json!(format!("2025-09-{d:02}T{h:02}:{m:02}:00Z"))),
        1 => Just(json!("not a date")),
        1 => Just(Value::Null),
    ]
}

/// Ids drawn from a small range so rows sharing an id show up regularly.
fn bill() -> impl Strategy<Value = Value> {
    (0i64..12, 0i64..5_000, timestamp()).prop_map(|(id, amount, date)| {
        json!({"id": id, "total_amt": amount, "today_date": date})
    })
}

fn order() -> impl Strategy<Value = Value> {
    (0i64..12, prop::sample::select(vec!["paid", "Paid", "pending", "cancelled"]), timestamp())
        .prop_map(|(bill_id, status, date)| {
            json!({"bill_id": bill_id, "payment_status": status, "order_date": date})
        })
}

fn daily_expense() -> impl Strategy<Value = Value> {
    (0i64..500, 0i64..200, 0i64..100, timestamp()).prop_map(|(m, x, c, date)| {
        json!({"material_cost": m, "miscellaneous_Cost": x, "chai_pani_cost": c, "Date": date})
    })
}

fn worker_expense() -> impl Strategy<Value = Value> {
    (0i64..2_000, timestamp()).prop_map(|(amount, date)| json!({"Amt_Paid": amount, "date": date}))
}

prop_compose! {
    fn snapshot_json()(
        bills in prop::collection::vec(bill(), 0..10),
        orders in prop::collection::vec(order(), 0..20),
        daily in prop::collection::vec(daily_expense(), 0..8),
        worker in prop::collection::vec(worker_expense(), 0..8),
    ) -> (Vec<Value>, Vec<Value>, Vec<Value>, Vec<Value>) {
        (orders, bills, daily, worker)
    }
}

fn snapshot(orders: &[Value], bills: &[Value], daily: &[Value], worker: &[Value]) -> Snapshot {
    Snapshot::from_json(&json!({
        "orders": orders,
        "bills": bills,
        "daily_expenses": daily,
        "worker_expenses": worker
    }))
    .unwrap()
}

proptest! {
    /// Property: shuffling every collection leaves all totals and buckets
    /// unchanged.
    #[test]
    fn permutation_invariance(
        (orders, bills, daily, worker) in snapshot_json(),
        seed in any::<u64>(),
    ) {
        let aggregator = RevenueAggregator::default();
        let original = snapshot(&orders, &bills, &daily, &worker);

        let rotate = |items: &[Value]| {
            let mut items = items.to_vec();
            if !items.is_empty() {
                let k = (seed as usize) % items.len();
                items.rotate_left(k);
                items.reverse();
            }
            items
        };
        let shuffled = snapshot(&rotate(&orders), &rotate(&bills), &rotate(&daily), &rotate(&worker));

        let a = aggregator.select_paid_revenue(&original.orders, &original.bills);
        let b = aggregator.select_paid_revenue(&shuffled.orders, &shuffled.bills);
        prop_assert_eq!(a.total_revenue(), b.total_revenue());
        prop_assert_eq!(&a.by_date, &b.by_date);
        prop_assert_eq!(a.diagnostics.len(), b.diagnostics.len());

        let a = aggregator.sum_expenses(&original.daily_expenses, &original.worker_expenses);
        let b = aggregator.sum_expenses(&shuffled.daily_expenses, &shuffled.worker_expenses);
        prop_assert_eq!(a.total_expenses(), b.total_expenses());
        prop_assert_eq!(a.by_date(), b.by_date());
    }

    /// Property: net profit is exactly revenue minus expenses in every scope.
    #[test]
    fn net_profit_is_exact((orders, bills, daily, worker) in snapshot_json(), d in 1u32..=4) {
        let aggregator = RevenueAggregator::default();
        let snapshot = snapshot(&orders, &bills, &daily, &worker);
        let day = format!("2025-09-{d:02}").parse::<Scope>().unwrap();

        for scope in [Scope::AllTime, day] {
            let report = aggregator.compute_profit(&snapshot, scope);
            prop_assert_eq!(report.net_profit, report.revenue - report.expenses);
            prop_assert_eq!(report.expenses, report.shop_expenses + report.worker_expenses);
        }
    }

    /// Property: the all-time report equals the sum over every day bucket,
    /// unbucketed records included.
    #[test]
    fn all_time_is_the_sum_of_buckets((orders, bills, daily, worker) in snapshot_json()) {
        let aggregator = RevenueAggregator::default();
        let snapshot = snapshot(&orders, &bills, &daily, &worker);

        let revenue = aggregator.select_paid_revenue(&snapshot.orders, &snapshot.bills);
        let expenses = aggregator.sum_expenses(&snapshot.daily_expenses, &snapshot.worker_expenses);
        let report = aggregator.compute_profit(&snapshot, Scope::AllTime);

        let revenue_sum: Money = revenue.by_date.keys().map(|k| revenue.by_date.get(k)).sum();
        let expense_buckets = expenses.by_date();
        let expense_sum: Money = expense_buckets.keys().map(|k| expense_buckets.get(k)).sum();
        prop_assert_eq!(report.revenue, revenue_sum);
        prop_assert_eq!(report.expenses, expense_sum);

        // Day scopes plus the unbucketed remainder add back up to all time.
        let scoped: Money = revenue
            .by_date
            .keys()
            .filter_map(|k| k.date())
            .map(|d| aggregator.compute_profit(&snapshot, Scope::Day(d)).revenue)
            .sum();
        prop_assert_eq!(
            scoped + revenue.by_date.get(tailorshop_core::DayKey::Unbucketed),
            report.revenue
        );
    }

    /// Property: adding more paid orders for an already-paid bill never
    /// changes revenue.
    #[test]
    fn shared_bill_is_counted_once(amount in 0i64..100_000, extra in 1usize..5) {
        let aggregator = RevenueAggregator::default();
        let bills = vec![json!({"id": 7, "total_amt": amount, "date_issue": "2025-09-02"})];
        let one = vec![json!({"bill_id": 7, "payment_status": "paid"})];
        let many = vec![json!({"bill_id": 7, "payment_status": "paid"}); extra + 1];

        let single = aggregator.compute_profit(&snapshot(&one, &bills, &[], &[]), Scope::AllTime);
        let repeated = aggregator.compute_profit(&snapshot(&many, &bills, &[], &[]), Scope::AllTime);

        prop_assert_eq!(single.revenue, Money::from_rupees(amount));
        prop_assert_eq!(repeated.revenue, single.revenue);
    }
}
