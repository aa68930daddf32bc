//! Revenue aggregation and status bucketing
//!
//! Pure in-memory computation over already-fetched orders. Totals are `f64`
//! sums, so long series of fractional prices may pick up floating-point
//! representation error in the last digits.

use chrono::{DateTime, Datelike};
use std::collections::HashMap;

use crate::models::{Order, OrderStatus, RevenueBucket};

const PAYMENT_BUCKETS: [&str; 2] = ["Paid", "Not Paid"];

const FULFILLMENT_BUCKETS: [&str; 4] = ["Processing", "Delivering", "Delivered", "Canceled"];

const MONTH_BUCKETS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Dimension along which revenue is partitioned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketDimension {
    /// `Paid` / `Not Paid`
    Payment,
    /// One bucket per known [`OrderStatus`]
    Fulfillment,
    /// Calendar month (UTC) of `created_at`
    Month,
}

impl BucketDimension {
    /// The fixed, ordered bucket names of this dimension
    pub fn bucket_names(&self) -> &'static [&'static str] {
        match self {
            BucketDimension::Payment => &PAYMENT_BUCKETS,
            BucketDimension::Fulfillment => &FULFILLMENT_BUCKETS,
            BucketDimension::Month => &MONTH_BUCKETS,
        }
    }

    /// Bucket an order falls into, `None` when it has no bucket here
    fn key_for(&self, order: &Order) -> Option<&'static str> {
        match self {
            BucketDimension::Payment => Some(if order.is_paid { "Paid" } else { "Not Paid" }),
            BucketDimension::Fulfillment => match order.order_status {
                OrderStatus::Processing => Some("Processing"),
                OrderStatus::Delivering => Some("Delivering"),
                OrderStatus::Delivered => Some("Delivered"),
                OrderStatus::Canceled => Some("Canceled"),
                OrderStatus::Other(_) => None,
            },
            BucketDimension::Month => DateTime::from_timestamp(order.created_at, 0)
                .map(|created| MONTH_BUCKETS[created.month0() as usize]),
        }
    }

    /// Every bucket of this dimension with a zero total
    pub fn zero_buckets(&self) -> Vec<RevenueBucket> {
        self.bucket_names()
            .iter()
            .map(|name| RevenueBucket {
                name: name.to_string(),
                total: 0.0,
            })
            .collect()
    }
}

/// Total revenue of a set of orders.
///
/// Every order counts regardless of payment or fulfillment state; excluding
/// any of them is up to the query filter.
pub fn total_revenue(orders: &[Order]) -> f64 {
    orders.iter().map(Order::subtotal).sum()
}

/// Partition revenue into the fixed bucket set of `dimension`.
///
/// The result always holds every bucket name in declared order, zero-filled.
/// Orders without a bucket in this dimension are left out of all totals.
pub fn bucketize(orders: &[Order], dimension: BucketDimension) -> Vec<RevenueBucket> {
    let mut totals: HashMap<&'static str, f64> = HashMap::new();

    for order in orders {
        if let Some(key) = dimension.key_for(order) {
            *totals.entry(key).or_insert(0.0) += order.subtotal();
        }
    }

    dimension
        .bucket_names()
        .iter()
        .map(|name| RevenueBucket {
            name: name.to_string(),
            total: totals.get(name).copied().unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderItem;

    fn order(id: &str, is_paid: bool, status: OrderStatus, items: Vec<OrderItem>) -> Order {
        Order {
            id: id.to_string(),
            created_at: 1_700_000_000,
            is_paid,
            order_status: status,
            items,
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order(
                "o1",
                true,
                OrderStatus::Delivered,
                vec![OrderItem::new(100.0, Some(2))],
            ),
            order(
                "o2",
                false,
                OrderStatus::Processing,
                vec![OrderItem::new(50.0, None)],
            ),
        ]
    }

    #[test]
    fn test_total_revenue_applies_implicit_quantity() {
        assert_eq!(total_revenue(&sample()), 250.0);
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_total_revenue_includes_unpaid_and_canceled() {
        let orders = vec![
            order("a", false, OrderStatus::Canceled, vec![OrderItem::new(10.0, Some(3))]),
            order("b", true, OrderStatus::Delivered, vec![OrderItem::new(5.0, None)]),
        ];
        assert_eq!(total_revenue(&orders), 35.0);
    }

    #[test]
    fn test_payment_buckets() {
        let buckets = bucketize(&sample(), BucketDimension::Payment);
        assert_eq!(
            buckets,
            vec![
                RevenueBucket { name: "Paid".to_string(), total: 200.0 },
                RevenueBucket { name: "Not Paid".to_string(), total: 50.0 },
            ]
        );
    }

    #[test]
    fn test_fulfillment_buckets_are_zero_filled_in_fixed_order() {
        let buckets = bucketize(&sample(), BucketDimension::Fulfillment);
        let names: Vec<&str> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Processing", "Delivering", "Delivered", "Canceled"]);
        assert_eq!(buckets[0].total, 50.0);
        assert_eq!(buckets[1].total, 0.0);
        assert_eq!(buckets[2].total, 200.0);
        assert_eq!(buckets[3].total, 0.0);
    }

    #[test]
    fn test_unknown_status_is_dropped_from_fulfillment_buckets() {
        let mut orders = sample();
        orders.push(order(
            "o3",
            true,
            OrderStatus::from("Refunded"),
            vec![OrderItem::new(1_000.0, Some(1))],
        ));

        let buckets = bucketize(&orders, BucketDimension::Fulfillment);
        assert_eq!(buckets.len(), 4);
        let sum: f64 = buckets.iter().map(|b| b.total).sum();
        assert_eq!(sum, 250.0);

        // Payment buckets are exhaustive, so the same order is counted there
        let paid: f64 = bucketize(&orders, BucketDimension::Payment)
            .iter()
            .map(|b| b.total)
            .sum();
        assert_eq!(paid, total_revenue(&orders));
    }

    #[test]
    fn test_bucketize_is_independent_of_input_order() {
        let mut orders = sample();
        let forward = bucketize(&orders, BucketDimension::Fulfillment);
        orders.reverse();
        assert_eq!(forward, bucketize(&orders, BucketDimension::Fulfillment));
    }

    #[test]
    fn test_empty_input_yields_full_zero_set() {
        assert_eq!(
            bucketize(&[], BucketDimension::Fulfillment),
            BucketDimension::Fulfillment.zero_buckets()
        );
        assert_eq!(bucketize(&[], BucketDimension::Month).len(), 12);
    }

    #[test]
    fn test_month_buckets_use_utc_calendar_month() {
        // 2024-01-31T23:59:59Z and 2024-02-01T00:00:00Z
        let mut jan = order("jan", true, OrderStatus::Delivered, vec![OrderItem::new(7.0, None)]);
        jan.created_at = 1_706_745_599;
        let mut feb = order("feb", true, OrderStatus::Delivered, vec![OrderItem::new(3.0, Some(2))]);
        feb.created_at = 1_706_745_600;

        let buckets = bucketize(&[jan, feb], BucketDimension::Month);
        assert_eq!(buckets[0].name, "Jan");
        assert_eq!(buckets[0].total, 7.0);
        assert_eq!(buckets[1].name, "Feb");
        assert_eq!(buckets[1].total, 6.0);
        assert!(buckets[2..].iter().all(|b| b.total == 0.0));
    }
}
