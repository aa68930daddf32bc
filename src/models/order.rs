use serde::{Deserialize, Serialize};
use std::fmt;

/// Fulfillment state of an order.
///
/// Records written by other services may carry a status this crate does not
/// know about; those are kept verbatim in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Processing,
    Delivering,
    Delivered,
    Canceled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Delivering => "Delivering",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Processing" => OrderStatus::Processing,
            "Delivering" => OrderStatus::Delivering,
            "Delivered" => OrderStatus::Delivered,
            "Canceled" => OrderStatus::Canceled,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        OrderStatus::from(value.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unit price
    pub price: f64,

    /// Number of units. `None` is priced as one unit.
    #[serde(default)]
    pub quantity: Option<u32>,
}

impl OrderItem {
    pub fn new(price: f64, quantity: Option<u32>) -> Self {
        Self { price, quantity }
    }

    /// Revenue contributed by this line.
    ///
    /// A missing quantity counts as a single unit, never as zero.
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity.unwrap_or(1))
    }
}

/// One customer transaction as read from the record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,

    /// Creation time (Unix timestamp, seconds)
    pub created_at: i64,

    pub is_paid: bool,

    pub order_status: OrderStatus,

    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Sum of all line totals
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// Inclusive `[start, end]` window over `created_at` (Unix seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: i64,
    pub end: i64,
}

impl TimeRange {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Named revenue accumulator in a bucketized report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueBucket {
    pub name: String,
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_quantity_counts_as_one_unit() {
        assert_eq!(OrderItem::new(50.0, None).line_total(), 50.0);
        assert_eq!(OrderItem::new(100.0, Some(2)).line_total(), 200.0);
        assert_eq!(OrderItem::new(100.0, Some(0)).line_total(), 0.0);
    }

    #[test]
    fn test_unknown_status_round_trips_verbatim() {
        let status = OrderStatus::from("Refunded");
        assert_eq!(status, OrderStatus::Other("Refunded".to_string()));
        assert_eq!(String::from(status), "Refunded");
        assert_eq!(OrderStatus::from("Delivered"), OrderStatus::Delivered);
    }

    #[test]
    fn test_order_deserializes_without_quantity() {
        let order: Order = serde_json::from_str(
            r#"{"id":"o1","created_at":10,"is_paid":false,"order_status":"Canceled","items":[{"price":50.0}]}"#,
        )
        .unwrap();
        assert_eq!(order.order_status, OrderStatus::Canceled);
        assert_eq!(order.items[0].quantity, None);
        assert_eq!(order.subtotal(), 50.0);
    }

    #[test]
    fn test_time_range_is_inclusive() {
        let range = TimeRange::new(100, 200);
        assert!(range.contains(100));
        assert!(range.contains(200));
        assert!(!range.contains(99));
        assert!(!range.contains(201));
    }
}
