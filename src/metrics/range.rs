//! Range query resolution
//!
//! Turns a store id and an optional time window into the filter handed to
//! a [`RecordSource`](crate::source::RecordSource).

use crate::models::{Order, TimeRange};

/// Selection of orders for one store, optionally bounded in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    pub store_id: String,

    /// Inclusive bounds on `created_at`; `None` selects every order of the store
    pub created_between: Option<TimeRange>,
}

impl OrderFilter {
    /// Whether an order of `self.store_id` passes the time restriction
    pub fn matches(&self, order: &Order) -> bool {
        self.created_between
            .map_or(true, |range| range.contains(order.created_at))
    }
}

/// Build the order filter for a store and optional window
pub fn resolve(store_id: &str, range: Option<TimeRange>) -> OrderFilter {
    OrderFilter {
        store_id: store_id.to_string(),
        created_between: range,
    }
}
