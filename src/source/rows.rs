//! Row shapes shared by the SQL sources

use sqlx::FromRow;

use crate::models::{Order, OrderItem, OrderStatus};

/// One row of `orders LEFT JOIN order_items`; item columns are NULL for
/// orders without lines
#[derive(Debug, FromRow)]
pub(crate) struct OrderLineRow {
    pub id: String,
    pub created_at: i64,
    pub is_paid: bool,
    pub order_status: String,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Fold joined rows (sorted so that one order's rows are adjacent) into orders
pub(crate) fn fold_order_lines(rows: Vec<OrderLineRow>) -> Vec<Order> {
    let mut orders: Vec<Order> = Vec::new();

    for row in rows {
        let item = row.price.map(|price| OrderItem {
            price,
            quantity: row.quantity.map(|q| u32::try_from(q.max(0)).unwrap_or(u32::MAX)),
        });

        match orders.last_mut() {
            Some(last) if last.id == row.id => last.items.extend(item),
            _ => orders.push(Order {
                id: row.id,
                created_at: row.created_at,
                is_paid: row.is_paid,
                order_status: OrderStatus::from(row.order_status),
                items: item.into_iter().collect(),
            }),
        }
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, price: Option<f64>, quantity: Option<i64>) -> OrderLineRow {
        OrderLineRow {
            id: id.to_string(),
            created_at: 1,
            is_paid: false,
            order_status: "Processing".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_fold_groups_adjacent_rows() {
        let orders = fold_order_lines(vec![
            row("a", Some(1.0), Some(2)),
            row("a", Some(3.0), None),
            row("b", None, None),
            row("c", Some(4.0), Some(1)),
        ]);

        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].items.len(), 2);
        assert_eq!(orders[0].items[1].quantity, None);
        assert!(orders[1].items.is_empty());
        assert_eq!(orders[2].subtotal(), 4.0);
    }
}
