pub mod order;
pub mod product;

pub use order::{Order, OrderItem, OrderStatus, RevenueBucket, TimeRange};
pub use product::{Product, ProductCountKind};
