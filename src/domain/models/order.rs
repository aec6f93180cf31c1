use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    sqlx::Type,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// 终态订单的库存已结清 (取消时已回补, 送达则库存被永久消耗)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Delivered)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total: f64,
    pub shipping_address: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(user_id: Uuid, shipping_address: &str, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: OrderStatus::Pending,
            total: 0.0,
            shipping_address: shipping_address.to_string(),
            notes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    /// 下单时的单价快照, 商品改价不影响历史订单
    pub price: f64,
    pub subtotal: f64,
}

impl OrderItem {
    pub fn new(order_id: Uuid, product_id: Uuid, quantity: i64, price: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id,
            quantity,
            price,
            subtotal: price * quantity as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_subtotal_is_snapshot_price_times_quantity() {
        let item = OrderItem::new(Uuid::new_v4(), Uuid::new_v4(), 3, 10.5);
        assert_eq!(item.subtotal, 31.5);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Shipped.is_terminal());
    }

    #[test]
    fn status_parses_from_uppercase() {
        assert_eq!(
            "PENDING".parse::<OrderStatus>().unwrap(),
            OrderStatus::Pending
        );
        assert!("NOT_A_STATUS".parse::<OrderStatus>().is_err());
    }
}
