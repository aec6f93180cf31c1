use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::order::{Order, OrderItem, OrderStatus};
use crate::domain::models::product::Product;
use crate::error::AppError;
use crate::server::AppState;

/// 订单里的一行请求: 商品与数量
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i64,
}

pub struct OrderService {
    state: Arc<AppState>,
}

impl OrderService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&self.state.db)
            .await?;

        Ok(orders)
    }

    pub async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.state.db)
        .await?;

        Ok(orders)
    }

    pub async fn list_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE status = ? ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(&self.state.db)
        .await?;

        Ok(orders)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found", id)))
    }

    pub async fn get_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        let items = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ?")
            .bind(order_id)
            .fetch_all(&self.state.db)
            .await?;

        Ok(items)
    }

    /// 创建订单: 整个多行循环在一个事务内执行.
    ///
    /// 每行校验可用性与库存后立刻扣减, 同一请求内重复商品行
    /// 会看到已扣减后的库存并累积消耗; 任何一行失败则事务回滚,
    /// 之前的临时扣减全部还原, 不会落下半个订单.
    pub async fn create_order(
        &self,
        user_id: Uuid,
        lines: &[OrderLine],
        shipping_address: &str,
        notes: Option<String>,
    ) -> Result<(Order, Vec<OrderItem>), AppError> {
        if lines.is_empty() {
            return Err(AppError::Validation(
                "Order must contain at least one item".to_string(),
            ));
        }

        let mut tx = self.state.db.begin().await?;

        let user_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;

        if user_exists == 0 {
            return Err(AppError::NotFound(format!(
                "User with ID {} not found",
                user_id
            )));
        }

        let mut order = Order::new(user_id, shipping_address, notes);
        let mut items = Vec::with_capacity(lines.len());
        let mut total = 0.0;

        for line in lines {
            if line.quantity < 1 {
                return Err(AppError::Validation(
                    "Item quantity must be at least 1".to_string(),
                ));
            }

            let product =
                sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
                    .bind(line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "Product with ID {} not found",
                            line.product_id
                        ))
                    })?;

            if !product.is_available() {
                return Err(AppError::InvalidState(format!(
                    "Product not available: {}",
                    product.name
                )));
            }

            if product.stock < line.quantity {
                return Err(AppError::InsufficientStock(format!(
                    "Insufficient stock for product: {}",
                    product.name
                )));
            }

            // 立刻扣减, 后续行在同一事务内读到已扣减的库存
            sqlx::query("UPDATE products SET stock = stock - ?, updated_at = ? WHERE id = ?")
                .bind(line.quantity)
                .bind(chrono::Utc::now())
                .bind(product.id)
                .execute(&mut *tx)
                .await?;

            let item = OrderItem::new(order.id, product.id, line.quantity, product.price);
            total += item.subtotal;
            items.push(item);
        }

        order.total = total;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, status, total, shipping_address, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.status)
        .bind(order.total)
        .bind(&order.shipping_address)
        .bind(&order.notes)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for item in &items {
            sqlx::query(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price, subtotal)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id)
            .bind(item.order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.price)
            .bind(item.subtotal)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(order_id = %order.id, user_id = %user_id, total, "order created");
        Ok((order, items))
    }

    /// 无条件覆盖状态, 不做状态机校验
    pub async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError> {
        let mut order = self.get_order(order_id).await?;

        sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(order_id)
            .execute(&self.state.db)
            .await?;

        order.status = status;
        Ok(order)
    }

    /// 取消订单: 回补每个条目的库存并置为 CANCELLED, 同一事务
    pub async fn cancel_order(&self, order_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.state.db.begin().await?;

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found", order_id)))?;

        // 终态订单的库存已结清, 再取消会重复回补
        if order.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Order in status {} cannot be cancelled",
                order.status
            )));
        }

        self.restore_stock(&mut tx, order_id).await?;

        sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(OrderStatus::Cancelled)
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(())
    }

    /// 删除订单: 非终态先回补库存; 已取消或已送达直接删除
    pub async fn delete_order(&self, order_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.state.db.begin().await?;

        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found", order_id)))?;

        if !order.status.is_terminal() {
            self.restore_stock(&mut tx, order_id).await?;
        }

        sqlx::query("DELETE FROM order_items WHERE order_id = ?")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, "order deleted");
        Ok(())
    }

    async fn restore_stock(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        order_id: Uuid,
    ) -> Result<(), AppError> {
        let items = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ?")
            .bind(order_id)
            .fetch_all(&mut **tx)
            .await?;

        for item in items {
            sqlx::query("UPDATE products SET stock = stock + ?, updated_at = ? WHERE id = ?")
                .bind(item.quantity)
                .bind(chrono::Utc::now())
                .bind(item.product_id)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}
