use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::product::Product;
use crate::error::AppError;
use crate::server::AppState;

pub struct ProductService {
    state: Arc<AppState>,
}

impl ProductService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let products =
            sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
                .fetch_all(&self.state.db)
                .await?;

        Ok(products)
    }

    pub async fn list_active_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE active = TRUE ORDER BY created_at DESC",
        )
        .fetch_all(&self.state.db)
        .await?;

        Ok(products)
    }

    /// available = active && stock > 0
    pub async fn list_available_products(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE active = TRUE AND stock > 0 ORDER BY created_at DESC",
        )
        .fetch_all(&self.state.db)
        .await?;

        Ok(products)
    }

    pub async fn list_products_by_category(&self, category: &str) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE category = ? AND active = TRUE ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(&self.state.db)
        .await?;

        Ok(products)
    }

    pub async fn search_products(&self, name: &str) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE name LIKE '%' || ? || '%' COLLATE NOCASE",
        )
        .bind(name)
        .fetch_all(&self.state.db)
        .await?;

        Ok(products)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product with ID {} not found", id)))
    }

    pub async fn create_product(&self, product: Product) -> Result<Product, AppError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, category, image_url, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.state.db)
        .await?;

        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_product(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        price: Option<f64>,
        stock: Option<i64>,
        category: Option<String>,
        image_url: Option<String>,
        active: Option<bool>,
    ) -> Result<Product, AppError> {
        let mut product = self.get_product(id).await?;

        if let Some(name) = name {
            product.name = name;
        }
        if let Some(description) = description {
            product.description = description;
        }
        if let Some(price) = price {
            product.price = price;
        }
        if let Some(stock) = stock {
            product.stock = stock;
        }
        if let Some(category) = category {
            product.category = category;
        }
        if let Some(image_url) = image_url {
            product.image_url = image_url;
        }
        if let Some(active) = active {
            product.active = active;
        }

        product.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock = ?, category = ?, image_url = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .bind(&product.category)
        .bind(&product.image_url)
        .bind(product.active)
        .bind(product.updated_at)
        .bind(product.id)
        .execute(&self.state.db)
        .await?;

        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.state.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product with ID {} not found",
                id
            )));
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn deactivate_product(&self, id: Uuid) -> Result<(), AppError> {
        let result =
            sqlx::query("UPDATE products SET active = FALSE, updated_at = ? WHERE id = ?")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.state.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product with ID {} not found",
                id
            )));
        }

        Ok(())
    }

    pub async fn set_stock(&self, id: Uuid, stock: i64) -> Result<(), AppError> {
        if stock < 0 {
            return Err(AppError::Validation("Stock cannot be negative".to_string()));
        }

        let result = sqlx::query("UPDATE products SET stock = ?, updated_at = ? WHERE id = ?")
            .bind(stock)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.state.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Product with ID {} not found",
                id
            )));
        }

        Ok(())
    }
}
