use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    pub image_url: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: &str,
        description: &str,
        price: f64,
        stock: i64,
        category: &str,
        image_url: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            stock,
            category: category.to_string(),
            image_url: image_url.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.active && self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_requires_active_and_stock() {
        let mut product = Product::new("Keyboard", "", 49.9, 3, "peripherals", "");
        assert!(product.is_available());

        product.stock = 0;
        assert!(!product.is_available());

        product.stock = 3;
        product.active = false;
        assert!(!product.is_available());
    }
}
