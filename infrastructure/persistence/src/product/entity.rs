use bigdecimal::BigDecimal;
use num_traits::{FromPrimitive, ToPrimitive};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use business::domain::product::model::Product;

#[derive(Debug, FromRow)]
pub struct ProductEntity {
    pub id: i32,
    pub title: String,
    pub price: BigDecimal,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: String,
    pub rating: Option<BigDecimal>,
    pub count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductEntity {
    pub fn into_domain(self) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price.to_f64().unwrap_or_default(),
            description: self.description,
            image: self.image,
            category: self.category,
            rating: self.rating.and_then(|r| r.to_f64()),
            count: self.count,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Converts a domain amount to a `NUMERIC` value rounded to `scale` digits.
pub fn to_decimal(value: f64, scale: i64) -> Option<BigDecimal> {
    BigDecimal::from_f64(value).map(|d| d.round(scale))
}
