use async_trait::async_trait;

use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;

pub struct CreateProductParams {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: String,
    pub rating: Option<f64>,
    pub count: Option<i32>,
}

#[async_trait]
pub trait CreateProductUseCase: Send + Sync {
    async fn execute(&self, params: CreateProductParams) -> Result<Product, ProductError>;
}
