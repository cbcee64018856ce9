use async_trait::async_trait;

use crate::domain::errors::RepositoryError;

use super::model::{NewProduct, Product};
use super::patch::ProductPatch;

/// Storage port for products. Each method maps to a single storage call.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError>;
    /// All products, newest first.
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;
    /// Products whose category equals `category` exactly, newest first.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;
    async fn find_one(&self, id: i32) -> Result<Product, RepositoryError>;
    async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, RepositoryError>;
    async fn remove(&self, id: i32) -> Result<(), RepositoryError>;
    /// Distinct non-empty categories in ascending order.
    async fn get_categories(&self) -> Result<Vec<String>, RepositoryError>;
}
