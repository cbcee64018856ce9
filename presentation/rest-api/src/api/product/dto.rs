use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::product::model::Product;

/// Request body for creating a product.
#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Product title (1-255 characters)
    #[oai(validator(min_length = 1, max_length = 255))]
    pub title: String,
    /// Price, at least one cent and below 100000000
    #[oai(validator(
        minimum(value = "0", exclusive),
        maximum(value = "100000000", exclusive)
    ))]
    pub price: f64,
    /// Free-form description
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    /// Image URL, empty or a valid absolute URL
    #[oai(skip_serializing_if_is_none)]
    pub image: Option<String>,
    /// Category name (1-100 characters)
    #[oai(validator(min_length = 1, max_length = 100))]
    pub category: String,
    /// Rating between 0 and 5
    #[oai(
        skip_serializing_if_is_none,
        validator(minimum(value = "0"), maximum(value = "5"))
    )]
    pub rating: Option<f64>,
    /// Number of reviews
    #[oai(skip_serializing_if_is_none, validator(minimum(value = "0")))]
    pub count: Option<i32>,
}

/// Request body for a partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    /// Product title (1-255 characters)
    #[oai(
        skip_serializing_if_is_none,
        validator(min_length = 1, max_length = 255)
    )]
    pub title: Option<String>,
    /// Price, at least one cent and below 100000000
    #[oai(
        skip_serializing_if_is_none,
        validator(
            minimum(value = "0", exclusive),
            maximum(value = "100000000", exclusive)
        )
    )]
    pub price: Option<f64>,
    /// Free-form description, empty string clears it
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    /// Image URL, empty string clears it
    #[oai(skip_serializing_if_is_none)]
    pub image: Option<String>,
    /// Category name (1-100 characters)
    #[oai(
        skip_serializing_if_is_none,
        validator(min_length = 1, max_length = 100)
    )]
    pub category: Option<String>,
    /// Rating between 0 and 5
    #[oai(
        skip_serializing_if_is_none,
        validator(minimum(value = "0"), maximum(value = "5"))
    )]
    pub rating: Option<f64>,
    /// Number of reviews
    #[oai(skip_serializing_if_is_none, validator(minimum(value = "0")))]
    pub count: Option<i32>,
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProductResponse {
    /// Product identifier assigned by storage
    pub id: i32,
    pub title: String,
    pub price: f64,
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub image: Option<String>,
    pub category: String,
    #[oai(skip_serializing_if_is_none)]
    pub rating: Option<f64>,
    #[oai(skip_serializing_if_is_none)]
    pub count: Option<i32>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            description: product.description,
            image: product.image,
            category: product.category,
            rating: product.rating,
            count: product.count,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Acknowledgement returned by delete.
#[derive(Debug, Clone, Object)]
pub struct SuccessResponse {
    pub success: bool,
}
