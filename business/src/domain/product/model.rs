use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::ProductError;
use super::patch::ProductPatch;
use super::validation::{
    validate_category, validate_count, validate_image, validate_price, validate_rating,
    validate_title,
};

/// A catalog product as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Applies the provided fields of a patch, leaving the others unchanged.
    ///
    /// An empty `description` or `image` clears the stored value.
    pub fn apply_patch(&mut self, patch: &ProductPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(description) = &patch.description {
            self.description = (!description.is_empty()).then(|| description.clone());
        }
        if let Some(image) = &patch.image {
            self.image = (!image.is_empty()).then(|| image.clone());
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }
        if let Some(count) = patch.count {
            self.count = Some(count);
        }
        self.updated_at = now;
    }
}

pub struct NewProductProps {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: String,
    pub rating: Option<f64>,
    pub count: Option<i32>,
}

/// Validated input for creating a product. Storage assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: String,
    pub rating: Option<f64>,
    pub count: Option<i32>,
}

impl NewProduct {
    pub fn new(props: NewProductProps) -> Result<Self, ProductError> {
        let title = validate_title(&props.title)?;
        let price = validate_price(props.price)?;
        let category = validate_category(&props.category)?;
        let image = match props.image {
            Some(image) => validate_image(&image)?,
            None => None,
        };
        let rating = props.rating.map(validate_rating).transpose()?;
        let count = props.count.map(validate_count).transpose()?;
        let description = props.description.filter(|d| !d.trim().is_empty());

        Ok(Self {
            title,
            price,
            description,
            image,
            category,
            rating,
            count,
        })
    }
}
