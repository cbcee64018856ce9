use super::errors::ProductError;
use super::validation::{
    validate_category, validate_count, validate_image, validate_price, validate_rating,
    validate_title,
};

/// Partial update of a product. `None` leaves a field unchanged.
///
/// For `description` and `image`, `Some("")` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub rating: Option<f64>,
    pub count: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.category.is_none()
            && self.rating.is_none()
            && self.count.is_none()
    }

    /// Checks every provided field and returns the normalized patch.
    pub fn validate(self) -> Result<Self, ProductError> {
        if self.is_empty() {
            return Err(ProductError::EmptyPatch);
        }

        let title = self.title.as_deref().map(validate_title).transpose()?;
        let price = self.price.map(validate_price).transpose()?;
        let category = self.category.as_deref().map(validate_category).transpose()?;
        let rating = self.rating.map(validate_rating).transpose()?;
        let count = self.count.map(validate_count).transpose()?;
        let image = match self.image.as_deref() {
            Some(image) => Some(validate_image(image)?.unwrap_or_default()),
            None => None,
        };
        let description = self.description.map(|d| d.trim().to_string());

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

    /// True when the patch sets a category different from `current`.
    pub fn changes_category(&self, current: &str) -> bool {
        self.category.as_deref().is_some_and(|c| c != current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_reject_patch_without_fields() {
        let result = ProductPatch::default().validate();

        assert!(matches!(result, Err(ProductError::EmptyPatch)));
    }

    #[test]
    fn should_validate_only_present_fields() {
        let patch = ProductPatch {
            price: Some(24.99),
            ..ProductPatch::default()
        }
        .validate()
        .unwrap();

        assert_eq!(patch.price, Some(24.99));
        assert_eq!(patch.title, None);
    }

    #[test]
    fn should_reject_patch_with_blank_title() {
        let result = ProductPatch {
            title: Some(" ".to_string()),
            ..ProductPatch::default()
        }
        .validate();

        assert!(matches!(result, Err(ProductError::TitleEmpty)));
    }

    #[test]
    fn should_keep_empty_image_as_clear_marker() {
        let patch = ProductPatch {
            image: Some(String::new()),
            ..ProductPatch::default()
        }
        .validate()
        .unwrap();

        assert_eq!(patch.image.as_deref(), Some(""));
    }

    #[test]
    fn should_detect_category_change() {
        let patch = ProductPatch {
            category: Some("garden".to_string()),
            ..ProductPatch::default()
        };

        assert!(patch.changes_category("home"));
        assert!(!patch.changes_category("garden"));
        assert!(!ProductPatch::default().changes_category("home"));
    }
}
