use url::Url;

use super::errors::ProductError;

pub const TITLE_MAX_LENGTH: usize = 255;
pub const CATEGORY_MAX_LENGTH: usize = 100;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;
/// Exclusive upper bound of a `NUMERIC(10,2)` price.
pub const PRICE_MAX: f64 = 100_000_000.0;

/// Trims the title and checks it is non-empty and at most 255 characters.
pub fn validate_title(title: &str) -> Result<String, ProductError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ProductError::TitleEmpty);
    }
    if title.chars().count() > TITLE_MAX_LENGTH {
        return Err(ProductError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Trims the category and checks it is non-empty and at most 100 characters.
pub fn validate_category(category: &str) -> Result<String, ProductError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ProductError::CategoryEmpty);
    }
    if category.chars().count() > CATEGORY_MAX_LENGTH {
        return Err(ProductError::CategoryTooLong);
    }
    Ok(category.to_string())
}

/// Checks the price is still positive and in range once rounded to cents.
pub fn validate_price(price: f64) -> Result<f64, ProductError> {
    if !price.is_finite() {
        return Err(ProductError::InvalidPrice);
    }
    let cents = (price * 100.0).round();
    if cents < 1.0 || cents >= PRICE_MAX * 100.0 {
        return Err(ProductError::InvalidPrice);
    }
    Ok(price)
}

pub fn validate_rating(rating: f64) -> Result<f64, ProductError> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(ProductError::RatingOutOfRange);
    }
    Ok(rating)
}

pub fn validate_count(count: i32) -> Result<i32, ProductError> {
    if count < 0 {
        return Err(ProductError::NegativeCount);
    }
    Ok(count)
}

/// Accepts an empty string or any absolute URL.
///
/// Returns `None` for the empty string so callers can store a missing image.
pub fn validate_image(image: &str) -> Result<Option<String>, ProductError> {
    let image = image.trim();
    if image.is_empty() {
        return Ok(None);
    }
    Url::parse(image).map_err(|_| ProductError::InvalidImageUrl)?;
    Ok(Some(image.to_string()))
}
