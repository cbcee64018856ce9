use std::cmp::Ordering;
use std::str::FromStr;

use business::domain::product::model::Product;

/// Listing order selectable by catalog consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Newest,
    Title,
    PriceAsc,
    PriceDesc,
    Rating,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown sort order: {0}")]
pub struct UnknownSortBy(pub String);

impl FromStr for SortBy {
    type Err = UnknownSortBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortBy::Newest),
            "title" => Ok(SortBy::Title),
            "price-asc" => Ok(SortBy::PriceAsc),
            "price-desc" => Ok(SortBy::PriceDesc),
            "rating" => Ok(SortBy::Rating),
            other => Err(UnknownSortBy(other.to_string())),
        }
    }
}

/// Returns a sorted copy; the input is left untouched. The sort is stable.
pub fn sort_products(products: &[Product], sort_by: SortBy) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| match sort_by {
        SortBy::Newest => b.id.cmp(&a.id),
        SortBy::Title => a.title.cmp(&b.title),
        SortBy::PriceAsc => a.price.total_cmp(&b.price),
        SortBy::PriceDesc => b.price.total_cmp(&a.price),
        SortBy::Rating => match (a.rating, b.rating) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    });
    sorted
}
