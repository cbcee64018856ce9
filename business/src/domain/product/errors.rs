#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("product.title_empty")]
    TitleEmpty,
    #[error("product.title_too_long")]
    TitleTooLong,
    #[error("product.invalid_price")]
    InvalidPrice,
    #[error("product.category_empty")]
    CategoryEmpty,
    #[error("product.category_too_long")]
    CategoryTooLong,
    #[error("product.rating_out_of_range")]
    RatingOutOfRange,
    #[error("product.invalid_image_url")]
    InvalidImageUrl,
    #[error("product.negative_count")]
    NegativeCount,
    #[error("product.empty_patch")]
    EmptyPatch,
    #[error("product.not_found")]
    NotFound,
    #[error("repository.persistence")]
    Repository(#[from] crate::domain::errors::RepositoryError),
}

impl ProductError {
    /// Maps a repository failure, turning a missing row into `ProductError::NotFound`.
    pub fn from_lookup(err: crate::domain::errors::RepositoryError) -> Self {
        match err {
            crate::domain::errors::RepositoryError::NotFound => ProductError::NotFound,
            other => ProductError::Repository(other),
        }
    }

    pub fn is_validation(&self) -> bool {
        !matches!(self, ProductError::NotFound | ProductError::Repository(_))
    }
}
