use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::patch::ProductPatch;
use crate::domain::product::repository::ProductRepository;
use crate::domain::product::use_cases::update::{UpdateProductParams, UpdateProductUseCase};

pub struct UpdateProductUseCaseImpl {
    pub repository: Arc<dyn ProductRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl UpdateProductUseCase for UpdateProductUseCaseImpl {
    async fn execute(&self, params: UpdateProductParams) -> Result<Product, ProductError> {
        self.logger
            .info(&format!("Updating product: {}", params.id));

        let patch = ProductPatch {
            title: params.title,
            price: params.price,
            description: params.description,
            image: params.image,
            category: params.category,
            rating: params.rating,
            count: params.count,
        }
        .validate()?;

        let updated_product = self
            .repository
            .update(params.id, &patch)
            .await
            .map_err(ProductError::from_lookup)?;

        self.logger
            .info(&format!("Product updated: {}", updated_product.id));
        Ok(updated_product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepositoryError;
    use crate::domain::product::model::NewProduct;
    use chrono::Utc;
    use mockall::mock;

    mock! {
        pub ProductRepo {}

        #[async_trait]
        impl ProductRepository for ProductRepo {
            async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError>;
            async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;
            async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError>;
            async fn find_one(&self, id: i32) -> Result<Product, RepositoryError>;
            async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, RepositoryError>;
            async fn remove(&self, id: i32) -> Result<(), RepositoryError>;
            async fn get_categories(&self) -> Result<Vec<String>, RepositoryError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn mock_logger() -> Arc<dyn Logger> {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_warn().returning(|_| ());
        logger.expect_error().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        Arc::new(logger)
    }

    fn params(id: i32) -> UpdateProductParams {
        UpdateProductParams {
            id,
            title: None,
            price: None,
            description: None,
            image: None,
            category: None,
            rating: None,
            count: None,
        }
    }

    #[tokio::test]
    async fn should_update_only_provided_fields() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_update()
            .withf(|id, patch| *id == 1 && patch.price == Some(24.99) && patch.title.is_none())
            .times(1)
            .returning(|id, patch| {
                let now = Utc::now();
                let mut product = Product {
                    id,
                    title: "Lamp".to_string(),
                    price: 19.99,
                    description: None,
                    image: None,
                    category: "home".to_string(),
                    rating: None,
                    count: None,
                    created_at: now,
                    updated_at: now,
                };
                product.apply_patch(patch, now);
                Ok(product)
            });

        let use_case = UpdateProductUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let product = use_case
            .execute(UpdateProductParams {
                price: Some(24.99),
                ..params(1)
            })
            .await
            .unwrap();

        assert_eq!(product.price, 24.99);
        assert_eq!(product.title, "Lamp");
    }

    #[tokio::test]
    async fn should_reject_update_without_fields() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo.expect_update().never();

        let use_case = UpdateProductUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let result = use_case.execute(params(1)).await;

        assert!(matches!(result.unwrap_err(), ProductError::EmptyPatch));
    }

    #[tokio::test]
    async fn should_reject_update_with_rating_out_of_range() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo.expect_update().never();

        let use_case = UpdateProductUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let result = use_case
            .execute(UpdateProductParams {
                rating: Some(-0.5),
                ..params(1)
            })
            .await;

        assert!(matches!(result.unwrap_err(), ProductError::RatingOutOfRange));
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_nonexistent_product() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_update()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let use_case = UpdateProductUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let result = use_case
            .execute(UpdateProductParams {
                title: Some("Something".to_string()),
                ..params(42)
            })
            .await;

        assert!(matches!(result.unwrap_err(), ProductError::NotFound));
    }
}
