use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductRepository;
use crate::domain::product::use_cases::get_all::{GetAllProductsParams, GetAllProductsUseCase};

pub struct GetAllProductsUseCaseImpl {
    pub repository: Arc<dyn ProductRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetAllProductsUseCase for GetAllProductsUseCaseImpl {
    async fn execute(&self, params: GetAllProductsParams) -> Result<Vec<Product>, ProductError> {
        let products = match params.category.as_deref().filter(|c| !c.is_empty()) {
            Some(category) => {
                self.logger
                    .info(&format!("Fetching products in category: {}", category));
                self.repository.find_by_category(category).await?
            }
            None => {
                self.logger.info("Fetching all products");
                self.repository.find_all().await?
            }
        };
        self.logger
            .info(&format!("Found {} products", products.len()));
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepositoryError;
    use crate::domain::product::model::NewProduct;
    use crate::domain::product::patch::ProductPatch;
    use chrono::{Duration, Utc};
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

    fn product(id: i32, category: &str, age_minutes: i64) -> Product {
        let created = Utc::now() - Duration::minutes(age_minutes);
        Product {
            id,
            title: format!("Product {}", id),
            price: 10.0,
            description: None,
            image: None,
            category: category.to_string(),
            rating: None,
            count: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn should_return_all_products_when_no_category_given() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_find_all()
            .times(1)
            .returning(|| Ok(vec![product(2, "home", 1), product(1, "toys", 5)]));
        mock_repo.expect_find_by_category().never();

        let use_case = GetAllProductsUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let products = use_case
            .execute(GetAllProductsParams::default())
            .await
            .unwrap();

        assert_eq!(products.len(), 2);
        assert!(products[0].created_at >= products[1].created_at);
    }

    #[tokio::test]
    async fn should_filter_by_category_when_given() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo.expect_find_all().never();
        mock_repo
            .expect_find_by_category()
            .withf(|c| c == "home")
            .times(1)
            .returning(|_| Ok(vec![product(3, "home", 0)]));

        let use_case = GetAllProductsUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let products = use_case
            .execute(GetAllProductsParams {
                category: Some("home".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(products.len(), 1);
        assert_eq!(products[0].category, "home");
    }

    #[tokio::test]
    async fn should_treat_blank_category_as_no_filter() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo.expect_find_all().times(1).returning(|| Ok(vec![]));
        mock_repo.expect_find_by_category().never();

        let use_case = GetAllProductsUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let products = use_case
            .execute(GetAllProductsParams {
                category: Some(String::new()),
            })
            .await
            .unwrap();

        assert!(products.is_empty());
    }
}
