use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::repository::ProductRepository;
use crate::domain::product::use_cases::get_categories::GetCategoriesUseCase;

pub struct GetCategoriesUseCaseImpl {
    pub repository: Arc<dyn ProductRepository>,
    pub logger: Arc<dyn Logger>,
}

#[async_trait]
impl GetCategoriesUseCase for GetCategoriesUseCaseImpl {
    async fn execute(&self) -> Result<Vec<String>, ProductError> {
        self.logger.info("Fetching product categories");
        let categories = self.repository.get_categories().await?;
        self.logger
            .debug(&format!("Found {} categories", categories.len()));
        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RepositoryError;
    use crate::domain::product::model::{NewProduct, Product};
    use crate::domain::product::patch::ProductPatch;
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

    #[tokio::test]
    async fn should_return_categories_from_repository() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_get_categories()
            .times(1)
            .returning(|| Ok(vec!["electronics".to_string(), "home".to_string()]));

        let use_case = GetCategoriesUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let categories = use_case.execute().await.unwrap();

        assert_eq!(categories, vec!["electronics", "home"]);
    }

    #[tokio::test]
    async fn should_propagate_repository_error() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_get_categories()
            .returning(|| Err(RepositoryError::DatabaseError));

        let use_case = GetCategoriesUseCaseImpl {
            repository: Arc::new(mock_repo),
            logger: mock_logger(),
        };

        let result = use_case.execute().await;

        assert!(matches!(result.unwrap_err(), ProductError::Repository(_)));
    }
}
