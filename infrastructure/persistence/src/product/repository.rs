use std::sync::Arc;

use async_trait::async_trait;

use business::domain::errors::RepositoryError;
use business::domain::logger::Logger;
use business::domain::product::model::{NewProduct, Product};
use business::domain::product::patch::ProductPatch;
use business::domain::product::repository::ProductRepository;

use super::entity::{ProductEntity, to_decimal};
use crate::db::PgSession;
use crate::retry::{FailureKind, QueryError, RetryExecutor, StorageFailure};

const SELECT_ALL: &str = "SELECT id, title, price, description, image, category, rating, count, created_at, updated_at FROM products ORDER BY created_at DESC, id DESC";

const SELECT_BY_CATEGORY: &str = "SELECT id, title, price, description, image, category, rating, count, created_at, updated_at FROM products WHERE category = $1 ORDER BY created_at DESC, id DESC";

const SELECT_BY_ID: &str = "SELECT id, title, price, description, image, category, rating, count, created_at, updated_at FROM products WHERE id = $1";

const INSERT: &str = r#"INSERT INTO products (title, price, description, image, category, rating, count)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
    RETURNING id, title, price, description, image, category, rating, count, created_at, updated_at"#;

const UPDATE: &str = r#"UPDATE products SET
        title = COALESCE($2, title),
        price = COALESCE($3, price),
        description = CASE WHEN $4::TEXT IS NULL THEN description ELSE NULLIF($4, '') END,
        image = CASE WHEN $5::TEXT IS NULL THEN image ELSE NULLIF($5, '') END,
        category = COALESCE($6, category),
        rating = COALESCE($7, rating),
        count = COALESCE($8, count),
        updated_at = now()
    WHERE id = $1
    RETURNING id, title, price, description, image, category, rating, count, created_at, updated_at"#;

const DELETE: &str = "DELETE FROM products WHERE id = $1";

const SELECT_CATEGORIES: &str = r#"SELECT category FROM products
    WHERE category <> ''
    GROUP BY category
    ORDER BY category COLLATE "C" ASC"#;

pub struct ProductRepositoryPostgres {
    session: Arc<PgSession>,
    executor: RetryExecutor,
    logger: Arc<dyn Logger>,
}

impl ProductRepositoryPostgres {
    pub fn new(session: Arc<PgSession>, executor: RetryExecutor, logger: Arc<dyn Logger>) -> Self {
        Self {
            session,
            executor,
            logger,
        }
    }

    /// Logs the full failure before reducing it to a domain error.
    fn repository_error(&self, operation: &str, err: QueryError) -> RepositoryError {
        match err {
            QueryError::Failed(failure) => {
                self.logger
                    .error(&format!("{} failed: {:?}", operation, failure));
                RepositoryError::DatabaseError
            }
            QueryError::MaxRetriesExceeded { attempts, last } => {
                self.logger.error(&format!(
                    "{} gave up after {} attempts: {:?}",
                    operation, attempts, last
                ));
                RepositoryError::RetriesExhausted { attempts }
            }
        }
    }

    async fn fetch_list(
        &self,
        operation: &str,
        category: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let session = Arc::clone(&self.session);
        let entities = self
            .executor
            .run(move || {
                let session = Arc::clone(&session);
                async move {
                    let pool = session.pool().await;
                    let rows = match category {
                        Some(category) => {
                            sqlx::query_as::<_, ProductEntity>(SELECT_BY_CATEGORY)
                                .bind(category)
                                .fetch_all(&pool)
                                .await
                        }
                        None => {
                            sqlx::query_as::<_, ProductEntity>(SELECT_ALL)
                                .fetch_all(&pool)
                                .await
                        }
                    };
                    rows.map_err(StorageFailure::from)
                }
            })
            .await
            .map_err(|e| self.repository_error(operation, e))?;

        Ok(entities.into_iter().map(|e| e.into_domain()).collect())
    }
}

fn decimal_or_failure(value: f64, scale: i64) -> Result<bigdecimal::BigDecimal, StorageFailure> {
    to_decimal(value, scale).ok_or_else(|| {
        StorageFailure::new(FailureKind::Other, format!("value {} is not a valid decimal", value))
    })
}

#[async_trait]
impl ProductRepository for ProductRepositoryPostgres {
    async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let session = Arc::clone(&self.session);
        let entity = self
            .executor
            .run(move || {
                let session = Arc::clone(&session);
                async move {
                    let price = decimal_or_failure(product.price, 2)?;
                    let rating = product
                        .rating
                        .map(|r| decimal_or_failure(r, 1))
                        .transpose()?;
                    let pool = session.pool().await;
                    sqlx::query_as::<_, ProductEntity>(INSERT)
                        .bind(&product.title)
                        .bind(price)
                        .bind(&product.description)
                        .bind(&product.image)
                        .bind(&product.category)
                        .bind(rating)
                        .bind(product.count)
                        .fetch_one(&pool)
                        .await
                        .map_err(StorageFailure::from)
                }
            })
            .await
            .map_err(|e| self.repository_error("create product", e))?;

        Ok(entity.into_domain())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_list("find all products", None).await
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
        self.fetch_list("find products by category", Some(category))
            .await
    }

    async fn find_one(&self, id: i32) -> Result<Product, RepositoryError> {
        let session = Arc::clone(&self.session);
        let entity = self
            .executor
            .run(move || {
                let session = Arc::clone(&session);
                async move {
                    let pool = session.pool().await;
                    sqlx::query_as::<_, ProductEntity>(SELECT_BY_ID)
                        .bind(id)
                        .fetch_optional(&pool)
                        .await
                        .map_err(StorageFailure::from)
                }
            })
            .await
            .map_err(|e| self.repository_error("find product", e))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(entity.into_domain())
    }

    async fn update(&self, id: i32, patch: &ProductPatch) -> Result<Product, RepositoryError> {
        let session = Arc::clone(&self.session);
        let entity = self
            .executor
            .run(move || {
                let session = Arc::clone(&session);
                async move {
                    let price = patch
                        .price
                        .map(|p| decimal_or_failure(p, 2))
                        .transpose()?;
                    let rating = patch
                        .rating
                        .map(|r| decimal_or_failure(r, 1))
                        .transpose()?;
                    let pool = session.pool().await;
                    sqlx::query_as::<_, ProductEntity>(UPDATE)
                        .bind(id)
                        .bind(&patch.title)
                        .bind(price)
                        .bind(&patch.description)
                        .bind(&patch.image)
                        .bind(&patch.category)
                        .bind(rating)
                        .bind(patch.count)
                        .fetch_optional(&pool)
                        .await
                        .map_err(StorageFailure::from)
                }
            })
            .await
            .map_err(|e| self.repository_error("update product", e))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(entity.into_domain())
    }

    async fn remove(&self, id: i32) -> Result<(), RepositoryError> {
        let session = Arc::clone(&self.session);
        let deleted = self
            .executor
            .run(move || {
                let session = Arc::clone(&session);
                async move {
                    let pool = session.pool().await;
                    sqlx::query(DELETE)
                        .bind(id)
                        .execute(&pool)
                        .await
                        .map(|result| result.rows_affected())
                        .map_err(StorageFailure::from)
                }
            })
            .await
            .map_err(|e| self.repository_error("delete product", e))?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn get_categories(&self) -> Result<Vec<String>, RepositoryError> {
        let session = Arc::clone(&self.session);
        self.executor
            .run(move || {
                let session = Arc::clone(&session);
                async move {
                    let pool = session.pool().await;
                    sqlx::query_scalar::<_, String>(SELECT_CATEGORIES)
                        .fetch_all(&pool)
                        .await
                        .map_err(StorageFailure::from)
                }
            })
            .await
            .map_err(|e| self.repository_error("list categories", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConfig;
    use crate::retry::RetryPolicy;
    use sqlx::PgPool;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        errors: Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn info(&self, _message: &str) {}
        fn warn(&self, _message: &str) {}
        fn error(&self, message: &str) {
            self.errors.lock().unwrap().push(message.to_string());
        }
        fn debug(&self, _message: &str) {}
    }

    fn repository(pool: PgPool, logger: Arc<RecordingLogger>) -> ProductRepositoryPostgres {
        let session = Arc::new(PgSession::from_pool(
            DatabaseConfig::new("postgres://localhost/catalog".to_string()),
            pool,
        ));
        let policy = RetryPolicy {
            delays: Vec::new(),
            ..RetryPolicy::default()
        };
        let executor = RetryExecutor::new(session.clone(), policy, logger.clone());
        ProductRepositoryPostgres::new(session, executor, logger)
    }

    fn new_product(title: &str, category: &str) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            price: 10.0,
            description: Some("desc".to_string()),
            image: None,
            category: category.to_string(),
            rating: Some(4.5),
            count: Some(3),
        }
    }

    #[tokio::test]
    async fn should_log_and_reduce_query_failures() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/catalog")
            .unwrap();
        let logger = Arc::new(RecordingLogger::default());
        let repo = repository(pool, logger.clone());

        let failed = repo.repository_error(
            "find product",
            QueryError::Failed(
                StorageFailure::new(FailureKind::Database, "check violation").with_code("23514"),
            ),
        );
        let exhausted = repo.repository_error(
            "find product",
            QueryError::MaxRetriesExceeded {
                attempts: 3,
                last: StorageFailure::new(FailureKind::Io, "connection reset"),
            },
        );

        assert!(matches!(failed, RepositoryError::DatabaseError));
        assert!(matches!(
            exhausted,
            RepositoryError::RetriesExhausted { attempts: 3 }
        ));
        let errors = logger.errors.lock().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("check violation"));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn should_list_newest_first_and_filter_by_category(pool: PgPool) {
        let repo = repository(pool, Arc::new(RecordingLogger::default()));
        let lamp = repo.create(&new_product("Lamp", "home")).await.unwrap();
        let ball = repo.create(&new_product("Ball", "toys")).await.unwrap();
        let rug = repo.create(&new_product("Rug", "home")).await.unwrap();

        let all: Vec<i32> = repo.find_all().await.unwrap().iter().map(|p| p.id).collect();
        let home: Vec<i32> = repo
            .find_by_category("home")
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(all, vec![rug.id, ball.id, lamp.id]);
        assert_eq!(home, vec![rug.id, lamp.id]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn should_return_sorted_distinct_categories(pool: PgPool) {
        let repo = repository(pool, Arc::new(RecordingLogger::default()));
        for (title, category) in [("Lamp", "home"), ("Ball", "toys"), ("Rug", "home"), ("Atlas", "Books")] {
            repo.create(&new_product(title, category)).await.unwrap();
        }

        let categories = repo.get_categories().await.unwrap();

        assert_eq!(categories, vec!["Books", "home", "toys"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn should_apply_partial_update_and_clear_description(pool: PgPool) {
        let repo = repository(pool, Arc::new(RecordingLogger::default()));
        let lamp = repo.create(&new_product("Lamp", "home")).await.unwrap();

        let patch = ProductPatch {
            price: Some(24.99),
            description: Some(String::new()),
            ..ProductPatch::default()
        };
        let updated = repo.update(lamp.id, &patch).await.unwrap();

        assert_eq!(updated.title, "Lamp");
        assert_eq!(updated.category, "home");
        assert!((updated.price - 24.99).abs() < 1e-9);
        assert_eq!(updated.description, None);
        assert_eq!(updated.rating, Some(4.5));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a Postgres DATABASE_URL"]
    async fn should_report_missing_rows_as_not_found(pool: PgPool) {
        let repo = repository(pool, Arc::new(RecordingLogger::default()));

        assert!(matches!(repo.find_one(404).await, Err(RepositoryError::NotFound)));
        assert!(matches!(repo.remove(404).await, Err(RepositoryError::NotFound)));
        assert!(matches!(
            repo.update(404, &ProductPatch { count: Some(1), ..ProductPatch::default() }).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
