use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use business::domain::cache::{CacheInvalidator, CacheTag, InvalidationHooks, Mutation};
use business::domain::product::errors::ProductError;
use business::domain::product::model::{NewProduct, NewProductProps, Product};
use business::domain::product::patch::ProductPatch;

use crate::cache::TaggedCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, ErrorBody};

const IMAGE_HOST: &str = "fakestoreapi.com";
const IMAGE_PATH_PREFIX: &str = "/img/";

/// Storefront image rule: empty, or an absolute URL under `fakestoreapi.com/img/`.
pub fn is_allowed_image_url(raw: &str) -> bool {
    if raw.is_empty() {
        return true;
    }
    Url::parse(raw)
        .map(|url| url.host_str() == Some(IMAGE_HOST) && url.path().starts_with(IMAGE_PATH_PREFIX))
        .unwrap_or(false)
}

fn check_image(image: Option<&str>) -> Result<(), ClientError> {
    match image {
        Some(image) if !is_allowed_image_url(image.trim()) => {
            Err(ProductError::InvalidImageUrl.into())
        }
        _ => Ok(()),
    }
}

/// Fields accepted when creating a product.
#[derive(Debug, Clone, Default)]
pub struct ProductDraft {
    pub title: String,
    pub price: f64,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category: String,
    pub rating: Option<f64>,
    pub count: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<i32>,
}

impl<'a> From<&'a NewProduct> for ProductBody<'a> {
    fn from(product: &'a NewProduct) -> Self {
        Self {
            title: Some(&product.title),
            price: Some(product.price),
            description: product.description.as_deref(),
            image: product.image.as_deref(),
            category: Some(&product.category),
            rating: product.rating,
            count: product.count,
        }
    }
}

impl<'a> From<&'a ProductPatch> for ProductBody<'a> {
    fn from(patch: &'a ProductPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            price: patch.price,
            description: patch.description.as_deref(),
            image: patch.image.as_deref(),
            category: patch.category.as_deref(),
            rating: patch.rating,
            count: patch.count,
        }
    }
}

fn products_path() -> String {
    "/products".to_string()
}

fn category_path(category: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(category.as_bytes()).collect();
    format!("/products?category={}", encoded)
}

fn product_path(id: i32) -> String {
    format!("/products/{}", id)
}

fn categories_path() -> String {
    "/products/categories".to_string()
}

/// Catalog API client with a tagged read cache.
///
/// Reads are cached per path with the tags listed on each method. Mutations
/// publish a [`Mutation`] through the hook list once the API has accepted
/// them; the client's own cache is always the first hook.
pub struct CatalogClient {
    http: Client,
    config: ClientConfig,
    cache: Arc<TaggedCache>,
    hooks: InvalidationHooks,
}

impl CatalogClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let cache = Arc::new(TaggedCache::new(config.revalidate));
        let mut hooks = InvalidationHooks::new();
        hooks.register(cache.clone());

        Ok(Self {
            http,
            config,
            cache,
            hooks,
        })
    }

    /// Registers an extra post-commit hook, notified after the client cache.
    pub fn add_hook(&mut self, hook: Arc<dyn CacheInvalidator>) {
        self.hooks.register(hook);
    }

    pub fn cache(&self) -> &TaggedCache {
        &self.cache
    }

    /// All products, newest first. Tagged `products`.
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        self.cached_get(products_path(), &[CacheTag::Products])
            .await
    }

    /// Products in one category. Tagged `products` and `category-<name>`.
    pub async fn products_by_category(&self, category: &str) -> Result<Vec<Product>, ClientError> {
        self.cached_get(
            category_path(category),
            &[CacheTag::Products, CacheTag::Category(category.to_string())],
        )
        .await
    }

    /// One product. Tagged `products` and `product-<id>`.
    pub async fn product(&self, id: i32) -> Result<Product, ClientError> {
        self.cached_get(product_path(id), &[CacheTag::Products, CacheTag::Product(id)])
            .await
    }

    /// Distinct category names. Tagged `categories`.
    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.cached_get(categories_path(), &[CacheTag::Categories])
            .await
    }

    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ClientError> {
        check_image(draft.image.as_deref())?;
        let product = NewProduct::new(NewProductProps {
            title: draft.title,
            price: draft.price,
            description: draft.description,
            image: draft.image,
            category: draft.category,
            rating: draft.rating,
            count: draft.count,
        })?;

        let request = self
            .http
            .post(self.config.url(&products_path()))
            .json(&ProductBody::from(&product));
        let created: Product = decode(self.send(request).await?)?;

        self.hooks.publish(&Mutation::Created {
            id: created.id,
            category: created.category.clone(),
        });
        Ok(created)
    }

    pub async fn update_product(&self, id: i32, patch: ProductPatch) -> Result<Product, ClientError> {
        check_image(patch.image.as_deref())?;
        let patch = patch.validate()?;
        let previous_category = self.known_category(id);

        let request = self
            .http
            .patch(self.config.url(&product_path(id)))
            .json(&ProductBody::from(&patch));
        let updated: Product = decode(self.send(request).await?)?;

        self.hooks.publish(&Mutation::Updated {
            id,
            previous_category,
            category: patch.category,
        });
        Ok(updated)
    }

    pub async fn delete_product(&self, id: i32) -> Result<(), ClientError> {
        let category = self.known_category(id);

        let request = self.http.delete(self.config.url(&product_path(id)));
        self.send(request).await?;

        self.hooks.publish(&Mutation::Deleted { id, category });
        Ok(())
    }

    /// Category of a product the cache still holds, if any.
    fn known_category(&self, id: i32) -> Option<String> {
        self.cache
            .get(&product_path(id))
            .and_then(|value| value.get("category")?.as_str().map(str::to_string))
    }

    async fn cached_get<T: DeserializeOwned>(
        &self,
        path: String,
        tags: &[CacheTag],
    ) -> Result<T, ClientError> {
        if let Some(value) = self.cache.get(&path) {
            return decode(value);
        }

        let value = self.send(self.http.get(self.config.url(&path))).await?;
        self.cache.put(path, value.clone(), tags);
        decode(value)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<Value>().await?);
        }

        let body = response.json::<ErrorBody>().await.ok();
        Err(ClientError::from_response(status.as_u16(), body))
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|err| ClientError::Unknown(err.to_string()))
}
