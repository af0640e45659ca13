use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use super::domain::{CreateProductInput, NewProduct, Product, ProductFilter, ProductPage, UpdateProductInput};
use super::query::ProductQuery;
use super::repository::ProductRepository;
use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Product CRUD independent of web framework
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    page_size: u32,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, page_size: u64) -> Self {
        let page_size = u32::try_from(page_size).unwrap_or(u32::MAX);
        Self { repo, page_size }
    }

    /// Insert a product stamped with the current time and `deleted = false`.
    ///
    /// # Examples
    /// ```
    /// use service::product::{ProductService, domain::CreateProductInput, repository::mock::MockProductRepository};
    /// use std::sync::Arc;
    /// let svc = ProductService::new(Arc::new(MockProductRepository::new()), 5);
    /// let input = CreateProductInput { name: "Desk".into(), category: "Office".into(), price: None };
    /// let p = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert!(!p.deleted);
    /// ```
    #[instrument(skip(self, input), fields(name = %input.name, category = %input.category))]
    pub async fn create(&self, input: CreateProductInput) -> Result<Product, ServiceError> {
        let new = NewProduct::new(&input.name, &input.category, input.price, Utc::now().fixed_offset())?;
        let p = self.repo.insert(new).await?;
        info!(product_id = p.id, "product_created");
        Ok(p)
    }

    /// One page of products matching `filter`, ordered by id.
    #[instrument(skip(self, filter))]
    pub async fn find_all(&self, page: u32, filter: ProductFilter) -> Result<ProductPage, ServiceError> {
        let (page_idx, per_page) = Pagination { page, per_page: self.page_size }.normalize();
        let query = ProductQuery::from(filter);
        let (data, total) = self.repo.find_page(&query, page_idx, per_page).await?;
        debug!(total, returned = data.len(), "products_listed");
        Ok(ProductPage { data, total })
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: i32) -> Result<Product, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    /// Merge the supplied fields into the stored row and persist it.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateProductInput) -> Result<Product, ServiceError> {
        let mut p = self.find_one(id).await?;
        if let Some(name) = input.name {
            models::product::validate_name(&name)?;
            p.name = name;
        }
        if let Some(category) = input.category {
            models::product::validate_category(&category)?;
            p.category = category;
        }
        if let Some(price) = input.price {
            p.price = models::product::validate_price(price)?;
        }
        let saved = self.repo.save(p).await?;
        info!(product_id = saved.id, "product_updated");
        Ok(saved)
    }

    /// Soft delete. A missing id is not an error and writes nothing.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        if self.repo.mark_deleted(id).await? {
            info!(product_id = id, "product_deleted");
        } else {
            debug!(product_id = id, "delete_missing_product_ignored");
        }
        Ok(())
    }
}
