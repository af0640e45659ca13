use async_trait::async_trait;

use super::domain::{NewProduct, Product};
use super::query::ProductQuery;
use crate::errors::ServiceError;

/// Repository abstraction for product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, new: NewProduct) -> Result<Product, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError>;
    /// Rows matching `query`, ordered by id, plus the total match count.
    async fn find_page(&self, query: &ProductQuery, page_idx: u64, per_page: u64) -> Result<(Vec<Product>, u64), ServiceError>;
    /// Overwrite every column of an existing row.
    async fn save(&self, product: Product) -> Result<Product, ServiceError>;
    /// Set `deleted = true`. `false` when the row does not exist.
    async fn mark_deleted(&self, id: i32) -> Result<bool, ServiceError>;
    async fn count(&self, query: &ProductQuery) -> Result<u64, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockProductRepository {
        rows: Mutex<BTreeMap<i32, Product>>, // key: id
        writes: AtomicUsize,
        fail_writes: AtomicBool,
    }

    impl MockProductRepository {
        pub fn new() -> Self { Self::default() }

        /// Store a row as-is, bypassing validation. Handy for report fixtures.
        pub fn seed(&self, product: Product) {
            self.rows().insert(product.id, product);
        }

        pub fn all(&self) -> Vec<Product> {
            self.rows().values().cloned().collect()
        }

        /// Number of insert/save/mark_deleted calls that reached storage.
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Make every subsequent write fail with a database error.
        pub fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn rows(&self) -> MutexGuard<'_, BTreeMap<i32, Product>> {
            self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }

        fn begin_write(&self) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("write rejected by mock".into()));
            }
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn insert(&self, new: NewProduct) -> Result<Product, ServiceError> {
            self.begin_write()?;
            let mut rows = self.rows();
            let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
            let p = Product { id, name: new.name, category: new.category, price: new.price, date: new.date, deleted: false };
            rows.insert(id, p.clone());
            Ok(p)
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
            Ok(self.rows().get(&id).cloned())
        }

        async fn find_page(&self, query: &ProductQuery, page_idx: u64, per_page: u64) -> Result<(Vec<Product>, u64), ServiceError> {
            let rows = self.rows();
            let matching: Vec<&Product> = rows.values().filter(|p| query.matches(p)).collect();
            let total = matching.len() as u64;
            let page = matching
                .into_iter()
                .skip((page_idx * per_page) as usize)
                .take(per_page as usize)
                .cloned()
                .collect();
            Ok((page, total))
        }

        async fn save(&self, product: Product) -> Result<Product, ServiceError> {
            self.begin_write()?;
            let mut rows = self.rows();
            if !rows.contains_key(&product.id) {
                return Err(ServiceError::not_found("product"));
            }
            rows.insert(product.id, product.clone());
            Ok(product)
        }

        async fn mark_deleted(&self, id: i32) -> Result<bool, ServiceError> {
            if !self.rows().contains_key(&id) {
                return Ok(false);
            }
            self.begin_write()?;
            if let Some(p) = self.rows().get_mut(&id) {
                p.deleted = true;
            }
            Ok(true)
        }

        async fn count(&self, query: &ProductQuery) -> Result<u64, ServiceError> {
            Ok(self.rows().values().filter(|p| query.matches(p)).count() as u64)
        }
    }
}
