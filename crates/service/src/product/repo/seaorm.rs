use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, Unchanged,
};

use crate::errors::ServiceError;
use crate::product::domain::{NewProduct, Product};
use crate::product::query::ProductQuery;
use crate::product::repository::ProductRepository;
use models::product::{ActiveModel, Column, Entity};

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmProductRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// SQL rendition of [`ProductQuery::matches`].
pub fn to_condition(q: &ProductQuery) -> Condition {
    let mut cond = Condition::all();
    if let Some(c) = &q.category {
        cond = cond.add(Column::Category.eq(c.clone()));
    }
    if let Some(d) = q.deleted {
        cond = cond.add(Column::Deleted.eq(d));
    }
    if let Some(from) = q.date_from {
        cond = cond.add(Column::Date.gte(from));
    }
    if let Some(to) = q.date_to {
        cond = cond.add(Column::Date.lte(to));
    }
    match q.has_price {
        Some(true) => cond = cond.add(Column::Price.is_not_null()),
        Some(false) => cond = cond.add(Column::Price.is_null()),
        None => {}
    }
    if let Some(m) = q.price_min {
        cond = cond.add(Column::Price.gte(m));
    }
    if let Some(m) = q.price_max {
        cond = cond.add(Column::Price.lte(m));
    }
    if let Some(m) = q.price_below {
        cond = cond.add(Column::Price.lt(m));
    }
    if let Some(m) = q.price_above {
        cond = cond.add(Column::Price.gt(m));
    }
    cond
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    async fn insert(&self, new: NewProduct) -> Result<Product, ServiceError> {
        let created = models::product::create(&self.db, &new.name, &new.category, new.price, Some(new.date)).await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ServiceError> {
        Ok(Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_page(&self, query: &ProductQuery, page_idx: u64, per_page: u64) -> Result<(Vec<Product>, u64), ServiceError> {
        let paginator = Entity::find()
            .filter(to_condition(query))
            .order_by_asc(Column::Id)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page_idx).await?;
        Ok((rows, total))
    }

    async fn save(&self, product: Product) -> Result<Product, ServiceError> {
        let am = ActiveModel {
            id: Unchanged(product.id),
            name: Set(product.name),
            category: Set(product.category),
            price: Set(product.price),
            date: Set(product.date),
            deleted: Set(product.deleted),
        };
        am.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => ServiceError::not_found("product"),
            other => other.into(),
        })
    }

    async fn mark_deleted(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(models::product::soft_delete(&self.db, id).await?)
    }

    async fn count(&self, query: &ProductQuery) -> Result<u64, ServiceError> {
        Ok(Entity::find().filter(to_condition(query)).count(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    fn new_product(category: &str, price: Option<i64>) -> NewProduct {
        NewProduct::new("Widget", category, price.map(Decimal::from), Utc::now().fixed_offset()).unwrap()
    }

    fn unique_category() -> String {
        format!("repo_{}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[tokio::test]
    async fn sql_condition_agrees_with_in_memory_predicate() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmProductRepository::new(db);
        let category = unique_category();
        let mut rows = Vec::new();
        for price in [None, Some(5), Some(10), Some(20), Some(30)] {
            rows.push(repo.insert(new_product(&category, price)).await?);
        }
        assert!(repo.mark_deleted(rows[4].id).await?);

        let base = ProductQuery { category: Some(category.clone()), ..ProductQuery::default() };
        let queries = [
            base.clone(),
            base.clone().deleted(false),
            base.clone().has_price(true),
            base.clone().has_price(false),
            base.clone().price_between(Decimal::from(5), Decimal::from(20)),
            base.clone().price_below(Decimal::from(10)),
            base.clone().price_above(Decimal::from(10)).deleted(false),
        ];
        for q in &queries {
            let fresh: Vec<Product> = {
                let mut all = Vec::new();
                for r in &rows {
                    if let Some(p) = repo.find_by_id(r.id).await? { all.push(p); }
                }
                all
            };
            let expected = fresh.iter().filter(|p| q.matches(p)).count() as u64;
            assert_eq!(repo.count(q).await?, expected, "{q:?}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn pages_are_ordered_by_id() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmProductRepository::new(db);
        let category = unique_category();
        for _ in 0..3 {
            repo.insert(new_product(&category, Some(1))).await?;
        }
        let q = ProductQuery { category: Some(category), ..ProductQuery::default() };
        let (first, total) = repo.find_page(&q, 0, 2).await?;
        let (second, _) = repo.find_page(&q, 1, 2).await?;
        assert_eq!(total, 3);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
        assert!(first[0].id < first[1].id && first[1].id < second[0].id);
        Ok(())
    }

    #[tokio::test]
    async fn save_overwrites_and_missing_row_is_not_found() -> anyhow::Result<()> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmProductRepository::new(db);
        let mut p = repo.insert(new_product(&unique_category(), None)).await?;
        p.name = "Renamed".into();
        p.date = DateTime::parse_from_rfc3339("2024-01-23T21:47:08.012Z")?;
        let saved = repo.save(p.clone()).await?;
        assert_eq!(saved.name, "Renamed");
        assert_eq!(repo.find_by_id(p.id).await?.map(|r| r.date), Some(p.date));

        p.id = i32::MAX;
        assert!(matches!(repo.save(p).await, Err(ServiceError::NotFound(_))));
        assert!(!repo.mark_deleted(i32::MAX).await?);
        Ok(())
    }
}
