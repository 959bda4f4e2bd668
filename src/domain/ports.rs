use crate::domain::model::{
    CatalogItem, ComponentCategory, ComponentId, ComponentRecord, PricePoint, ProductId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;

/// Source of the sellable catalog snapshot. Read once per build request.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn catalog_items(&self) -> Result<Vec<CatalogItem>>;
}

/// Lookup of component fact sheets. `None` means not found.
pub trait ComponentStore: Send + Sync {
    fn get(&self, category: ComponentCategory, id: ComponentId) -> Option<ComponentRecord>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Day,
    Week,
    Month,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Day => "day",
            Bucket::Week => "week",
            Bucket::Month => "month",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated price series per product. Fallible and possibly slow.
#[async_trait]
pub trait PriceHistory: Send + Sync {
    async fn series(
        &self,
        product_id: ProductId,
        from: NaiveDate,
        to: NaiveDate,
        bucket: Bucket,
    ) -> Result<Vec<PricePoint>>;
}

#[async_trait]
impl<T: PriceHistory + ?Sized> PriceHistory for Box<T> {
    async fn series(
        &self,
        product_id: ProductId,
        from: NaiveDate,
        to: NaiveDate,
        bucket: Bucket,
    ) -> Result<Vec<PricePoint>> {
        (**self).series(product_id, from, to, bucket).await
    }
}

#[async_trait]
impl<T: PriceHistory + ?Sized> PriceHistory for Arc<T> {
    async fn series(
        &self,
        product_id: ProductId,
        from: NaiveDate,
        to: NaiveDate,
        bucket: Bucket,
    ) -> Result<Vec<PricePoint>> {
        (**self).series(product_id, from, to, bucket).await
    }
}
