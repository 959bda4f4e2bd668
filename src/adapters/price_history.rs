use crate::domain::model::{PricePoint, ProductId};
use crate::domain::ports::{Bucket, PriceHistory};
use crate::utils::error::{BuildError, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketRow {
    #[serde(alias = "bucketLabel", alias = "date")]
    bucket: String,
    avg_price: Decimal,
}

/// Price history service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPriceHistory {
    client: Client,
    endpoint: String,
}

impl HttpPriceHistory {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn series_url(&self, product_id: ProductId) -> String {
        format!("{}/products/{}/price-history", self.endpoint, product_id)
    }
}

#[async_trait]
impl PriceHistory for HttpPriceHistory {
    async fn series(
        &self,
        product_id: ProductId,
        from: NaiveDate,
        to: NaiveDate,
        bucket: Bucket,
    ) -> Result<Vec<PricePoint>> {
        let url = self.series_url(product_id);
        tracing::debug!("Requesting price history: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
                ("bucket", bucket.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BuildError::PriceHistory {
                product_id,
                message: format!("service responded with {}", status),
            });
        }

        let rows: Vec<BucketRow> = response.json().await?;
        Ok(rows
            .into_iter()
            .map(|row| PricePoint {
                date: row.bucket,
                avg_price: row.avg_price,
            })
            .collect())
    }
}

/// Stand-in used when price history is switched off; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePriceHistory;

#[async_trait]
impl PriceHistory for UnavailablePriceHistory {
    async fn series(
        &self,
        product_id: ProductId,
        _from: NaiveDate,
        _to: NaiveDate,
        _bucket: Bucket,
    ) -> Result<Vec<PricePoint>> {
        Err(BuildError::PriceHistory {
            product_id,
            message: "price history is disabled".to_string(),
        })
    }
}
