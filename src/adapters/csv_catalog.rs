use crate::domain::model::{CatalogItem, ProductId};
use crate::domain::ports::CatalogProvider;
use crate::utils::error::{BuildError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CatalogRow {
    product_id: ProductId,
    price: String,
    #[serde(default)]
    stock: i64,
    component_tag: String,
}

const REQUIRED_COLUMNS: [&str; 3] = ["product_id", "price", "component_tag"];

/// Catalog snapshot read from a `product_id,price,stock,component_tag` CSV file.
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Parses CSV text. Rows that fail to decode are skipped; a header
    /// lacking any required column fails the whole snapshot.
    pub fn parse(content: &[u8]) -> Result<Vec<CatalogItem>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(content);

        let headers = reader.headers().map_err(|e| BuildError::Catalog {
            message: format!("unreadable catalog header: {}", e),
        })?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::Catalog {
                message: format!("catalog header is missing {}", missing.join(", ")),
            });
        }

        let mut items = Vec::new();
        for (line, row) in reader.deserialize::<CatalogRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Skipping catalog row {}: {}", line + 1, e);
                    continue;
                }
            };
            let Ok(price) = row.price.parse::<Decimal>() else {
                tracing::warn!(
                    "Skipping product {}: invalid price '{}'",
                    row.product_id,
                    row.price
                );
                continue;
            };
            items.push(CatalogItem {
                product_id: row.product_id,
                price,
                stock: row.stock,
                component_tag: row.component_tag,
            });
        }
        Ok(items)
    }
}

#[async_trait]
impl CatalogProvider for CsvCatalog {
    async fn catalog_items(&self) -> Result<Vec<CatalogItem>> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| BuildError::Catalog {
            message: format!("cannot read {}: {}", self.path.display(), e),
        })?;
        let items = Self::parse(&content)?;
        tracing::debug!("Read {} catalog items from {}", items.len(), self.path.display());
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = r#"product_id,price,stock,component_tag
101,329.99,4,"{""componentType"":""cpu"",""componentId"":1}"
102,not-a-price,4,"{""componentType"":""gpu"",""componentId"":2}"
oops,10,1,"{}"
103,89.50,0,garbage
"#;

    #[test]
    fn test_parse_skips_bad_rows() {
        let items = CsvCatalog::parse(CATALOG.as_bytes()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, 101);
        assert_eq!(items[0].price, Decimal::new(32999, 2));
        assert_eq!(
            items[0].component_tag,
            r#"{"componentType":"cpu","componentId":1}"#
        );
        // the tag itself is only judged during extraction
        assert_eq!(items[1].component_tag, "garbage");
    }

    #[tokio::test]
    async fn test_reads_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = CsvCatalog::new(temp_file.path());
        let items = catalog.catalog_items().await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_wrong_header_is_catalog_error() {
        let content = "id;cost;tag\n101;329.99;{}\n";
        match CsvCatalog::parse(content.as_bytes()).unwrap_err() {
            BuildError::Catalog { message } => {
                assert!(message.contains("product_id"));
                assert!(message.contains("component_tag"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_file_is_catalog_error() {
        let err = CsvCatalog::parse(b"").unwrap_err();
        assert!(matches!(err, BuildError::Catalog { .. }));
    }

    #[test]
    fn test_stock_column_is_optional() {
        let content = "component_tag,price,product_id\ngarbage,10,7\n";
        let items = CsvCatalog::parse(content.as_bytes()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, 7);
        assert_eq!(items[0].stock, 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_catalog_error() {
        let catalog = CsvCatalog::new("/definitely/not/here.csv");
        let err = catalog.catalog_items().await.unwrap_err();
        assert!(matches!(err, BuildError::Catalog { .. }));
    }
}
