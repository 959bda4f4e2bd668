use crate::domain::model::{CatalogItem, ComponentCategory, ComponentId, ComponentRecord};
use crate::domain::ports::{CatalogProvider, ComponentStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Catalog snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn catalog_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}

/// One entry of a component records file: an id plus the tagged record.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    id: ComponentId,
    #[serde(flatten)]
    record: ComponentRecord,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryComponentStore {
    records: HashMap<(ComponentCategory, ComponentId), ComponentRecord>,
}

impl InMemoryComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ComponentId, record: ComponentRecord) {
        self.records.insert((record.category(), id), record);
    }

    pub fn with(mut self, id: ComponentId, record: ComponentRecord) -> Self {
        self.insert(id, record);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parses a JSON array such as `[{"id": 1, "category": "cpu", "socket": "AM5", ...}]`.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let entries: Vec<StoredRecord> = serde_json::from_str(content)?;
        let mut store = Self::new();
        for entry in entries {
            store.insert(entry.id, entry.record);
        }
        tracing::debug!("Loaded {} component records", store.len());
        Ok(store)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

impl ComponentStore for InMemoryComponentStore {
    fn get(&self, category: ComponentCategory, id: ComponentId) -> Option<ComponentRecord> {
        self.records.get(&(category, id)).cloned()
    }
}
