pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::EngineConfig;

pub use adapters::{
    CsvCatalog, HttpPriceHistory, InMemoryComponentStore, StaticCatalog, UnavailablePriceHistory,
};
pub use core::engine::{BuildEngine, EngineSettings, PRICE_HISTORY_UNAVAILABLE};
pub use domain::model::{
    AutoBuildRequest, AutoBuildResult, BuildSelection, CatalogItem, ComponentCategory,
    ComponentRecord, IssueCode, IssueLevel, ValidationIssue, ValidationReport,
};
pub use utils::error::{BuildError, Result};
