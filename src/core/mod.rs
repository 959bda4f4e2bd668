pub mod catalog;
pub mod compatibility;
pub mod engine;
pub mod power;
pub mod search;
pub mod weights;

pub use crate::domain::model::{AutoBuildRequest, AutoBuildResult, BuildSelection, ValidationReport};
pub use crate::domain::ports::{CatalogProvider, ComponentStore, PriceHistory};
pub use crate::utils::error::Result;
