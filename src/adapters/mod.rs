// Adapters layer: concrete catalog, component store and price history implementations.

pub mod csv_catalog;
pub mod memory;
pub mod price_history;

pub use csv_catalog::CsvCatalog;
pub use memory::{InMemoryComponentStore, StaticCatalog};
pub use price_history::{HttpPriceHistory, UnavailablePriceHistory};
