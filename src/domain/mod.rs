// Domain layer: build models and the ports for the catalog, component store and price history.

pub mod model;
pub mod ports;
