#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use rig_builder::domain::model::{
    CaseSpec, CoolerSpec, CpuSpec, GpuSpec, MotherboardSpec, PricePoint, ProductId, PsuSpec,
    RamSpec, StorageKind, StorageSpec,
};
use rig_builder::domain::ports::{Bucket, PriceHistory};
use rig_builder::{
    BuildEngine, BuildError, CatalogItem, ComponentRecord, InMemoryComponentStore, StaticCatalog,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub fn tag(category: &str, id: i64) -> String {
    format!(r#"{{"componentType":"{}","componentId":{}}}"#, category, id)
}

pub fn cpu(socket: &str, tdp: u32, perf: f64) -> ComponentRecord {
    ComponentRecord::Cpu(CpuSpec {
        socket: socket.to_string(),
        tdp_watts: tdp,
        perf_score: perf,
    })
}

pub fn board(socket: &str, ram_type: &str) -> ComponentRecord {
    ComponentRecord::Motherboard(MotherboardSpec {
        socket: socket.to_string(),
        ram_type: ram_type.to_string(),
        ram_max_freq: 6400,
        m2_slots: 2,
        pcie_slots: 2,
        form_factor: "ATX".to_string(),
    })
}

pub fn ram(ram_type: &str, freq: u32, perf: f64) -> ComponentRecord {
    ComponentRecord::Ram(RamSpec {
        ram_type: ram_type.to_string(),
        freq_mhz: freq,
        perf_score: perf,
    })
}

pub fn gpu(length: u32, tdp: u32, perf: f64) -> ComponentRecord {
    ComponentRecord::Gpu(GpuSpec {
        length_mm: length,
        slots: 2,
        tdp_watts: tdp,
        perf_score: perf,
    })
}

pub fn psu(wattage: u32) -> ComponentRecord {
    ComponentRecord::Psu(PsuSpec {
        wattage,
        form_factor: "ATX".to_string(),
    })
}

pub fn case(gpu_max: u32, cooler_max: u32) -> ComponentRecord {
    ComponentRecord::Case(CaseSpec {
        gpu_max_length_mm: gpu_max,
        cooler_max_height_mm: cooler_max,
        psu_form_factor: "ATX".to_string(),
    })
}

pub fn cooler(height: u32, sockets: &[&str]) -> ComponentRecord {
    ComponentRecord::Cooler(CoolerSpec {
        height_mm: height,
        supported_sockets: sockets.iter().map(|s| s.to_string()).collect(),
    })
}

pub fn nvme(perf: f64) -> ComponentRecord {
    ComponentRecord::Storage(StorageSpec {
        kind: StorageKind::Nvme,
        perf_score: perf,
    })
}

pub fn sata(perf: f64) -> ComponentRecord {
    ComponentRecord::Storage(StorageSpec {
        kind: StorageKind::Sata,
        perf_score: perf,
    })
}

/// Catalog items and component records built side by side.
#[derive(Default)]
pub struct Fixture {
    pub items: Vec<CatalogItem>,
    pub store: InMemoryComponentStore,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product whose component id equals its product id.
    pub fn part(mut self, product_id: ProductId, price: i64, record: ComponentRecord) -> Self {
        let category = record.category();
        self.items.push(CatalogItem {
            product_id,
            price: Decimal::from(price),
            stock: 3,
            component_tag: tag(category.key(), product_id),
        });
        self.store.insert(product_id, record);
        self
    }

    pub fn raw_item(mut self, product_id: ProductId, price: i64, component_tag: &str) -> Self {
        self.items.push(CatalogItem {
            product_id,
            price: Decimal::from(price),
            stock: 1,
            component_tag: component_tag.to_string(),
        });
        self
    }

    pub fn engine<P: PriceHistory>(
        self,
        price_history: P,
    ) -> BuildEngine<StaticCatalog, InMemoryComponentStore, P> {
        BuildEngine::new(StaticCatalog::new(self.items), self.store, price_history)
    }
}

/// One compatible AM5 build totalling 1545, plus parts that can never combine
/// into a valid build.
pub fn single_build_fixture() -> Fixture {
    Fixture::new()
        .part(1001, 300, cpu("AM5", 105, 600.0))
        .part(1002, 180, board("AM5", "DDR5"))
        .part(1003, 120, ram("DDR5", 6000, 120.0))
        .part(1004, 600, gpu(300, 263, 1500.0))
        .part(1005, 110, psu(850))
        .part(1006, 90, case(340, 165))
        .part(1007, 45, cooler(155, &["AM5", "AM4"]))
        .part(1008, 100, nvme(150.0))
        // LGA CPU with no LGA motherboard
        .part(2001, 250, cpu("LGA1700", 125, 700.0))
        // DDR4 kit on a DDR5 board
        .part(2003, 60, ram("DDR4", 3200, 90.0))
        // too long for the only case
        .part(2004, 400, gpu(400, 220, 1100.0))
        .raw_item(2999, 10, "{broken")
}

pub const SINGLE_BUILD_TOTAL: i64 = 1545;

/// Returns a short flat series for every product.
#[derive(Default)]
pub struct FixedPriceHistory {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PriceHistory for FixedPriceHistory {
    async fn series(
        &self,
        _product_id: ProductId,
        from: NaiveDate,
        to: NaiveDate,
        bucket: Bucket,
    ) -> rig_builder::Result<Vec<PricePoint>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(bucket, Bucket::Day);
        assert_eq!((to - from).num_days(), 30);
        Ok(vec![
            PricePoint {
                date: from.format("%Y-%m-%d").to_string(),
                avg_price: Decimal::from(100),
            },
            PricePoint {
                date: to.format("%Y-%m-%d").to_string(),
                avg_price: Decimal::from(95),
            },
        ])
    }
}

/// Fails for the listed products, or for every product when the list is empty.
#[derive(Default)]
pub struct FailingPriceHistory {
    pub failing: Vec<ProductId>,
}

impl FailingPriceHistory {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(failing: Vec<ProductId>) -> Self {
        Self { failing }
    }
}

#[async_trait]
impl PriceHistory for FailingPriceHistory {
    async fn series(
        &self,
        product_id: ProductId,
        _from: NaiveDate,
        _to: NaiveDate,
        _bucket: Bucket,
    ) -> rig_builder::Result<Vec<PricePoint>> {
        if self.failing.is_empty() || self.failing.contains(&product_id) {
            return Err(BuildError::PriceHistory {
                product_id,
                message: "service down".to_string(),
            });
        }
        Ok(Vec::new())
    }
}

/// Never answers within any reasonable timeout.
pub struct SlowPriceHistory(pub Duration);

#[async_trait]
impl PriceHistory for SlowPriceHistory {
    async fn series(
        &self,
        _product_id: ProductId,
        _from: NaiveDate,
        _to: NaiveDate,
        _bucket: Bucket,
    ) -> rig_builder::Result<Vec<PricePoint>> {
        tokio::time::sleep(self.0).await;
        Ok(Vec::new())
    }
}
