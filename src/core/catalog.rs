//! Turns the raw catalog snapshot into ranked, beam-limited candidate pools.

use crate::domain::model::{
    CandidateOption, CaseSpec, CatalogItem, ComponentCategory, ComponentId, ComponentRecord,
    ComponentTag, CoolerSpec, CpuSpec, GpuSpec, MotherboardSpec, Platform, PsuSpec, RamSpec,
    StorageSpec,
};
use crate::domain::ports::ComponentStore;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub const DEFAULT_BEAM_WIDTH: usize = 8;

/// `perf / max(1, price)`
pub fn score_per_price(perf_score: f64, price: Decimal) -> f64 {
    let price = price.to_f64().unwrap_or(f64::MAX).max(1.0);
    perf_score / price
}

/// Typed candidates per category, each sorted by descending score.
#[derive(Debug, Clone, Default)]
pub struct CandidatePools {
    pub cpus: Vec<CandidateOption<CpuSpec>>,
    pub motherboards: Vec<CandidateOption<MotherboardSpec>>,
    pub rams: Vec<CandidateOption<RamSpec>>,
    pub gpus: Vec<CandidateOption<GpuSpec>>,
    pub psus: Vec<CandidateOption<PsuSpec>>,
    pub cases: Vec<CandidateOption<CaseSpec>>,
    pub coolers: Vec<CandidateOption<CoolerSpec>>,
    pub storage: Vec<CandidateOption<StorageSpec>>,
}

impl CandidatePools {
    pub fn len_of(&self, category: ComponentCategory) -> usize {
        match category {
            ComponentCategory::Cpu => self.cpus.len(),
            ComponentCategory::Motherboard => self.motherboards.len(),
            ComponentCategory::Ram => self.rams.len(),
            ComponentCategory::Gpu => self.gpus.len(),
            ComponentCategory::Psu => self.psus.len(),
            ComponentCategory::Case => self.cases.len(),
            ComponentCategory::Cooler => self.coolers.len(),
            ComponentCategory::Storage => self.storage.len(),
        }
    }

    /// Keeps only CPUs whose socket carries the platform prefix.
    pub fn retain_platform(&mut self, platform: Platform) {
        let before = self.cpus.len();
        self.cpus.retain(|cpu| platform.matches(&cpu.spec.socket));
        tracing::debug!(
            "Platform filter '{}' kept {} of {} CPUs",
            platform.socket_prefix(),
            self.cpus.len(),
            before
        );
    }

    fn push(&mut self, option: CandidateOption) {
        let CandidateOption {
            item,
            component_id,
            spec,
            score,
        } = option;
        match spec {
            ComponentRecord::Cpu(spec) => self.cpus.push(typed(item, component_id, spec, score)),
            ComponentRecord::Motherboard(spec) => {
                self.motherboards
                    .push(typed(item, component_id, spec, score))
            }
            ComponentRecord::Ram(spec) => self.rams.push(typed(item, component_id, spec, score)),
            ComponentRecord::Gpu(spec) => self.gpus.push(typed(item, component_id, spec, score)),
            ComponentRecord::Psu(spec) => self.psus.push(typed(item, component_id, spec, score)),
            ComponentRecord::Case(spec) => self.cases.push(typed(item, component_id, spec, score)),
            ComponentRecord::Cooler(spec) => {
                self.coolers.push(typed(item, component_id, spec, score))
            }
            ComponentRecord::Storage(spec) => {
                self.storage.push(typed(item, component_id, spec, score))
            }
        }
    }

    fn rank(&mut self, beam_width: usize) {
        rank_pool(&mut self.cpus, beam_width);
        rank_pool(&mut self.motherboards, beam_width);
        rank_pool(&mut self.rams, beam_width);
        rank_pool(&mut self.gpus, beam_width);
        rank_pool(&mut self.psus, beam_width);
        rank_pool(&mut self.cases, beam_width);
        rank_pool(&mut self.coolers, beam_width);
        rank_pool(&mut self.storage, beam_width);
    }
}

fn typed<T>(
    item: CatalogItem,
    component_id: ComponentId,
    spec: T,
    score: f64,
) -> CandidateOption<T> {
    CandidateOption {
        item,
        component_id,
        spec,
        score,
    }
}

/// Stable sort, so equal scores keep catalog order.
fn rank_pool<T>(pool: &mut Vec<CandidateOption<T>>, beam_width: usize) {
    pool.sort_by(|a, b| b.score.total_cmp(&a.score));
    pool.truncate(beam_width);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub total: usize,
    pub malformed_tags: usize,
    pub unresolved: usize,
    pub kept: usize,
}

pub struct CatalogExtractor<'a, S: ComponentStore + ?Sized> {
    store: &'a S,
    beam_width: usize,
}

impl<'a, S: ComponentStore + ?Sized> CatalogExtractor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            beam_width: DEFAULT_BEAM_WIDTH,
        }
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width.max(1);
        self
    }

    /// Looks the tagged record up. Unknown ids and category mismatches yield `None`.
    fn resolve_tagged(&self, item: &CatalogItem, tag: ComponentTag) -> Option<CandidateOption> {
        let record = self.store.get(tag.category, tag.component_id)?;
        if record.category() != tag.category {
            return None;
        }
        Some(CandidateOption {
            item: item.clone(),
            component_id: tag.component_id,
            score: score_per_price(record.perf_score(), item.price),
            spec: record,
        })
    }

    pub fn extract(&self, items: &[CatalogItem]) -> (CandidatePools, ExtractionStats) {
        let mut pools = CandidatePools::default();
        let mut stats = ExtractionStats {
            total: items.len(),
            ..Default::default()
        };

        for item in items {
            let Some(tag) = ComponentTag::parse(&item.component_tag) else {
                tracing::debug!(
                    "Dropping product {}: unparseable component tag '{}'",
                    item.product_id,
                    item.component_tag
                );
                stats.malformed_tags += 1;
                continue;
            };

            match self.resolve_tagged(item, tag) {
                Some(option) => {
                    pools.push(option);
                    stats.kept += 1;
                }
                None => {
                    tracing::debug!(
                        "Dropping product {}: no {} record with id {}",
                        item.product_id,
                        tag.category,
                        tag.component_id
                    );
                    stats.unresolved += 1;
                }
            }
        }

        pools.rank(self.beam_width);

        tracing::debug!(
            "Catalog extraction: {} items, {} kept, {} malformed, {} unresolved",
            stats.total,
            stats.kept,
            stats.malformed_tags,
            stats.unresolved
        );

        (pools, stats)
    }
}
