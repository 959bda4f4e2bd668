//! Budget-bounded build search.
//!
//! Combinations are generated in a fixed order (CPU, matching motherboard,
//! GPU, RAM), filtered by budget and compatibility, and reduced to the highest
//! composite score. Each combination carries its ordinal in that order, and
//! equal scores resolve to the lower ordinal, so the parallel reduce picks the
//! same winner as a sequential scan would.

use crate::core::catalog::CandidatePools;
use crate::core::compatibility::{check, ResolvedBuild};
use crate::core::power::required_wattage;
use crate::core::weights::ScoringWeights;
use crate::domain::model::{
    BuildSelection, CandidateOption, CaseSpec, ComponentCategory, CoolerSpec, CpuSpec, GpuSpec,
    MotherboardSpec, ProductId, PsuSpec, RamSpec, StorageSpec,
};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

/// Storage units added to every build.
pub const STORAGE_PICKS: usize = 2;

/// Indices into the CPU, motherboard, GPU and RAM pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combination {
    pub ordinal: usize,
    pub cpu: usize,
    pub motherboard: usize,
    pub gpu: usize,
    pub ram: usize,
}

/// Enumerates CPU x same-socket motherboard x GPU x RAM in pool order.
pub fn combinations(pools: &CandidatePools) -> Vec<Combination> {
    let mut combos = Vec::new();
    for (cpu_idx, cpu) in pools.cpus.iter().enumerate() {
        for (board_idx, board) in pools.motherboards.iter().enumerate() {
            if board.spec.socket != cpu.spec.socket {
                continue;
            }
            for gpu_idx in 0..pools.gpus.len() {
                for ram_idx in 0..pools.rams.len() {
                    combos.push(Combination {
                        ordinal: combos.len(),
                        cpu: cpu_idx,
                        motherboard: board_idx,
                        gpu: gpu_idx,
                        ram: ram_idx,
                    });
                }
            }
        }
    }
    combos
}

/// Cheapest PSU meeting the requirement, else the one closest to it.
pub fn pick_psu(psus: &[CandidateOption<PsuSpec>], required: u32) -> Option<usize> {
    let adequate = psus
        .iter()
        .enumerate()
        .filter(|(_, psu)| psu.spec.wattage >= required)
        .min_by(|(_, a), (_, b)| a.price().cmp(&b.price()))
        .map(|(idx, _)| idx);

    adequate.or_else(|| {
        psus.iter()
            .enumerate()
            .min_by_key(|(_, psu)| psu.spec.wattage.abs_diff(required))
            .map(|(idx, _)| idx)
    })
}

/// First case that houses the GPU, else the first case.
pub fn pick_case(cases: &[CandidateOption<CaseSpec>], gpu: &GpuSpec) -> Option<usize> {
    if cases.is_empty() {
        return None;
    }
    Some(
        cases
            .iter()
            .position(|case| case.spec.gpu_max_length_mm >= gpu.length_mm)
            .unwrap_or(0),
    )
}

/// First cooler that fits the case and the CPU socket, else the first cooler.
pub fn pick_cooler(
    coolers: &[CandidateOption<CoolerSpec>],
    case: &CaseSpec,
    cpu: &CpuSpec,
) -> Option<usize> {
    if coolers.is_empty() {
        return None;
    }
    Some(
        coolers
            .iter()
            .position(|cooler| {
                cooler.spec.height_mm <= case.cooler_max_height_mm
                    && cooler.spec.supports(&cpu.socket)
            })
            .unwrap_or(0),
    )
}

/// A feasible combination with its secondary picks, by pool index.
#[derive(Debug, Clone, Copy)]
struct Pick {
    combo: Combination,
    psu: usize,
    case: usize,
    cooler: Option<usize>,
    total: Decimal,
    required_wattage: u32,
    score: f64,
}

impl Pick {
    fn beats(&self, other: &Pick) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.combo.ordinal < other.combo.ordinal,
        }
    }
}

enum Evaluation {
    Feasible(Pick),
    OverBudget,
    Incompatible,
    Aborted,
}

#[derive(Debug, Default)]
struct Tally {
    best: Option<Pick>,
    evaluated: usize,
    over_budget: usize,
    incompatible: usize,
    aborted: bool,
}

impl Tally {
    fn absorb(mut self, evaluation: Evaluation) -> Self {
        match evaluation {
            Evaluation::Feasible(pick) => {
                self.evaluated += 1;
                self.offer(pick);
            }
            Evaluation::OverBudget => {
                self.evaluated += 1;
                self.over_budget += 1;
            }
            Evaluation::Incompatible => {
                self.evaluated += 1;
                self.incompatible += 1;
            }
            Evaluation::Aborted => self.aborted = true,
        }
        self
    }

    fn offer(&mut self, pick: Pick) {
        match &self.best {
            Some(current) if !pick.beats(current) => {}
            _ => self.best = Some(pick),
        }
    }

    fn merge(mut self, other: Tally) -> Self {
        self.evaluated += other.evaluated;
        self.over_budget += other.over_budget;
        self.incompatible += other.incompatible;
        self.aborted |= other.aborted;
        if let Some(pick) = other.best {
            self.offer(pick);
        }
        self
    }
}

/// The winning build with its candidates cloned out of the pools.
#[derive(Debug, Clone)]
pub struct ChosenBuild {
    pub cpu: CandidateOption<CpuSpec>,
    pub motherboard: CandidateOption<MotherboardSpec>,
    pub ram: CandidateOption<RamSpec>,
    pub gpu: CandidateOption<GpuSpec>,
    pub psu: CandidateOption<PsuSpec>,
    pub case: CandidateOption<CaseSpec>,
    pub cooler: Option<CandidateOption<CoolerSpec>>,
    pub storage: Vec<CandidateOption<StorageSpec>>,
    pub total: Decimal,
    pub required_wattage: u32,
    pub score: f64,
}

impl ChosenBuild {
    pub fn selection(&self) -> BuildSelection {
        BuildSelection {
            cpu: Some(self.cpu.component_id),
            motherboard: Some(self.motherboard.component_id),
            ram: Some(self.ram.component_id),
            gpu: Some(self.gpu.component_id),
            psu: Some(self.psu.component_id),
            case: Some(self.case.component_id),
            cooler: self.cooler.as_ref().map(|cooler| cooler.component_id),
            storage: self.storage.iter().map(|drive| drive.component_id).collect(),
        }
    }

    /// Product ids keyed by category, `storage1..n`, and `cooler` only when chosen.
    pub fn parts(&self) -> BTreeMap<String, ProductId> {
        let mut parts = BTreeMap::new();
        parts.insert(ComponentCategory::Cpu.key().to_string(), self.cpu.product_id());
        parts.insert(
            ComponentCategory::Motherboard.key().to_string(),
            self.motherboard.product_id(),
        );
        parts.insert(ComponentCategory::Ram.key().to_string(), self.ram.product_id());
        parts.insert(ComponentCategory::Gpu.key().to_string(), self.gpu.product_id());
        parts.insert(ComponentCategory::Psu.key().to_string(), self.psu.product_id());
        parts.insert(ComponentCategory::Case.key().to_string(), self.case.product_id());
        if let Some(cooler) = &self.cooler {
            parts.insert(ComponentCategory::Cooler.key().to_string(), cooler.product_id());
        }
        for (idx, drive) in self.storage.iter().enumerate() {
            parts.insert(format!("storage{}", idx + 1), drive.product_id());
        }
        parts
    }
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub best: Option<ChosenBuild>,
    pub combinations: usize,
    pub over_budget: usize,
    pub incompatible: usize,
    pub aborted: bool,
}

pub struct BuildSearch<'a> {
    pools: &'a CandidatePools,
    weights: &'a ScoringWeights,
    budget: Decimal,
}

impl<'a> BuildSearch<'a> {
    pub fn new(pools: &'a CandidatePools, weights: &'a ScoringWeights, budget: Decimal) -> Self {
        Self {
            pools,
            weights,
            budget,
        }
    }

    /// Runs the search. Setting `abort` stops evaluation of remaining combinations.
    pub fn run(&self, abort: &AtomicBool) -> SearchOutcome {
        let combos = combinations(self.pools);

        let tally = combos
            .par_iter()
            .map(|combo| self.evaluate(combo, abort))
            .fold(Tally::default, Tally::absorb)
            .reduce(Tally::default, Tally::merge);

        tracing::debug!(
            "Search evaluated {} of {} combinations ({} over budget, {} incompatible)",
            tally.evaluated,
            combos.len(),
            tally.over_budget,
            tally.incompatible
        );

        SearchOutcome {
            best: tally.best.map(|pick| self.materialize(&pick)),
            combinations: combos.len(),
            over_budget: tally.over_budget,
            incompatible: tally.incompatible,
            aborted: tally.aborted,
        }
    }

    fn storage_picks(&self) -> &'a [CandidateOption<StorageSpec>] {
        let count = self.pools.storage.len().min(STORAGE_PICKS);
        &self.pools.storage[..count]
    }

    fn evaluate(&self, combo: &Combination, abort: &AtomicBool) -> Evaluation {
        if abort.load(AtomicOrdering::Relaxed) {
            return Evaluation::Aborted;
        }

        let pools = self.pools;
        let cpu = &pools.cpus[combo.cpu];
        let board = &pools.motherboards[combo.motherboard];
        let gpu = &pools.gpus[combo.gpu];
        let ram = &pools.rams[combo.ram];
        let storage = self.storage_picks();

        let required = required_wattage(&cpu.spec, &gpu.spec);
        let Some(psu_idx) = pick_psu(&pools.psus, required) else {
            return Evaluation::Incompatible;
        };
        let Some(case_idx) = pick_case(&pools.cases, &gpu.spec) else {
            return Evaluation::Incompatible;
        };
        let psu = &pools.psus[psu_idx];
        let case = &pools.cases[case_idx];
        let cooler_idx = pick_cooler(&pools.coolers, &case.spec, &cpu.spec);
        let cooler = cooler_idx.map(|idx| &pools.coolers[idx]);

        let mut total = cpu.price() + board.price() + gpu.price() + ram.price();
        total += psu.price() + case.price();
        total += cooler.map(|c| c.price()).unwrap_or(Decimal::ZERO);
        total += storage.iter().map(|drive| drive.price()).sum::<Decimal>();
        if total > self.budget {
            return Evaluation::OverBudget;
        }

        let resolved = ResolvedBuild {
            cpu: Some(cpu.spec.clone()),
            motherboard: Some(board.spec.clone()),
            ram: Some(ram.spec.clone()),
            gpu: Some(gpu.spec.clone()),
            psu: Some(psu.spec.clone()),
            case: Some(case.spec.clone()),
            cooler: cooler.map(|c| c.spec.clone()),
            storage: storage.iter().map(|drive| drive.spec.clone()).collect(),
        };
        if check(&resolved).iter().any(|issue| issue.is_error()) {
            return Evaluation::Incompatible;
        }

        Evaluation::Feasible(Pick {
            combo: *combo,
            psu: psu_idx,
            case: case_idx,
            cooler: cooler_idx,
            total,
            required_wattage: required,
            score: self.composite_score(cpu, gpu, ram, storage),
        })
    }

    fn composite_score(
        &self,
        cpu: &CandidateOption<CpuSpec>,
        gpu: &CandidateOption<GpuSpec>,
        ram: &CandidateOption<RamSpec>,
        storage: &[CandidateOption<StorageSpec>],
    ) -> f64 {
        let storage_score: f64 = storage.iter().map(|drive| drive.score).sum();
        cpu.score * self.weights.get(ComponentCategory::Cpu)
            + gpu.score * self.weights.get(ComponentCategory::Gpu)
            + ram.score * self.weights.get(ComponentCategory::Ram)
            + storage_score * self.weights.get(ComponentCategory::Storage)
    }

    fn materialize(&self, pick: &Pick) -> ChosenBuild {
        let pools = self.pools;
        ChosenBuild {
            cpu: pools.cpus[pick.combo.cpu].clone(),
            motherboard: pools.motherboards[pick.combo.motherboard].clone(),
            ram: pools.rams[pick.combo.ram].clone(),
            gpu: pools.gpus[pick.combo.gpu].clone(),
            psu: pools.psus[pick.psu].clone(),
            case: pools.cases[pick.case].clone(),
            cooler: pick.cooler.map(|idx| pools.coolers[idx].clone()),
            storage: self.storage_picks().to_vec(),
            total: pick.total,
            required_wattage: pick.required_wattage,
            score: pick.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::weights::resolve_weights;
    use crate::domain::model::{CatalogItem, StorageKind};

    fn option<T>(product_id: i64, price: i64, spec: T, score: f64) -> CandidateOption<T> {
        CandidateOption {
            item: CatalogItem {
                product_id,
                price: Decimal::from(price),
                stock: 5,
                component_tag: String::new(),
            },
            component_id: product_id,
            spec,
            score,
        }
    }

    fn cpu(id: i64, socket: &str, price: i64, score: f64) -> CandidateOption<CpuSpec> {
        option(
            id,
            price,
            CpuSpec {
                socket: socket.to_string(),
                tdp_watts: 65,
                perf_score: score * price as f64,
            },
            score,
        )
    }

    fn board(id: i64, socket: &str, price: i64) -> CandidateOption<MotherboardSpec> {
        option(
            id,
            price,
            MotherboardSpec {
                socket: socket.to_string(),
                ram_type: "DDR5".to_string(),
                ram_max_freq: 6000,
                m2_slots: 2,
                pcie_slots: 2,
                form_factor: "ATX".to_string(),
            },
            1.0,
        )
    }

    fn gpu(id: i64, length: u32, price: i64, score: f64) -> CandidateOption<GpuSpec> {
        option(
            id,
            price,
            GpuSpec {
                length_mm: length,
                slots: 2,
                tdp_watts: 200,
                perf_score: score * price as f64,
            },
            score,
        )
    }

    fn ram(id: i64, price: i64, score: f64) -> CandidateOption<RamSpec> {
        option(
            id,
            price,
            RamSpec {
                ram_type: "DDR5".to_string(),
                freq_mhz: 5600,
                perf_score: score * price as f64,
            },
            score,
        )
    }

    fn psu(id: i64, wattage: u32, price: i64) -> CandidateOption<PsuSpec> {
        option(
            id,
            price,
            PsuSpec {
                wattage,
                form_factor: "ATX".to_string(),
            },
            1.0,
        )
    }

    fn case(id: i64, gpu_max: u32, price: i64) -> CandidateOption<CaseSpec> {
        option(
            id,
            price,
            CaseSpec {
                gpu_max_length_mm: gpu_max,
                cooler_max_height_mm: 160,
                psu_form_factor: "ATX".to_string(),
            },
            1.0,
        )
    }

    fn cooler(id: i64, height: u32, sockets: &[&str]) -> CandidateOption<CoolerSpec> {
        option(
            id,
            40,
            CoolerSpec {
                height_mm: height,
                supported_sockets: sockets.iter().map(|s| s.to_string()).collect(),
            },
            1.0,
        )
    }

    fn drive(id: i64, price: i64, score: f64) -> CandidateOption<StorageSpec> {
        option(
            id,
            price,
            StorageSpec {
                kind: StorageKind::Nvme,
                perf_score: score * price as f64,
            },
            score,
        )
    }

    fn base_pools() -> CandidatePools {
        CandidatePools {
            cpus: vec![cpu(1, "AM5", 300, 2.0)],
            motherboards: vec![board(10, "AM5", 150)],
            rams: vec![ram(20, 100, 1.0)],
            gpus: vec![gpu(30, 300, 500, 3.0)],
            psus: vec![psu(40, 750, 90)],
            cases: vec![case(50, 340, 80)],
            coolers: vec![cooler(60, 150, &["AM5"])],
            storage: vec![drive(70, 100, 1.5)],
        }
    }

    #[test]
    fn test_combinations_pair_cpus_with_matching_boards() {
        let mut pools = base_pools();
        pools.cpus.push(cpu(2, "LGA1700", 280, 1.8));
        pools.motherboards.push(board(11, "LGA1700", 140));
        pools.motherboards.push(board(12, "AM5", 200));
        pools.rams.push(ram(21, 90, 0.9));

        let combos = combinations(&pools);
        // AM5 cpu: 2 boards x 1 gpu x 2 ram, LGA cpu: 1 board x 1 gpu x 2 ram
        assert_eq!(combos.len(), 6);
        assert!(combos.iter().enumerate().all(|(idx, c)| c.ordinal == idx));
        for combo in &combos {
            assert_eq!(
                pools.cpus[combo.cpu].spec.socket,
                pools.motherboards[combo.motherboard].spec.socket
            );
        }
    }

    #[test]
    fn test_pick_psu_prefers_cheapest_adequate() {
        let psus = vec![psu(1, 1000, 200), psu(2, 750, 90), psu(3, 650, 60)];
        assert_eq!(pick_psu(&psus, 700), Some(1));
    }

    #[test]
    fn test_pick_psu_falls_back_to_nearest_wattage() {
        let psus = vec![psu(1, 450, 40), psu(2, 600, 60), psu(3, 550, 50)];
        assert_eq!(pick_psu(&psus, 700), Some(1));
        assert_eq!(pick_psu(&[], 700), None);
    }

    #[test]
    fn test_pick_case_and_cooler_are_first_fit() {
        let cases = vec![case(1, 280, 50), case(2, 320, 60), case(3, 400, 90)];
        let long_gpu = gpu(9, 310, 400, 1.0);
        assert_eq!(pick_case(&cases, &long_gpu.spec), Some(1));
        let huge_gpu = gpu(9, 500, 400, 1.0);
        assert_eq!(pick_case(&cases, &huge_gpu.spec), Some(0));

        let coolers = vec![
            cooler(1, 170, &[]),
            cooler(2, 150, &["LGA1700"]),
            cooler(3, 150, &[]),
        ];
        let am5 = cpu(1, "AM5", 300, 1.0);
        assert_eq!(pick_cooler(&coolers, &cases[0].spec, &am5.spec), Some(2));
        assert_eq!(pick_cooler(&[], &cases[0].spec, &am5.spec), None);
    }

    #[test]
    fn test_search_finds_single_feasible_build() {
        let pools = base_pools();
        let weights = resolve_weights::<&str>(&[]);
        let outcome =
            BuildSearch::new(&pools, &weights, Decimal::from(2000)).run(&AtomicBool::new(false));

        let best = outcome.best.expect("a build fits");
        assert_eq!(best.total, Decimal::from(1360));
        assert_eq!(best.required_wattage, 473);
        assert_eq!(best.parts().get("storage1"), Some(&70));
        assert_eq!(best.parts().get("cooler"), Some(&60));
        assert_eq!(best.score, 2.0 * 4.0 + 3.0 * 5.0 + 1.0 * 2.0 + 1.5 * 2.0);
    }

    #[test]
    fn test_search_respects_budget() {
        let pools = base_pools();
        let weights = resolve_weights::<&str>(&[]);
        let outcome =
            BuildSearch::new(&pools, &weights, Decimal::from(1359)).run(&AtomicBool::new(false));
        assert!(outcome.best.is_none());
        assert_eq!(outcome.over_budget, 1);
    }

    #[test]
    fn test_equal_scores_resolve_to_first_in_order() {
        let mut pools = base_pools();
        pools.gpus = vec![gpu(30, 300, 500, 3.0), gpu(31, 300, 500, 3.0)];
        pools.rams = vec![ram(20, 100, 1.0), ram(21, 100, 1.0), ram(22, 100, 1.0)];
        let weights = resolve_weights::<&str>(&[]);

        for _ in 0..10 {
            let outcome = BuildSearch::new(&pools, &weights, Decimal::from(5000))
                .run(&AtomicBool::new(false));
            let best = outcome.best.expect("a build fits");
            assert_eq!(best.gpu.product_id(), 30);
            assert_eq!(best.ram.product_id(), 20);
        }
    }

    #[test]
    fn test_incompatible_combinations_are_skipped() {
        let mut pools = base_pools();
        // only case is too short and the fallback keeps it, so every build fails GPU_TOO_LONG
        pools.cases = vec![case(50, 250, 80)];
        let weights = resolve_weights::<&str>(&[]);
        let outcome =
            BuildSearch::new(&pools, &weights, Decimal::from(5000)).run(&AtomicBool::new(false));
        assert!(outcome.best.is_none());
        assert_eq!(outcome.incompatible, 1);
    }

    #[test]
    fn test_abort_flag_stops_search() {
        let pools = base_pools();
        let weights = resolve_weights::<&str>(&[]);
        let outcome =
            BuildSearch::new(&pools, &weights, Decimal::from(5000)).run(&AtomicBool::new(true));
        assert!(outcome.aborted);
        assert!(outcome.best.is_none());
    }
}
