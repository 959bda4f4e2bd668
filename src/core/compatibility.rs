//! Compatibility rules over a build selection.
//!
//! Every rule runs independently, so one selection can report several issues
//! at once. A rule whose inputs are missing (no id given, or the id does not
//! resolve) is skipped, which lets partially assembled builds be checked.

use crate::core::power::required_wattage;
use crate::domain::model::{
    BuildSelection, CaseSpec, ComponentCategory, ComponentId, ComponentRecord, CoolerSpec,
    CpuSpec, GpuSpec, IssueCode, MotherboardSpec, PsuSpec, RamSpec, StorageKind, StorageSpec,
    ValidationIssue, ValidationReport,
};
use crate::domain::ports::ComponentStore;

/// The selection with every referenced id resolved to its fact sheet.
#[derive(Debug, Clone, Default)]
pub struct ResolvedBuild {
    pub cpu: Option<CpuSpec>,
    pub motherboard: Option<MotherboardSpec>,
    pub ram: Option<RamSpec>,
    pub gpu: Option<GpuSpec>,
    pub psu: Option<PsuSpec>,
    pub case: Option<CaseSpec>,
    pub cooler: Option<CoolerSpec>,
    pub storage: Vec<StorageSpec>,
}

impl ResolvedBuild {
    pub fn resolve<S: ComponentStore + ?Sized>(selection: &BuildSelection, store: &S) -> Self {
        let fetch = |category: ComponentCategory, id: Option<ComponentId>| {
            id.and_then(|id| store.get(category, id))
        };

        Self {
            cpu: match fetch(ComponentCategory::Cpu, selection.cpu) {
                Some(ComponentRecord::Cpu(spec)) => Some(spec),
                _ => None,
            },
            motherboard: match fetch(ComponentCategory::Motherboard, selection.motherboard) {
                Some(ComponentRecord::Motherboard(spec)) => Some(spec),
                _ => None,
            },
            ram: match fetch(ComponentCategory::Ram, selection.ram) {
                Some(ComponentRecord::Ram(spec)) => Some(spec),
                _ => None,
            },
            gpu: match fetch(ComponentCategory::Gpu, selection.gpu) {
                Some(ComponentRecord::Gpu(spec)) => Some(spec),
                _ => None,
            },
            psu: match fetch(ComponentCategory::Psu, selection.psu) {
                Some(ComponentRecord::Psu(spec)) => Some(spec),
                _ => None,
            },
            case: match fetch(ComponentCategory::Case, selection.case) {
                Some(ComponentRecord::Case(spec)) => Some(spec),
                _ => None,
            },
            cooler: match fetch(ComponentCategory::Cooler, selection.cooler) {
                Some(ComponentRecord::Cooler(spec)) => Some(spec),
                _ => None,
            },
            storage: selection
                .storage
                .iter()
                .filter_map(|id| match store.get(ComponentCategory::Storage, *id) {
                    Some(ComponentRecord::Storage(spec)) => Some(spec),
                    _ => None,
                })
                .collect(),
        }
    }
}

/// Runs every rule against the selection and returns all issues found.
pub fn validate<S: ComponentStore + ?Sized>(
    selection: &BuildSelection,
    store: &S,
) -> Vec<ValidationIssue> {
    check(&ResolvedBuild::resolve(selection, store))
}

pub fn validate_report<S: ComponentStore + ?Sized>(
    selection: &BuildSelection,
    store: &S,
) -> ValidationReport {
    ValidationReport::from_issues(validate(selection, store))
}

pub fn check(build: &ResolvedBuild) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if let (Some(cpu), Some(board)) = (&build.cpu, &build.motherboard) {
        if cpu.socket != board.socket {
            issues.push(ValidationIssue::error(
                IssueCode::CpuSocketMismatch,
                format!(
                    "CPU socket {} does not match motherboard socket {}",
                    cpu.socket, board.socket
                ),
            ));
        }
    }

    if let (Some(ram), Some(board)) = (&build.ram, &build.motherboard) {
        if ram.ram_type != board.ram_type {
            issues.push(ValidationIssue::error(
                IssueCode::RamTypeMismatch,
                format!(
                    "RAM type {} is not supported by the motherboard ({})",
                    ram.ram_type, board.ram_type
                ),
            ));
        }
        if ram.freq_mhz > board.ram_max_freq {
            issues.push(ValidationIssue::warning(
                IssueCode::RamFreqTooHigh,
                format!(
                    "RAM runs at {} MHz but the motherboard supports up to {} MHz; it will be downclocked",
                    ram.freq_mhz, board.ram_max_freq
                ),
            ));
        }
    }

    if let (Some(gpu), Some(case)) = (&build.gpu, &build.case) {
        if gpu.length_mm > case.gpu_max_length_mm {
            issues.push(ValidationIssue::error(
                IssueCode::GpuTooLong,
                format!(
                    "GPU is {} mm long but the case fits at most {} mm",
                    gpu.length_mm, case.gpu_max_length_mm
                ),
            ));
        }
    }

    if let (Some(cooler), Some(case)) = (&build.cooler, &build.case) {
        if cooler.height_mm > case.cooler_max_height_mm {
            issues.push(ValidationIssue::error(
                IssueCode::CoolerTooTall,
                format!(
                    "Cooler is {} mm tall but the case fits at most {} mm",
                    cooler.height_mm, case.cooler_max_height_mm
                ),
            ));
        }
    }

    // An empty socket list counts as universal.
    if let (Some(cooler), Some(cpu)) = (&build.cooler, &build.cpu) {
        if !cooler.supports(&cpu.socket) {
            issues.push(ValidationIssue::error(
                IssueCode::CpuSocketMismatch,
                format!(
                    "Cooler supports {} but the CPU uses socket {}",
                    cooler.supported_sockets.join(", "),
                    cpu.socket
                ),
            ));
        }
    }

    if let (Some(psu), Some(cpu), Some(gpu)) = (&build.psu, &build.cpu, &build.gpu) {
        let required = required_wattage(cpu, gpu);
        if psu.wattage < required {
            issues.push(ValidationIssue::error(
                IssueCode::PsuTooWeak,
                format!(
                    "PSU provides {} W but the build needs at least {} W",
                    psu.wattage, required
                ),
            ));
        }
    }

    if let (Some(psu), Some(case)) = (&build.psu, &build.case) {
        if psu.form_factor != case.psu_form_factor {
            issues.push(ValidationIssue::error(
                IssueCode::PsuFormfactorMismatch,
                format!(
                    "PSU form factor {} does not fit the case ({})",
                    psu.form_factor, case.psu_form_factor
                ),
            ));
        }
    }

    if let Some(board) = &build.motherboard {
        let nvme_count = build
            .storage
            .iter()
            .filter(|drive| drive.kind == StorageKind::Nvme)
            .count();
        if nvme_count > board.m2_slots as usize {
            issues.push(ValidationIssue::error(
                IssueCode::M2SlotsExceeded,
                format!(
                    "{} NVMe drives selected but the motherboard has {} M.2 slots",
                    nvme_count, board.m2_slots
                ),
            ));
        }
    }

    if let (Some(gpu), Some(board)) = (&build.gpu, &build.motherboard) {
        if gpu.slots > board.pcie_slots {
            issues.push(ValidationIssue::error(
                IssueCode::PcieSlotsExceeded,
                format!(
                    "GPU occupies {} slots but the motherboard has {} PCIe slots",
                    gpu.slots, board.pcie_slots
                ),
            ));
        }
    }

    issues
}
