use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type ProductId = i64;
pub type ComponentId = i64;

/// The eight fixed part slots of a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentCategory {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Psu,
    Case,
    Cooler,
    Storage,
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 8] = [
        ComponentCategory::Cpu,
        ComponentCategory::Motherboard,
        ComponentCategory::Ram,
        ComponentCategory::Gpu,
        ComponentCategory::Psu,
        ComponentCategory::Case,
        ComponentCategory::Cooler,
        ComponentCategory::Storage,
    ];

    /// Key used in the `parts` map of an auto-build response.
    pub fn key(self) -> &'static str {
        match self {
            ComponentCategory::Cpu => "cpu",
            ComponentCategory::Motherboard => "motherboard",
            ComponentCategory::Ram => "ram",
            ComponentCategory::Gpu => "gpu",
            ComponentCategory::Psu => "psu",
            ComponentCategory::Case => "case",
            ComponentCategory::Cooler => "cooler",
            ComponentCategory::Storage => "storage",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ComponentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ComponentCategory::ALL
            .into_iter()
            .find(|category| category.key() == normalized)
            .ok_or_else(|| format!("unknown component category: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuSpec {
    pub socket: String,
    pub tdp_watts: u32,
    pub perf_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotherboardSpec {
    pub socket: String,
    pub ram_type: String,
    pub ram_max_freq: u32,
    pub m2_slots: u32,
    pub pcie_slots: u32,
    pub form_factor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RamSpec {
    pub ram_type: String,
    pub freq_mhz: u32,
    pub perf_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSpec {
    pub length_mm: u32,
    pub slots: u32,
    pub tdp_watts: u32,
    pub perf_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsuSpec {
    pub wattage: u32,
    pub form_factor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSpec {
    pub gpu_max_length_mm: u32,
    pub cooler_max_height_mm: u32,
    pub psu_form_factor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoolerSpec {
    pub height_mm: u32,
    /// Empty means the cooler fits any socket.
    #[serde(default, deserialize_with = "lenient_socket_list")]
    pub supported_sockets: Vec<String>,
}

impl CoolerSpec {
    pub fn supports(&self, socket: &str) -> bool {
        self.supported_sockets.is_empty() || self.supported_sockets.iter().any(|s| s == socket)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    #[serde(rename = "NVMe", alias = "nvme", alias = "NVME")]
    Nvme,
    #[serde(rename = "SATA", alias = "sata")]
    Sata,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSpec {
    pub kind: StorageKind,
    pub perf_score: f64,
}

/// Accepts a JSON array of sockets or a comma separated string. Anything else
/// decodes as an empty list.
fn lenient_socket_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let sockets = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect(),
        serde_json::Value::String(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    Ok(sockets)
}

/// Per-category fact sheet of a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum ComponentRecord {
    Cpu(CpuSpec),
    Motherboard(MotherboardSpec),
    Ram(RamSpec),
    Gpu(GpuSpec),
    Psu(PsuSpec),
    Case(CaseSpec),
    Cooler(CoolerSpec),
    Storage(StorageSpec),
}

impl ComponentRecord {
    pub fn category(&self) -> ComponentCategory {
        match self {
            ComponentRecord::Cpu(_) => ComponentCategory::Cpu,
            ComponentRecord::Motherboard(_) => ComponentCategory::Motherboard,
            ComponentRecord::Ram(_) => ComponentCategory::Ram,
            ComponentRecord::Gpu(_) => ComponentCategory::Gpu,
            ComponentRecord::Psu(_) => ComponentCategory::Psu,
            ComponentRecord::Case(_) => ComponentCategory::Case,
            ComponentRecord::Cooler(_) => ComponentCategory::Cooler,
            ComponentRecord::Storage(_) => ComponentCategory::Storage,
        }
    }

    /// Performance rating used for ranking. Parts without one rank on price alone.
    pub fn perf_score(&self) -> f64 {
        match self {
            ComponentRecord::Cpu(cpu) => cpu.perf_score,
            ComponentRecord::Ram(ram) => ram.perf_score,
            ComponentRecord::Gpu(gpu) => gpu.perf_score,
            ComponentRecord::Storage(storage) => storage.perf_score,
            ComponentRecord::Motherboard(_)
            | ComponentRecord::Psu(_)
            | ComponentRecord::Case(_)
            | ComponentRecord::Cooler(_) => 1.0,
        }
    }
}

/// Typed form of the component tag embedded in a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentTag {
    pub category: ComponentCategory,
    pub component_id: ComponentId,
}

#[derive(Deserialize)]
struct RawComponentTag {
    #[serde(alias = "componentType", alias = "component_type", alias = "type")]
    category: String,
    #[serde(alias = "componentId", alias = "component_id", alias = "id")]
    component_id: ComponentId,
}

impl ComponentTag {
    /// Parses the raw attribute blob, e.g. `{"componentType":"CPU","componentId":7}`.
    pub fn parse(raw: &str) -> Option<Self> {
        let tag: RawComponentTag = serde_json::from_str(raw).ok()?;
        let category = tag.category.parse().ok()?;
        Some(Self {
            category,
            component_id: tag.component_id,
        })
    }
}

/// A sellable catalog unit, read-only snapshot data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub product_id: ProductId,
    pub price: Decimal,
    pub stock: i64,
    /// Raw attribute blob naming the category and component id.
    pub component_tag: String,
}

/// A catalog item resolved to its component facts, ranked by score.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOption<T = ComponentRecord> {
    pub item: CatalogItem,
    pub component_id: ComponentId,
    pub spec: T,
    pub score: f64,
}

impl<T> CandidateOption<T> {
    pub fn product_id(&self) -> ProductId {
        self.item.product_id
    }

    pub fn price(&self) -> Decimal {
        self.item.price
    }
}

/// One optional component id per category plus any number of storage ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildSelection {
    pub cpu: Option<ComponentId>,
    pub motherboard: Option<ComponentId>,
    pub ram: Option<ComponentId>,
    pub gpu: Option<ComponentId>,
    pub psu: Option<ComponentId>,
    pub case: Option<ComponentId>,
    pub cooler: Option<ComponentId>,
    pub storage: Vec<ComponentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    CpuSocketMismatch,
    RamTypeMismatch,
    RamFreqTooHigh,
    GpuTooLong,
    CoolerTooTall,
    PsuTooWeak,
    PsuFormfactorMismatch,
    M2SlotsExceeded,
    PcieSlotsExceeded,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::CpuSocketMismatch => "CPU_SOCKET_MISMATCH",
            IssueCode::RamTypeMismatch => "RAM_TYPE_MISMATCH",
            IssueCode::RamFreqTooHigh => "RAM_FREQ_TOO_HIGH",
            IssueCode::GpuTooLong => "GPU_TOO_LONG",
            IssueCode::CoolerTooTall => "COOLER_TOO_TALL",
            IssueCode::PsuTooWeak => "PSU_TOO_WEAK",
            IssueCode::PsuFormfactorMismatch => "PSU_FORMFACTOR_MISMATCH",
            IssueCode::M2SlotsExceeded => "M2_SLOTS_EXCEEDED",
            IssueCode::PcieSlotsExceeded => "PCIE_SLOTS_EXCEEDED",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub code: IssueCode,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == IssueLevel::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_compatible: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            is_compatible: !issues.iter().any(ValidationIssue::is_error),
            issues,
        }
    }
}

/// CPU platform filter, matched by socket prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Intel,
    Amd,
}

impl Platform {
    /// `"intel"` selects LGA sockets; any other value, or none, selects AM sockets.
    pub fn from_filter(filter: Option<&str>) -> Self {
        match filter.map(str::trim) {
            Some(filter) if filter.eq_ignore_ascii_case("intel") => Platform::Intel,
            _ => Platform::Amd,
        }
    }

    pub fn socket_prefix(self) -> &'static str {
        match self {
            Platform::Intel => "LGA",
            Platform::Amd => "AM",
        }
    }

    pub fn matches(self, socket: &str) -> bool {
        socket.starts_with(self.socket_prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoBuildRequest {
    pub budget: i64,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: String,
    pub avg_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChart {
    pub part_type: String,
    pub series: Vec<PricePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoBuildResult {
    pub selection: BuildSelection,
    pub parts: BTreeMap<String, ProductId>,
    pub total: Decimal,
    pub required_psu_wattage: u32,
    pub composite_score: f64,
    pub rationale: Vec<String>,
    pub price_charts: Vec<PriceChart>,
}
