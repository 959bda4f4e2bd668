use crate::core::catalog::DEFAULT_BEAM_WIDTH;
use crate::core::engine::EngineSettings;
use crate::utils::error::{BuildError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_number, validate_range, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub price_history: PriceHistoryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    #[serde(default = "default_build_timeout_ms")]
    pub build_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub endpoint: Option<String>,
    #[serde(default = "default_price_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    #[serde(default = "default_components_path")]
    pub components_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
}

fn default_beam_width() -> usize {
    DEFAULT_BEAM_WIDTH
}

fn default_build_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_price_timeout_ms() -> u64 {
    2_000
}

fn default_window_days() -> u32 {
    30
}

fn default_catalog_path() -> String {
    "catalog.csv".to_string()
}

fn default_components_path() -> String {
    "components.json".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            beam_width: default_beam_width(),
            build_timeout_ms: default_build_timeout_ms(),
        }
    }
}

impl Default for PriceHistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            timeout_ms: default_price_timeout_ms(),
            window_days: default_window_days(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            components_path: default_components_path(),
        }
    }
}

impl EngineConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BuildError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BuildError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRICE_API})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| BuildError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Price history is used only when enabled and an endpoint is configured.
    pub fn price_history_endpoint(&self) -> Option<&str> {
        if !self.price_history.enabled {
            return None;
        }
        self.price_history.endpoint.as_deref()
    }

    pub fn log_level(&self) -> &str {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            beam_width: self.search.beam_width,
            build_timeout: Duration::from_millis(self.search.build_timeout_ms),
            price_history_timeout: Duration::from_millis(self.price_history.timeout_ms),
            price_window_days: self.price_history.window_days,
        }
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("search.beam_width", self.search.beam_width as u64, 1)?;
        validate_positive_number("search.build_timeout_ms", self.search.build_timeout_ms, 1)?;
        validate_positive_number("price_history.timeout_ms", self.price_history.timeout_ms, 1)?;
        validate_range("price_history.window_days", self.price_history.window_days, 1, 365)?;

        if let Some(endpoint) = &self.price_history.endpoint {
            validate_url("price_history.endpoint", endpoint)?;
        }

        validate_path("catalog.catalog_path", &self.catalog.catalog_path)?;
        validate_file_extension("catalog.catalog_path", &self.catalog.catalog_path, "csv")?;
        validate_path("catalog.components_path", &self.catalog.components_path)?;
        validate_file_extension(
            "catalog.components_path",
            &self.catalog.components_path,
            "json",
        )?;

        Ok(())
    }
}
