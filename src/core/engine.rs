use crate::core::catalog::{CandidatePools, CatalogExtractor, DEFAULT_BEAM_WIDTH};
use crate::core::compatibility::{validate, validate_report};
use crate::core::power::required_wattage;
use crate::core::search::{BuildSearch, ChosenBuild, SearchOutcome};
use crate::core::weights::{resolve_weights, ScoringWeights};
use crate::domain::model::{
    AutoBuildRequest, AutoBuildResult, BuildSelection, ComponentCategory, IssueLevel, Platform,
    PriceChart, ProductId, ValidationReport,
};
use crate::domain::ports::{Bucket, CatalogProvider, ComponentStore, PriceHistory};
use crate::utils::error::{BuildError, Result};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const PRICE_HISTORY_UNAVAILABLE: &str = "Price history data is temporarily unavailable.";

const REQUIRED_POOLS: [ComponentCategory; 6] = [
    ComponentCategory::Cpu,
    ComponentCategory::Motherboard,
    ComponentCategory::Ram,
    ComponentCategory::Gpu,
    ComponentCategory::Psu,
    ComponentCategory::Case,
];

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub beam_width: usize,
    pub build_timeout: Duration,
    pub price_history_timeout: Duration,
    pub price_window_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            build_timeout: Duration::from_secs(10),
            price_history_timeout: Duration::from_secs(2),
            price_window_days: 30,
        }
    }
}

pub struct BuildEngine<C: CatalogProvider, S: ComponentStore, P: PriceHistory> {
    catalog: C,
    store: S,
    price_history: P,
    settings: EngineSettings,
}

impl<C: CatalogProvider, S: ComponentStore, P: PriceHistory> BuildEngine<C, S, P> {
    pub fn new(catalog: C, store: S, price_history: P) -> Self {
        Self::with_settings(catalog, store, price_history, EngineSettings::default())
    }

    pub fn with_settings(catalog: C, store: S, price_history: P, settings: EngineSettings) -> Self {
        Self {
            catalog,
            store,
            price_history,
            settings,
        }
    }

    pub fn validate(&self, selection: &BuildSelection) -> ValidationReport {
        let report = validate_report(selection, &self.store);
        tracing::debug!(
            "Validated selection: compatible={}, {} issue(s)",
            report.is_compatible,
            report.issues.len()
        );
        report
    }

    /// Auto-build bounded by the configured build timeout.
    pub async fn auto_build_with_timeout(
        &self,
        request: &AutoBuildRequest,
    ) -> Result<AutoBuildResult> {
        self.auto_build(request, tokio::time::sleep(self.settings.build_timeout))
            .await
    }

    /// Runs the auto-build until it finishes or `cancel` resolves, whichever is first.
    pub async fn auto_build<F>(
        &self,
        request: &AutoBuildRequest,
        cancel: F,
    ) -> Result<AutoBuildResult>
    where
        F: Future<Output = ()>,
    {
        let abort = Arc::new(AtomicBool::new(false));

        tokio::select! {
            biased;
            () = cancel => {
                // 通知背景搜尋提早結束
                abort.store(true, Ordering::Relaxed);
                tracing::warn!("⏹️ Auto-build cancelled (budget {})", request.budget);
                Err(BuildError::Cancelled)
            }
            result = self.run(request, Arc::clone(&abort)) => result,
        }
    }

    async fn run(
        &self,
        request: &AutoBuildRequest,
        abort: Arc<AtomicBool>,
    ) -> Result<AutoBuildResult> {
        if request.budget <= 0 {
            return Err(BuildError::InvalidRequest {
                field: "budget".to_string(),
                reason: format!("must be greater than zero, got {}", request.budget),
            });
        }
        let budget = Decimal::from(request.budget);

        tracing::info!(
            "🔧 Auto-build: budget {}, priorities {:?}, platform {:?}",
            budget,
            request.priorities,
            request.platform
        );

        let items = self.catalog.catalog_items().await?;
        let (mut pools, stats) = CatalogExtractor::new(&self.store)
            .with_beam_width(self.settings.beam_width)
            .extract(&items);
        tracing::info!(
            "📦 Catalog: {} items, {} usable, {} dropped",
            stats.total,
            stats.kept,
            stats.malformed_tags + stats.unresolved
        );

        pools.retain_platform(Platform::from_filter(request.platform.as_deref()));
        ensure_required_pools(&pools, budget)?;

        let weights = resolve_weights(request.priorities.as_slice());
        let outcome = self.search(pools, weights.clone(), budget, abort).await?;

        let Some(chosen) = outcome.best else {
            return Err(BuildError::BuildNotPossible {
                budget,
                reason: format!(
                    "all {} combinations were rejected ({} over budget, {} incompatible)",
                    outcome.combinations, outcome.over_budget, outcome.incompatible
                ),
            });
        };

        Ok(self.assemble(chosen, &weights, budget).await)
    }

    async fn search(
        &self,
        pools: CandidatePools,
        weights: ScoringWeights,
        budget: Decimal,
        abort: Arc<AtomicBool>,
    ) -> Result<SearchOutcome> {
        tokio::task::spawn_blocking(move || BuildSearch::new(&pools, &weights, budget).run(&abort))
            .await
            .map_err(|e| BuildError::Internal {
                message: format!("search worker failed: {}", e),
            })
    }

    async fn assemble(
        &self,
        chosen: ChosenBuild,
        weights: &ScoringWeights,
        budget: Decimal,
    ) -> AutoBuildResult {
        let selection = chosen.selection();
        let required = required_wattage(&chosen.cpu.spec, &chosen.gpu.spec);

        let mut rationale = vec![
            format!("Total price: {} (budget {})", chosen.total, budget),
            format!("Composite score: {:.4}", chosen.score),
            format!(
                "Required PSU wattage: {} W (selected PSU provides {} W)",
                required, chosen.psu.spec.wattage
            ),
            format!("Applied weights: {}", weights),
        ];

        let targets = [
            (ComponentCategory::Cpu, chosen.cpu.product_id()),
            (ComponentCategory::Gpu, chosen.gpu.product_id()),
            (ComponentCategory::Ram, chosen.ram.product_id()),
        ];
        let (price_charts, complete) = self.fetch_price_charts(&targets).await;
        if !complete {
            rationale.push(PRICE_HISTORY_UNAVAILABLE.to_string());
        }

        // 最終確認：只附加提示，不改變結果
        for issue in validate(&selection, &self.store) {
            let label = match issue.level {
                IssueLevel::Error => "Error",
                IssueLevel::Warning => "Advisory",
            };
            rationale.push(format!("{} [{}]: {}", label, issue.code, issue.message));
        }

        tracing::info!(
            "✅ Auto-build winner: total {}, score {:.4}, {} W required",
            chosen.total,
            chosen.score,
            required
        );

        AutoBuildResult {
            parts: chosen.parts(),
            selection,
            total: chosen.total,
            required_psu_wattage: required,
            composite_score: chosen.score,
            rationale,
            price_charts,
        }
    }

    /// Fetches daily price series concurrently. The flag is false when any part failed.
    async fn fetch_price_charts(
        &self,
        targets: &[(ComponentCategory, ProductId)],
    ) -> (Vec<PriceChart>, bool) {
        let to = Utc::now().date_naive();
        let from = window_start(to, self.settings.price_window_days);
        let timeout = self.settings.price_history_timeout;

        let fetches = targets.iter().map(|(category, product_id)| async move {
            let fetch = self
                .price_history
                .series(*product_id, from, to, Bucket::Day);
            match tokio::time::timeout(timeout, fetch).await {
                Ok(Ok(series)) => Some(PriceChart {
                    part_type: category.key().to_string(),
                    series,
                }),
                Ok(Err(e)) => {
                    tracing::warn!(
                        "⚠️ Price history for {} ({}) failed: {}",
                        category,
                        product_id,
                        e
                    );
                    None
                }
                Err(_) => {
                    tracing::warn!(
                        "⚠️ Price history for {} ({}) timed out after {:?}",
                        category,
                        product_id,
                        timeout
                    );
                    None
                }
            }
        });

        let results = futures::future::join_all(fetches).await;
        let complete = results.iter().all(Option::is_some);
        (results.into_iter().flatten().collect(), complete)
    }
}

fn window_start(to: NaiveDate, days: u32) -> NaiveDate {
    to.checked_sub_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(to)
}

fn ensure_required_pools(pools: &CandidatePools, budget: Decimal) -> Result<()> {
    if let Some(empty) = REQUIRED_POOLS
        .into_iter()
        .find(|category| pools.len_of(*category) == 0)
    {
        tracing::warn!("No usable {} candidates in the catalog", empty);
        return Err(BuildError::BuildNotPossible {
            budget,
            reason: format!("no usable {} candidates available", empty),
        });
    }
    Ok(())
}
