use clap::Parser;
use rig_builder::config::cli::Command;
use rig_builder::domain::ports::PriceHistory;
use rig_builder::utils::error::ErrorSeverity;
use rig_builder::utils::{logger, validation::Validate};
use rig_builder::{
    AutoBuildRequest, BuildEngine, BuildError, BuildSelection, CliConfig, CsvCatalog,
    EngineConfig, HttpPriceHistory, InMemoryComponentStore, UnavailablePriceHistory,
};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 載入 TOML 配置；檔案不存在時使用預設值
    let mut config = if Path::new(&cli.config).exists() {
        match EngineConfig::from_file(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        }
    } else {
        EngineConfig::default()
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level(), cli.verbose);
    } else {
        logger::init_cli_logger(config.log_level(), cli.verbose);
    }

    // 應用命令列覆蓋設定
    if let Some(catalog) = &cli.catalog {
        config.catalog.catalog_path = catalog.clone();
    }
    if let Some(components) = &cli.components {
        config.catalog.components_path = components.clone();
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::debug!("Engine config: {:?}", config);

    let store = InMemoryComponentStore::from_json_file(&config.catalog.components_path)?;
    let catalog = CsvCatalog::new(&config.catalog.catalog_path);
    let price_history: Box<dyn PriceHistory> = match config.price_history_endpoint() {
        Some(endpoint) => Box::new(HttpPriceHistory::new(
            endpoint,
            config.engine_settings().price_history_timeout,
        )?),
        None => {
            tracing::info!("Price history disabled; charts will be empty");
            Box::new(UnavailablePriceHistory)
        }
    };

    let engine =
        BuildEngine::with_settings(catalog, store, price_history, config.engine_settings());

    match cli.command {
        Command::Validate(args) => {
            let selection = BuildSelection::from(args);
            let report = engine.validate(&selection);
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_compatible {
                std::process::exit(1);
            }
        }
        Command::AutoBuild(args) => {
            let request = AutoBuildRequest::from(args);
            match engine.auto_build_with_timeout(&request).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => exit_with(e),
            }
        }
    }

    Ok(())
}

fn exit_with(e: BuildError) -> ! {
    tracing::error!(
        "❌ Auto-build failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
