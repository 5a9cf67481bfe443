use clap::Parser;
use onepager::core::Storage;
use onepager::utils::{logger, validation::Validate};
use onepager::{
    CliConfig, GenerationMode, GenerationRequest, GeneratorSettings, LocalStorage, OnePagerEngine,
    StorageDirectory,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting onepager CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let mode = GenerationMode::from_external_flag(config.external);
    let request = match GenerationRequest::new(config.employee_ids.clone(), mode) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    // 範本路徑相對於執行目錄，資料則位於 data_dir
    let data = StorageDirectory::new(LocalStorage::new(config.data_dir.clone()), "");
    let templates = StorageDirectory::new(LocalStorage::new(".".to_string()), config.template.clone());
    let settings = GeneratorSettings::from_provider(&config);
    let engine = OnePagerEngine::new(data.clone(), data, templates, settings);

    match engine.generate(&request).await {
        Ok(result) => {
            let output = LocalStorage::new(config.output_path.clone());
            output.write_file(&result.filename, &result.bytes).await?;

            tracing::info!("✅ Generation completed successfully!");
            tracing::info!(
                "📁 Output saved to: {}/{} ({})",
                config.output_path,
                result.filename,
                result.content_type
            );
            println!("✅ {} one-pager(s) generated", result.document_count);
            println!("📁 Output saved to: {}/{}", config.output_path, result.filename);
        }
        Err(e) => {
            tracing::error!(
                "❌ Generation failed: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
