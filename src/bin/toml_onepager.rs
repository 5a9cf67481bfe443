use clap::Parser;
use onepager::config::toml_config::SourceType;
use onepager::core::template::TemplateRenderer;
use onepager::core::{ConfigProvider, Storage, TemplateSource};
use onepager::utils::{logger, validation::Validate};
use onepager::{
    GenerationMode, GenerationRequest, GenerationResult, GeneratorSettings, HttpProfileSource,
    LocalStorage, OnePagerEngine, StorageDirectory, TomlConfig,
};

#[derive(Parser)]
#[command(name = "toml-onepager")]
#[command(about = "One-pager generator with TOML configuration support")]
struct Args {
    /// Employee ids, in bundle order
    #[arg(value_delimiter = ',')]
    employee_ids: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "onepager.toml")]
    config: String,

    /// Anonymize names and drop avatars
    #[arg(long)]
    external: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - validate config and template without rendering
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(2);
        }
    };

    logger::init_configured_logger(config.log_level(), config.json_logging(), args.verbose);
    tracing::info!("🚀 Starting TOML-based one-pager generator");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let settings = GeneratorSettings::from_provider(&config);
    let templates = StorageDirectory::new(LocalStorage::new(".".to_string()), config.template_path());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No documents will be rendered");
        perform_dry_run(&templates, &settings).await?;
        return Ok(());
    }

    let mode = GenerationMode::from_external_flag(args.external);
    let request = match GenerationRequest::new(args.employee_ids.clone(), mode) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let outcome = match config.source.r#type {
        SourceType::Local => {
            let base_path = config.source.base_path.clone().unwrap_or_default();
            let data = StorageDirectory::new(LocalStorage::new(base_path), "");
            let engine = OnePagerEngine::new(data.clone(), data, templates, settings);
            engine.generate(&request).await
        }
        SourceType::Http => {
            let endpoint = config.source.endpoint.clone().unwrap_or_default();
            let source = HttpProfileSource::with_options(
                endpoint,
                config.source.headers.as_ref(),
                config.source.timeout_seconds,
            )?
            .with_max_avatar_bytes(settings.max_avatar_bytes);
            let engine = OnePagerEngine::new(source.clone(), source, templates, settings);
            engine.generate(&request).await
        }
    };

    match outcome {
        Ok(result) => write_result(&config, &result).await?,
        Err(e) => {
            tracing::error!("❌ Generation failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

async fn write_result(config: &TomlConfig, result: &GenerationResult) -> anyhow::Result<()> {
    let output = LocalStorage::new(config.output_path().to_string());
    output.write_file(&result.filename, &result.bytes).await?;

    tracing::info!(
        "✅ {} one-pager(s) written to {}/{} ({})",
        result.document_count,
        config.output_path(),
        result.filename,
        result.content_type
    );
    println!("📁 Output saved to: {}/{}", config.output_path(), result.filename);
    Ok(())
}

async fn perform_dry_run<T: TemplateSource>(
    templates: &T,
    settings: &GeneratorSettings,
) -> anyhow::Result<()> {
    let bytes = templates.load_template().await?;
    let template = onepager::core::template::TemplateContainer::parse(&bytes)?;
    let renderer = TemplateRenderer::from_settings(settings);
    renderer.validate(&template)?;

    println!("📋 Template parts: {}", template.len());
    for part in renderer.slide_parts(&template) {
        println!("  📄 slide: {}", part.name);
    }
    match template.part(&settings.avatar_part) {
        Some(part) => println!("  🖼  avatar: {} ({} bytes)", part.name, part.data.len()),
        None => println!("  ⚠️  avatar part '{}' not found", settings.avatar_part),
    }
    println!("✅ Dry run completed");
    Ok(())
}
