use clap::Parser;
use ieum::core::intent::EXAMPLE_QUERIES;
use ieum::utils::error::ErrorSeverity;
use ieum::utils::{logger, validation::Validate};
use ieum::{
    AppConfig, Aggregator, CliArgs, IntentClassifier, RealEstateClient, RecruitmentClient,
    RegionRegistry, Report, YouthPolicyClient,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting ieum CLI");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let registry = Arc::new(RegionRegistry::builtin());
    let classifier = IntentClassifier::new(Arc::clone(&registry));
    let intent = classifier.classify(&args.query).with_max_price(args.max_price);

    if !intent.is_searchable() {
        print_clarification(&registry);
        return Ok(());
    }

    let providers = &config.providers;
    let aggregator = Aggregator::new(
        Arc::clone(&registry),
        Arc::new(RecruitmentClient::new(&providers.recruitment)),
        Arc::new(RealEstateClient::new(&providers.realestate)),
        Arc::new(YouthPolicyClient::new(&providers.youth_policy)),
        config.aggregate_options(),
    );

    match aggregator.aggregate(&intent, args.region.as_deref()).await {
        Ok(aggregation) => {
            tracing::info!(
                "✅ {} jobs, {} properties, {} policies for {}",
                aggregation.jobs.len(),
                aggregation.properties.len(),
                aggregation.policies.len(),
                aggregation.region_name
            );
            let report = Report::new(&registry, &intent, &aggregation);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.render_text());
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Aggregation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 4, // unsupported region
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> ieum::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path.display());
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };

    if let Some(deal_ymd) = &args.deal_ymd {
        config.engine.deal_ymd = deal_ymd.clone();
    }

    config.validate()?;
    Ok(config)
}

fn print_clarification(registry: &RegionRegistry) {
    println!("🤔 무엇을 찾으시는지 알려주세요.");
    for (label, query, _) in EXAMPLE_QUERIES {
        println!("   {} 예: '{}'", label, query);
    }
    println!("📍 지원 지역: {}", registry.allowed_list());
}
