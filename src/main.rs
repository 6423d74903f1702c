use clap::Parser;
use late_fees::core::ConfigProvider;
use late_fees::utils::{logger, validation::Validate};
use late_fees::{CliConfig, FeesPipeline, LocalStorage, ReportEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting late-fees CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    let print = config.print;
    let output = config.output_path().to_string();
    let storage = LocalStorage::new(config.base_path.clone());
    let engine = ReportEngine::new(FeesPipeline::new(storage.clone(), config));

    match engine.run().await {
        Ok(output_path) => {
            println!("Late fee report saved to: {}", output_path);
            if print {
                let data = storage_contents(&storage, &output).await?;
                print!("{}", data);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    }
}

async fn storage_contents(storage: &LocalStorage, path: &str) -> anyhow::Result<String> {
    use late_fees::core::Storage;

    let data = storage.read_file(path).await?;
    Ok(String::from_utf8(data)?)
}
