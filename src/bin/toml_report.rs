use clap::Parser;
use late_fees::core::ConfigProvider;
use late_fees::utils::{logger, validation::Validate};
use late_fees::{FeesPipeline, LocalStorage, ReportEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Late fee report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "late-fees.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the output order ("first_seen" or "patron_id")
    #[arg(long)]
    order: Option<String>,

    /// Validate the configuration and show what would run, without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config file '{}': {}", args.config, e);
            eprintln!("Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    if let Some(order) = args.order {
        tracing::info!("Output order overridden to: {}", order);
        config.output.order = Some(order);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("Dry run, no report written");
        return Ok(());
    }

    let storage = LocalStorage::new(config.base_path());
    let engine = ReportEngine::new(FeesPipeline::new(storage, config));

    match engine.run().await {
        Ok(output_path) => {
            println!("Late fee report saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("Report: {}", config.name());
    tracing::info!("  input:  {}/{}", config.base_path(), config.input_path());
    tracing::info!("  output: {}/{}", config.base_path(), config.output_path());
    tracing::info!(
        "  format: {:?}, order: {:?}",
        config.output_format(),
        config.report_order()
    );
}
