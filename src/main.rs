mod cli;

use radarr_relay::{
    arr::{RadarrClient, RadarrWebhook},
    config, notify, routing,
    server::{self, signature},
    unmanic::UnmanicClient,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::Read;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "radarr_relay=trace,radarr_relay_rules=trace,tower_http=debug".to_string()
        } else {
            "radarr_relay=debug,radarr_relay_rules=debug,tower_http=info".to_string()
        }
    });

    // Logs go to stderr so command output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Notify { data } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(notify_radarr(&data, cli.config.as_deref()))
        }
        Commands::Validate { file } => {
            let path = file.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::CheckRules { payload } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_rules(&payload, cli.config.as_deref()))
        }
        Commands::Version => {
            println!("radarr-relay {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::GenerateSecret => {
            println!("{}", signature::generate_secret());
            Ok(())
        }
    }
}

async fn start_server(host: Option<String>, port: Option<u16>, config_path: Option<&Path>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting radarr-relay");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

async fn notify_radarr(data: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let raw = if data == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read task results from stdin")?;
        buf
    } else {
        std::fs::read_to_string(data).with_context(|| format!("Failed to read {}", data))?
    };

    let results: notify::TaskResults =
        serde_json::from_str(&raw).context("Failed to parse task results")?;

    let radarr = RadarrClient::new(&config.radarr);
    let outcomes = notify::process_task_results(&results, &config, &radarr).await;

    for (file, outcome) in results.destination_files.iter().zip(&outcomes) {
        println!("{}: {:?}", file.display(), outcome);
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Radarr: {}", config.radarr.url);
            println!("  Unmanic: {}", config.unmanic.url);
            println!("  Notify mode: {}", config.notify.mode);
            println!("  Webhook enabled: {}", config.webhook.enabled);
            println!("  Rule slots: {}", config.webhook.rules.len());
            println!(
                "    Active: {}",
                config.webhook.rules.iter().filter(|r| r.is_active()).count()
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}

async fn check_rules(payload_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let raw = std::fs::read_to_string(payload_path)
        .with_context(|| format!("Failed to read payload: {:?}", payload_path))?;
    let payload: RadarrWebhook = serde_json::from_str(&raw).context("Invalid Radarr webhook payload")?;

    if !payload.is_download() {
        println!("Event type '{}' is not routed", payload.event_type);
        return Ok(());
    }

    let radarr = RadarrClient::new(&config.radarr);
    let unmanic = UnmanicClient::new(&config.unmanic);
    let matches = routing::plan(&payload, &config.webhook.rules, &radarr, &unmanic).await;

    if matches.is_empty() {
        println!("No rules matched");
        return Ok(());
    }

    for m in &matches {
        println!(
            "Rule {} -> library {}: {} (test: {}, create task: {})",
            m.slot_index,
            m.library_id,
            m.translated_path.display(),
            m.trigger_test,
            m.create_task
        );
    }
    println!("\n[DRY RUN] {} match(es), no tasks created", matches.len());

    Ok(())
}
