//! # StackUI - scenario driver
//!
//! Runs a window-operation script against a `WindowManager` whose loads are
//! served from the configured window catalog, and prints the resulting
//! state. Useful for checking navigation flows without a host application.

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use stackui::scenario::Scenario;
use stackui::window::ManagerSnapshot;
use stackui::{CatalogLoader, StackUiConfig, WindowManager};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "stackui")]
#[command(about = "Drive a UI window lifecycle manager from a scenario script")]
#[command(version)]
struct Cli {
    /// Scenario script to run
    scenario: String,

    /// Path to configuration file
    #[arg(short, long, default_value = "~/.config/stackui/stackui.toml")]
    config: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print snapshots as JSON
    #[arg(long)]
    json: bool,

    /// Simulated load latency in milliseconds
    #[arg(long, default_value_t = 10)]
    latency_ms: u64,

    /// How long to wait for outstanding loads after the last step
    #[arg(long, default_value_t = 2000)]
    settle_ms: u64,
}

fn print_snapshot(snapshot: &ManagerSnapshot, json: bool) {
    if json {
        match serde_json::to_string_pretty(snapshot) {
            Ok(text) => println!("{}", text),
            Err(e) => error!("Failed to serialize snapshot: {}", e),
        }
        return;
    }

    let stack: Vec<&str> = snapshot.stack.iter().map(|id| id.as_str()).collect();
    println!("stack: [{}]", stack.join(", "));
    for window in &snapshot.windows {
        println!(
            "  {:<16} {:<6} order={:<5} {}{}",
            window.id().as_str(),
            format!("{:?}", window.kind()).to_lowercase(),
            window.render_order(),
            if window.is_visible() { "visible" } else { "hidden" },
            window
                .parent()
                .map(|p| format!(" parent={}", p))
                .unwrap_or_default(),
        );
    }
    if !snapshot.loading.is_empty() {
        let loading: Vec<&str> = snapshot.loading.iter().map(|id| id.as_str()).collect();
        println!("  loading: {}", loading.join(", "));
    }
    println!("  input: {}", if snapshot.touch_enabled { "on" } else { "off" });
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    info!("Starting StackUI scenario driver");
    info!("Version: {}", stackui::VERSION);

    // Load configuration
    let config = match StackUiConfig::load(&cli.config) {
        Ok(config) => {
            info!("Configuration loaded from: {}", cli.config);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            info!("Using default configuration");
            StackUiConfig::default()
        }
    };

    let scenario = Scenario::load(&cli.scenario)?;
    info!("Scenario {} has {} step(s)", cli.scenario, scenario.steps().len());

    let mut manager = WindowManager::new(&config)?;
    manager.set_loader(CatalogLoader::new(
        config.windows.clone(),
        Duration::from_millis(cli.latency_ms),
    ));

    let json = cli.json;
    let settled = scenario
        .run(&mut manager, Duration::from_millis(cli.settle_ms), |snapshot| {
            print_snapshot(snapshot, json)
        })
        .await;

    if !settled {
        error!("Scenario finished with loads still pending");
    }

    print_snapshot(&manager.snapshot(), json);
    Ok(())
}
