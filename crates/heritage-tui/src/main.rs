mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::sync::Arc;

use anyhow::Context;
use heritage_core::{platform, Catalog, Config, Session, TokioScheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = platform::log_path();

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG overrides; default to debug for our own crates.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("heritage log: {}", log_path.display());

    tracing::info!("heritage starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {:#}", e);
        Config::default()
    });

    // ── Catalog ──────────────────────────────────────────────────────────────
    let catalog = match &config.catalog.path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => Catalog::bundled().context("bundled catalog")?,
    };
    tracing::info!(
        "catalog: {} items, {} slides",
        catalog.len(),
        catalog.slides().len()
    );

    // ── Session wired to tokio timers ────────────────────────────────────────
    let (scheduler, timer_rx) = TokioScheduler::channel();
    let session = Session::with_synthetic(Arc::new(catalog), &config, Arc::new(scheduler));

    // ── Run TUI ──────────────────────────────────────────────────────────────
    app::App::new(session).run(timer_rx).await
}
