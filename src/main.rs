//! linkdeck - link-in-bio page for the terminal, with static HTML export.
//! Loads a links.json configuration (local file or URL), renders it as a
//! themed keyboard-navigable page, and reloads it on change while serving
//! from a development source.

mod app;
mod config;
mod loader;
mod page;
mod poller;

use std::fs::OpenOptions;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::error;

use app::{App, AppEvent};
use loader::ConfigSource;
use poller::Poller;

fn cli() -> Command {
    Command::new("linkdeck")
        .version("0.1.1")
        .about("Link-in-bio page for the terminal, with static HTML export")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH_OR_URL")
                .help("Links configuration to load")
                .default_value(loader::DEFAULT_CONFIG),
        )
        .arg(
            Arg::new("export")
                .long("export")
                .value_name("FILE")
                .help("Render the HTML page to FILE and exit"),
        )
        .arg(
            Arg::new("template")
                .long("template")
                .value_name("FILE")
                .help("Custom HTML template for --export"),
        )
        .arg(
            Arg::new("no-watch")
                .long("no-watch")
                .action(ArgAction::SetTrue)
                .help("Disable the development configuration watcher"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("Log destination while the terminal is in use")
                .default_value("linkdeck.log"),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let source = ConfigSource::parse(matches.get_one::<String>("config").unwrap()); // Safe due to default
    let client = Client::new();

    if let Some(out) = matches.get_one::<String>("export") {
        tracing_subscriber::fmt().with_writer(std::io::stderr).init();
        return export(&client, &source, matches.get_one::<String>("template"), out).await;
    }

    init_log_file(matches.get_one::<String>("log-file").unwrap())?; // Safe due to default

    let mut app = App::new();
    match loader::load(&client, &source).await {
        Ok(config) => app.apply_event(AppEvent::Loaded(config)),
        Err(err) => {
            error!("Error loading links: {err:#}");
            app.apply_event(AppEvent::LoadFailed);
        }
    }

    let (reload_tx, mut reload_rx) = mpsc::unbounded_channel::<()>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    // Reload driver: loads run here so a slow fetch never stalls the input
    // loop. Outcomes apply in completion order; there is no guard against a
    // manual reload racing a poll-triggered one (last write wins).
    let driver_client = client.clone();
    let driver_source = source.clone();
    tokio::spawn(async move {
        while reload_rx.recv().await.is_some() {
            let event = match loader::load(&driver_client, &driver_source).await {
                Ok(config) => AppEvent::Loaded(config),
                Err(err) => {
                    error!("Error loading links: {err:#}");
                    AppEvent::LoadFailed
                }
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
    });

    if source.is_dev() && !matches.get_flag("no-watch") {
        tokio::spawn(Poller::new(source.clone(), client.clone()).run(reload_tx.clone()));
    }

    tokio::task::block_in_place(|| app.run(&mut event_rx, &reload_tx))
}

/// Renders the page once and writes it to `out`. A failed load still writes
/// the page, carrying the fixed error card in the container.
async fn export(
    client: &Client,
    source: &ConfigSource,
    template: Option<&String>,
    out: &str,
) -> Result<()> {
    let template = match template {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template {path}"))?,
        None => page::DEFAULT_TEMPLATE.to_string(),
    };
    let html = match loader::load(client, source).await {
        Ok(config) => page::render_page(&config, &template),
        Err(err) => {
            error!("Error loading links: {err:#}");
            page::render_error_page(&template)
        }
    };
    std::fs::write(out, html).with_context(|| format!("Failed to write {out}"))?;
    println!("Wrote {out} from {source}");
    Ok(())
}

/// Routes tracing to a file: the preview owns the terminal, and stray
/// output would corrupt the alternate screen.
fn init_log_file(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(file)
        .with_ansi(false)
        .init();
    Ok(())
}
