mod chart;
mod client;
mod controller;
mod errors;
mod model;
mod range;
mod series;
mod validate;

use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Telemetry viewer: fetches temperature/humidity readings for a device over
/// a time range and renders them as a two-series line chart.
#[derive(Debug, Parser)]
#[command(name = "viewer")]
struct Args {
    /// Device to display readings for.
    #[arg(long, env = "DEVICE_ID")]
    device: Option<String>,

    /// Range start as minute-precision UTC (YYYY-MM-DDTHH:MM).
    /// Defaults to 30 days before now.
    #[arg(long)]
    start: Option<String>,

    /// Range end as minute-precision UTC (YYYY-MM-DDTHH:MM). Defaults to now.
    #[arg(long)]
    end: Option<String>,

    /// Output path for the chart HTML document.
    #[arg(long, default_value = "chart.html")]
    out: PathBuf,

    /// Re-fetch and re-render every N seconds until interrupted.
    #[arg(long)]
    watch: Option<u64>,

    /// With --watch: re-prefill the range to the default trailing 30 days
    /// on every refresh instead of keeping the initial bounds.
    #[arg(long, requires = "watch")]
    follow: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    // Endpoint and key are injected, never compiled in.
    let api_url = match env::var("API_URL") {
        Ok(url) => url,
        Err(_) => {
            error!("API_URL must be set");
            std::process::exit(1);
        }
    };
    let api_key = match env::var("API_KEY") {
        Ok(key) => key,
        Err(_) => {
            error!("API_KEY must be set");
            std::process::exit(1);
        }
    };

    let device = args.device.unwrap_or_default();

    info!("Starting telemetry viewer");
    info!("API endpoint: {}", api_url);
    info!("Device: {}", device);

    let (default_start, default_end) = range::default_inputs(chrono::Utc::now());
    let start = args.start.unwrap_or(default_start);
    let end = args.end.unwrap_or(default_end);
    info!("Range: {} .. {} UTC", start, end);

    let client = client::ApiClient::new(api_url, api_key);
    let chart = chart::ChartView::new(args.out);
    let mut viewer = controller::Viewer::new(client, chart);
    viewer.set_device(device);
    viewer.set_inputs(start, end);

    match args.watch {
        None => {
            if let Err(e) = viewer.load_once().await {
                error!("Error fetching data: {}", e);
                std::process::exit(1);
            }
        }
        Some(secs) => {
            let follow = args.follow;
            let (tx, rx) = mpsc::channel(16);
            let ticker = tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(secs.max(1)));
                loop {
                    interval.tick().await;
                    let event = if follow {
                        controller::UiEvent::Reset
                    } else {
                        controller::UiEvent::Reload
                    };
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            });

            // The chart is not Send, so the event loop stays on this task.
            tokio::select! {
                _ = viewer.run(rx) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                }
            }

            ticker.abort();
            info!("Shutting down");
        }
    }
}
