use anyhow::Result;
use kkdata::{fetch, process, stats};
use reqwest::Client;
use std::path::PathBuf;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Copenhagen population statistics: one row per
/// (year, city code, age, zip code) with a person count.
static DATASET_URL: &str = "http://data.kk.dk/dataset/76ecf368-bf2d-46a2-bcf8-adaf37662528/resource/9286af17-f74e-46c9-a428-9fb707542189/download/befkbhalderstatkode.csv";
static DATA_DIR: &str = "data";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kkdata=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) resolve the source ───────────────────────────────────────
    // one optional argument: a dataset URL or a local CSV path
    let client = Client::new();
    let start = Instant::now();

    let csv_path: PathBuf = match std::env::args().nth(1).as_deref() {
        Some(arg) if arg.starts_with("http://") || arg.starts_with("https://") => {
            fetch::download_dataset(&client, arg, DATA_DIR).await?
        }
        Some(path) => PathBuf::from(path),
        None => fetch::download_dataset(&client, DATASET_URL, DATA_DIR).await?,
    };

    // ─── 3) load records ─────────────────────────────────────────────
    // the dataset ships with an AAR,BYDEL,ALDER,STATKODE,PERSONER header
    let records = process::load_records(&csv_path, true)?;
    info!(rows = records.len(), path = %csv_path.display(), "records loaded");

    // ─── 4) aggregate ────────────────────────────────────────────────
    let statistics = stats::aggregate(records);
    info!(
        years = statistics.by_year.len(),
        elapsed = ?start.elapsed(),
        "aggregated"
    );

    // ─── 5) print ────────────────────────────────────────────────────
    println!("{}", stats::render_json(&statistics)?);

    Ok(())
}
