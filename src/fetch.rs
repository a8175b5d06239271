// src/fetch.rs

use anyhow::{Context, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use url::Url;

/// Fallback filename for URLs without a usable last path segment.
const DEFAULT_FILE_NAME: &str = "dataset.csv";

/// Derive the local filename for a dataset URL: the last path segment,
/// or the fallback when the URL ends in a slash.
pub fn file_name_from_url(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
}

/// Download the dataset at `url_str` and save it under `dest_dir` using
/// the original filename. An already-downloaded copy is reused without
/// touching the network. Returns the full path of the local file.
///
/// The body is written to a `.tmp` sibling and renamed into place, so a
/// file at the final path is always a complete download — an interrupted
/// run can only leave a `.tmp` behind, which is never reused.
pub async fn download_dataset(
    client: &Client,
    url_str: &str,
    dest_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    let dest_dir = dest_dir.as_ref();
    let url = Url::parse(url_str).with_context(|| format!("parsing dataset URL {}", url_str))?;
    let file_name = file_name_from_url(&url);
    let dest_path = dest_dir.join(file_name);

    if dest_path.exists() {
        info!(path = %dest_path.display(), "dataset already downloaded; reusing");
        return Ok(dest_path);
    }

    fs::create_dir_all(dest_dir).await?;

    info!(url = %url, "downloading dataset");
    let resp = client
        .get(url.as_str())
        .send()
        .await
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?;
    let bytes = resp.bytes().await?;

    // write to tmp, then rename over the final path
    let tmp_path = dest_dir.join(format!("{}.tmp", file_name));
    fs::write(&tmp_path, &bytes).await?;
    fs::rename(&tmp_path, &dest_path).await.with_context(|| {
        format!(
            "renaming {} -> {}",
            tmp_path.display(),
            dest_path.display()
        )
    })?;
    info!(bytes = bytes.len(), path = %dest_path.display(), "saved dataset");

    Ok(dest_path)
}
