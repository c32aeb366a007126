//! Getting listing-page HTML: live over HTTP, or from saved capture files.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use reqwest::header::USER_AGENT;

use crate::config::Config;
use crate::error::{AuditError, Result};

const CAPTURE_PREFIX: &str = "fallcent_html_";
const CAPTURE_SUFFIX: &str = ".html";

pub fn build_client(config: &Config) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?;
    Ok(client)
}

pub async fn fetch_html(client: &reqwest::Client, url: &str, user_agent: &str) -> Result<String> {
    log::info!("fetching {url}");
    let response = client
        .get(url)
        .header(USER_AGENT, user_agent)
        .send()
        .await?
        .error_for_status()?;

    let text = response.text().await?;
    log::debug!("received {} bytes from {url}", text.len());
    Ok(text)
}

pub fn capture_file_name(at: DateTime<Local>) -> String {
    format!("{CAPTURE_PREFIX}{}{CAPTURE_SUFFIX}", at.format("%Y%m%d_%H%M%S"))
}

/// Writes `html` to `dir` as a timestamped capture and returns its path.
pub fn save_capture(dir: &Path, html: &str, at: DateTime<Local>) -> Result<PathBuf> {
    let path = dir.join(capture_file_name(at));
    std::fs::write(&path, html).map_err(|e| AuditError::io(&path, e))?;
    log::info!("saved page to {}", path.display());
    Ok(path)
}

/// The most recently modified `fallcent_html_*.html` in `dir`.
pub fn latest_capture(dir: &Path) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir).map_err(|e| AuditError::io(dir, e))?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| AuditError::io(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !is_capture_name(name) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if latest.as_ref().is_none_or(|(newest, _)| modified > *newest) {
            latest = Some((modified, entry.path()));
        }
    }

    latest
        .map(|(_, path)| path)
        .ok_or_else(|| AuditError::NoCapture(dir.to_path_buf()))
}

pub fn read_capture(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))
}

fn is_capture_name(name: &str) -> bool {
    name.starts_with(CAPTURE_PREFIX) && name.ends_with(CAPTURE_SUFFIX)
}
