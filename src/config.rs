use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Runtime settings, read from the environment (and `.env` via `dotenvy`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub snapshot_path: PathBuf,
    pub capture_dir: PathBuf,
    pub fallcent_url: String,
    pub user_agent: String,
    pub http_timeout: Duration,
    /// Collection rate (percent) below which `verify` warns.
    pub match_rate_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snapshot_path: PathBuf::from("data/current-products.json"),
            capture_dir: PathBuf::from("."),
            fallcent_url: "https://fallcent.com/".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: Duration::from_secs(30),
            match_rate_threshold: 90.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        Config {
            snapshot_path: lookup("SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            capture_dir: lookup("CAPTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.capture_dir),
            fallcent_url: lookup("FALLCENT_URL").unwrap_or(defaults.fallcent_url),
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
            http_timeout: parsed(&lookup, "HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            match_rate_threshold: parsed(&lookup, "MATCH_RATE_THRESHOLD")
                .unwrap_or(defaults.match_rate_threshold),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid value, using the default");
            None
        }
    }
}
