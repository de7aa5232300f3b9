// Runtime configuration, read once from the environment at start-up.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_url: Url,
    /// Per-request timeout for network commands.
    pub timeout: Duration,
    pub credentials_path: PathBuf,
    pub downloads_dir: PathBuf,
    /// `None` disables the log file.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            credentials_path: PathBuf::from(".env"),
            downloads_dir: PathBuf::from("downloads"),
            log_dir: dirs::data_local_dir().map(|dir| dir.join("fileshare-cli")),
        }
    }
}

impl Config {
    /// Configure from `FILESHARE_*` environment variables, falling back to
    /// the defaults above.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(raw) = lookup("FILESHARE_SERVER_URL") {
            let url = Url::parse(raw.trim())
                .with_context(|| format!("invalid FILESHARE_SERVER_URL {raw:?}"))?;
            if url.cannot_be_a_base() {
                bail!("FILESHARE_SERVER_URL {raw:?} cannot be used as a base URL");
            }
            config.server_url = url;
        }

        if let Some(raw) = lookup("FILESHARE_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid FILESHARE_TIMEOUT_SECS {raw:?}"))?;
            if secs == 0 {
                bail!("FILESHARE_TIMEOUT_SECS must be greater than zero");
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup("FILESHARE_CREDENTIALS") {
            config.credentials_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("FILESHARE_DOWNLOADS") {
            config.downloads_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("FILESHARE_LOG_DIR") {
            config.log_dir = Some(PathBuf::from(path));
        }

        Ok(config)
    }
}
