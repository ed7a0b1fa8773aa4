use std::env;
use std::path::PathBuf;
use std::time::Duration;

use paas_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const STATE_DIRECTORY: &str = "paas-console";
const STATE_FILE: &str = "storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub api_url: Url,
    pub state_path: PathBuf,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok(), dirs::config_dir())
    }

    pub fn from_lookup<F>(lookup: F, config_dir: Option<PathBuf>) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_api_url = lookup("PAAS_API_URL")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = Url::parse(raw_api_url.trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid PAAS_API_URL value '{raw_api_url}': {error}"))
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(
                "PAAS_API_URL must use http or https".to_owned(),
            ));
        }

        let state_path = match lookup("PAAS_STATE_PATH").filter(|value| !value.trim().is_empty())
        {
            Some(value) => PathBuf::from(value),
            None => config_dir
                .map(|directory| directory.join(STATE_DIRECTORY).join(STATE_FILE))
                .ok_or_else(|| required("PAAS_STATE_PATH"))?,
        };

        let timeout_secs =
            parse_env_u64(&lookup, "PAAS_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "PAAS_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            state_path,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

fn required(name: &str) -> AppError {
    AppError::Validation(format!(
        "{name} is required when no user config directory is available"
    ))
}

fn parse_env_u64<F>(lookup: &F, name: &str, default: u64) -> AppResult<u64>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}
