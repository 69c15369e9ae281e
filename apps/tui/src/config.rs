use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tariff_core::{Metric, RegionFilter};

pub const DEFAULT_DATA_SOURCE: &str = "data/countries.json";
pub const DEFAULT_LOG_FILE: &str = "tariff-tracker.log";
pub const DEFAULT_POPUP_DELAY_SECS: u64 = 30;

/// Where the country dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_source: DataSource,
    /// Lead submission is disabled when unset.
    pub webhook_url: Option<String>,
    pub popup_delay: Duration,
    pub log_file: PathBuf,
    pub metric: Metric,
    pub region: RegionFilter,
    pub debug: bool,
}

impl AppConfig {
    /// Reads configuration from the environment, after loading `.env`.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_source =
            DataSource::parse(&value("TARIFF_DATA_URL").unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string()));

        let popup_delay = match value("LEAD_POPUP_DELAY_SECS") {
            Some(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .map_err(|e| eyre!("Invalid LEAD_POPUP_DELAY_SECS `{raw}`: {e}"))?,
            ),
            None => Duration::from_secs(DEFAULT_POPUP_DELAY_SECS),
        };

        let metric = match value("TARIFF_METRIC") {
            Some(raw) => Metric::parse(&raw).ok_or_else(|| eyre!("Unknown metric `{raw}`"))?,
            None => Metric::ReciprocalTariff,
        };

        let region = value("TARIFF_REGION")
            .and_then(|raw| RegionFilter::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            data_source,
            webhook_url: value("LEAD_WEBHOOK_URL"),
            popup_delay,
            log_file: value("TARIFF_LOG_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            metric,
            region,
            debug: value("DEBUG").is_some_and(|raw| raw != "0"),
        })
    }
}
