use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Default, Parser)]
#[command(name = "tariff_tracker", version, about = "U.S. Tariffs 2025 Tracker")]
pub struct CliArgs {
    /// Print a dataset summary and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Initial metric (e.g. reciprocalTariff, usTradeBalance, gdp2023)
    #[arg(long, value_name = "METRIC")]
    pub metric: Option<String>,

    /// Initial region filter: all, g20, non-g20 or a region name
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Dataset URL or local JSON file
    #[arg(long, value_name = "URL|PATH")]
    pub data: Option<String>,

    /// Write logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(data) = &self.data {
            std::env::set_var("TARIFF_DATA_URL", data);
        }
        if let Some(path) = &self.log_file {
            std::env::set_var("TARIFF_LOG_FILE", path);
        }
        if let Some(metric) = &self.metric {
            std::env::set_var("TARIFF_METRIC", metric);
        }
        if let Some(region) = &self.region {
            std::env::set_var("TARIFF_REGION", region);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_flag() {
        let args = CliArgs::parse_from([
            "tariff_tracker",
            "--headless",
            "--json",
            "--debug",
            "--metric",
            "usTradeBalance",
            "--region",
            "g20",
            "--data",
            "data/countries.json",
            "--log-file",
            "/tmp/tariff.log",
        ]);

        assert!(args.headless && args.json && args.debug);
        assert_eq!(args.metric.as_deref(), Some("usTradeBalance"));
        assert_eq!(args.region.as_deref(), Some("g20"));
        assert_eq!(args.data.as_deref(), Some("data/countries.json"));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/tariff.log")));
    }
}
