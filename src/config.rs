use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

/// Runtime configuration, loaded once at startup and passed explicitly to
/// the stages that need it. Every field has a default so the binary runs
/// without any setup.
///
/// Precedence: a JSON file named by `REVSCRAPER_CONFIG`, then individual
/// `REVSCRAPER_*` variables, then the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page to scrape.
    /// Env: `REVSCRAPER_URL`.
    pub url: String,

    /// `User-Agent` sent with the request. The source site serves an
    /// empty shell to clients it does not recognise as a browser.
    /// Env: `REVSCRAPER_USER_AGENT`.
    pub user_agent: String,

    /// SQLite file the records are appended to.
    /// Env: `REVSCRAPER_DB`.
    pub db_path: PathBuf,

    /// Directory the chart PNGs are written to.
    /// Env: `REVSCRAPER_CHARTS_DIR`.
    pub charts_dir: PathBuf,

    /// Years at or above this are dropped from the yearly chart; the
    /// current year is incomplete and would plot misleadingly low.
    /// Env: `REVSCRAPER_CUTOFF_YEAR`.
    pub cutoff_year: i32,

    /// Header labels identifying the revenue table when the page carries
    /// more than one table. Empty means "take the first table".
    pub expected_headers: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "https://ycharts.com/companies/TSLA/revenues".into(),
            user_agent: "Mozilla/5.0 (iPad; CPU OS 12_2 like Mac OS X) \
                         AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148"
                .into(),
            db_path: "tesla_revenue.db".into(),
            charts_dir: "charts".into(),
            cutoff_year: 2023,
            expected_headers: vec!["Date".into(), "Value".into()],
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var("REVSCRAPER_CONFIG") {
            Ok(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config file {path}"))?
            }
            Err(_) => Self::default(),
        };
        if let Ok(v) = env::var("REVSCRAPER_URL") {
            cfg.url = v;
        }
        if let Ok(v) = env::var("REVSCRAPER_USER_AGENT") {
            cfg.user_agent = v;
        }
        if let Ok(v) = env::var("REVSCRAPER_DB") {
            cfg.db_path = v.into();
        }
        if let Ok(v) = env::var("REVSCRAPER_CHARTS_DIR") {
            cfg.charts_dir = v.into();
        }
        if let Ok(v) = env::var("REVSCRAPER_CUTOFF_YEAR") {
            cfg.cutoff_year = v
                .parse()
                .context("REVSCRAPER_CUTOFF_YEAR must be a calendar year")?;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert!(cfg.url.starts_with("https://"));
        assert_eq!(cfg.expected_headers, vec!["Date", "Value"]);
        assert_eq!(cfg.cutoff_year, 2023);
    }

    #[test]
    fn config_file_overrides_defaults() -> Result<()> {
        let cfg: Config = serde_json::from_str(r#"{"cutoff_year": 2026}"#)?;
        assert_eq!(cfg.cutoff_year, 2026);
        // untouched fields keep their defaults
        assert_eq!(cfg.db_path, PathBuf::from("tesla_revenue.db"));
        Ok(())
    }
}
