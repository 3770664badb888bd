use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

pub const SITE_URL: &str = "https://www.amazon.in";

/// Browser-like header set sent with every listing request.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:129.0) Gecko/20100100 Firefox/129.0";
pub const ACCEPT_LANGUAGE: &str = "en-US, en;q=0.5";

/// Per-request timeout for listing pages (seconds).
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Excel rejects sheet names longer than this.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Prefix of every report file name.
pub const REPORT_PREFIX: &str = "amazon_products";

/// Discount tier boundaries (percent). Medium is `[MEDIUM_MIN, HIGH_MIN)`,
/// high is `[HIGH_MIN, 100]`.
pub mod discount_tiers {
    pub const MEDIUM_MIN: u8 = 50;
    pub const HIGH_MIN: u8 = 80;
    pub const MAX: u8 = 100;

    /// Solid fill colours applied to the discount cell.
    pub const MEDIUM_FILL: u32 = 0xFFFF00;
    pub const HIGH_FILL: u32 = 0x00FF00;
}

#[derive(Debug, Clone)]
pub struct Config {
    pub site_url: String,
    pub log_level: String,
    /// Sheet of the product list workbook to read categories from (PLATFORM)
    pub platform: String,
    /// Workbook holding the category list (PRODUCT_LIST_PATH)
    pub product_list_path: PathBuf,
    /// Synced directory that receives a copy of every report (ARCHIVE_DIR)
    pub archive_dir: PathBuf,
    /// Directory the report is written to before archiving (REPORT_DIR)
    pub report_dir: PathBuf,
    /// Listing pages fetched per category (MAX_NUM_PAGE)
    pub max_pages: u32,
    /// A run fires when `hour % run_frequency_hours == 0` (RUN_FREQUENCY_HOURS)
    pub run_frequency_hours: u32,
    /// Archive files older than this are deleted (RETENTION_SECS)
    pub retention_secs: u64,
    /// Pause after every listing request (REQUEST_DELAY_SECS)
    pub request_delay_secs: u64,
    /// Idle tick of the scheduler loop (POLL_INTERVAL_SECS)
    pub poll_interval_secs: u64,
    /// Name reports `HH-SS-MM` like older archives do (LEGACY_REPORT_TIMESTAMP)
    pub legacy_report_timestamp: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests never touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cfg = Self {
            site_url: text("SITE_URL", SITE_URL).trim_end_matches('/').to_string(),
            log_level: text("LOG_LEVEL", "info"),
            platform: text("PLATFORM", "amazon"),
            product_list_path: PathBuf::from(text("PRODUCT_LIST_PATH", "product_list.xlsx")),
            archive_dir: PathBuf::from(text("ARCHIVE_DIR", "archive")),
            report_dir: PathBuf::from(text("REPORT_DIR", ".")),
            max_pages: parse_var(&lookup, "MAX_NUM_PAGE", 4)?,
            run_frequency_hours: parse_var(&lookup, "RUN_FREQUENCY_HOURS", 6)?,
            retention_secs: parse_var(&lookup, "RETENTION_SECS", 86_400)?,
            request_delay_secs: parse_var(&lookup, "REQUEST_DELAY_SECS", 10)?,
            poll_interval_secs: parse_var(&lookup, "POLL_INTERVAL_SECS", 60)?,
            legacy_report_timestamp: parse_var(&lookup, "LEGACY_REPORT_TIMESTAMP", false)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=24).contains(&self.run_frequency_hours) {
            return Err(AppError::Config(
                "RUN_FREQUENCY_HOURS must be between 1 and 24".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(AppError::Config("POLL_INTERVAL_SECS must be positive".to_string()));
        }
        if self.max_pages == 0 {
            return Err(AppError::Config("MAX_NUM_PAGE must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{key} has an invalid value: {raw:?}"))),
    }
}
