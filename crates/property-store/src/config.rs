//! Environment-driven configuration shared by the API and the importer

use std::path::PathBuf;
use std::str::FromStr;

use portfolio_engine::ExpiryWindow;

use crate::error::StoreError;

pub const DEFAULT_BUILDINGS_CSV: &str = "data/buildings.csv";
pub const DEFAULT_LEASES_CSV: &str = "data/leases.csv";
pub const DEFAULT_EXPIRY_WINDOW_MONTHS: u32 = 6;
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PORT: u16 = 3001;

/// Which backend serves reads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DataSourceKind {
    #[default]
    Sqlite,
    Csv,
}

impl DataSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Sqlite => "sqlite",
            DataSourceKind::Csv => "csv",
        }
    }
}

impl FromStr for DataSourceKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "database" | "db" => Ok(DataSourceKind::Sqlite),
            "csv" => Ok(DataSourceKind::Csv),
            other => Err(StoreError::Config(format!(
                "DATA_SOURCE must be 'sqlite' or 'csv', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioConfig {
    pub source: DataSourceKind,
    pub database_url: String,
    pub buildings_csv: PathBuf,
    pub leases_csv: PathBuf,
    pub expiry_window: ExpiryWindow,
    pub batch_size: usize,
    /// API listen port
    pub port: u16,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            source: DataSourceKind::default(),
            database_url: default_database_url(),
            buildings_csv: PathBuf::from(DEFAULT_BUILDINGS_CSV),
            leases_csv: PathBuf::from(DEFAULT_LEASES_CSV),
            expiry_window: ExpiryWindow::months(DEFAULT_EXPIRY_WINDOW_MONTHS),
            batch_size: DEFAULT_BATCH_SIZE,
            port: DEFAULT_PORT,
        }
    }
}

impl PortfolioConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, StoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset or blank keys use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(source) = get("DATA_SOURCE") {
            config.source = source.parse()?;
        }
        if let Some(url) = get("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(path) = get("BUILDINGS_CSV") {
            config.buildings_csv = PathBuf::from(path);
        }
        if let Some(path) = get("LEASES_CSV") {
            config.leases_csv = PathBuf::from(path);
        }
        if let Some(months) = get("LEASE_EXPIRY_WINDOW_MONTHS") {
            let months = parse_number::<u32>("LEASE_EXPIRY_WINDOW_MONTHS", &months)?;
            config.expiry_window = ExpiryWindow::months(months);
        }
        if let Some(size) = get("IMPORT_BATCH_SIZE") {
            let size = parse_number::<usize>("IMPORT_BATCH_SIZE", &size)?;
            if size == 0 {
                return Err(StoreError::Config(
                    "IMPORT_BATCH_SIZE must be at least 1".to_string(),
                ));
            }
            config.batch_size = size;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_number::<u16>("PORT", &port)?;
        }

        Ok(config)
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, StoreError> {
    raw.trim()
        .parse()
        .map_err(|_| StoreError::Config(format!("{key} must be a whole number, got '{raw}'")))
}

/// `sqlite:` URL inside the platform data directory
pub fn default_database_url() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("property-portfolio");
    format!("sqlite:{}/portfolio.db?mode=rwc", data_dir.display())
}

/// Directory holding the default database file, if the URL points at one
pub fn database_dir(database_url: &str) -> Option<PathBuf> {
    let path = database_url.strip_prefix("sqlite:")?;
    let path = path.split('?').next()?.trim_start_matches("//");
    if path.is_empty() || path.starts_with(':') {
        return None;
    }
    PathBuf::from(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(PathBuf::from)
}

/// Get platform-specific data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }
}
