//! Application state for the portfolio API

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use property_store::{open_source, PortfolioConfig, PropertySource, StoreError};

pub struct AppState {
    pub source: Arc<dyn PropertySource>,
    pub config: PortfolioConfig,
    fixed_today: Option<NaiveDate>,
}

impl AppState {
    /// Open the data source selected by `config`
    pub async fn new(config: PortfolioConfig) -> Result<Self, StoreError> {
        let source = open_source(&config).await?;
        tracing::info!("Data source: {}", source.describe());
        Ok(Self::with_source(source, config))
    }

    pub fn with_source(source: Arc<dyn PropertySource>, config: PortfolioConfig) -> Self {
        Self {
            source,
            config,
            fixed_today: None,
        }
    }

    /// Pin the reference date used for lease status
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Local::now().date_naive())
    }
}
