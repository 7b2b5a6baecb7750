use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::catalog::{Catalog, CatalogError};
use crate::config::Config;
use crate::flights::{MockGenerator, Normalizer};
use crate::presentation::{ListOptions, Presenter};
use crate::provider::{FetchError, Provider};
use crate::refresh::Refresher;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("provider: {0}")]
    Provider(#[from] FetchError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub refresher: Arc<Refresher<Provider>>,
    pub presenter: Arc<Mutex<Presenter>>,
    pub list_options: Arc<ListOptions>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, StateError> {
        let catalog = Arc::new(Catalog::load(config.catalog.as_deref())?);
        let provider = Provider::from_config(&config.provider)?;

        let normalizer = Normalizer::new(Arc::clone(&catalog), config.display.airborne_only);
        let mock = MockGenerator::new(catalog, config.display.region.clone());
        let refresher = Refresher::new(provider, normalizer, mock);

        Ok(AppState {
            list_options: Arc::new(ListOptions::from(&config.display)),
            config: Arc::new(config),
            refresher: Arc::new(refresher),
            presenter: Arc::new(Mutex::new(Presenter::new())),
        })
    }
}

#[cfg(test)]
pub(crate) fn simulated_state() -> AppState {
    let config = Config::from_yaml("provider: { kind: simulated }").unwrap();
    AppState::from_config(config).unwrap()
}
