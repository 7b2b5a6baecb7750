mod error;
mod opensky;

use std::future::Future;

pub use error::{FailureKind, FetchError};
pub use opensky::{OpenSkyClient, StatesResponse};
#[cfg(test)]
pub use opensky::parse_states;

use crate::config::{ProviderConfig, ProviderKind};

/// Anything that can answer one states request.
pub trait FlightSource: Send + Sync {
    fn fetch_states(&self) -> impl Future<Output = Result<StatesResponse, FetchError>> + Send;

    fn describe(&self) -> String;
}

/// The configured live source.
pub enum Provider {
    OpenSky(OpenSkyClient),
    Simulated,
}

impl Provider {
    pub fn from_config(config: &ProviderConfig) -> Result<Self, FetchError> {
        match config.kind {
            ProviderKind::Opensky => Ok(Provider::OpenSky(OpenSkyClient::new(config)?)),
            ProviderKind::Simulated => Ok(Provider::Simulated),
        }
    }
}

impl FlightSource for Provider {
    async fn fetch_states(&self) -> Result<StatesResponse, FetchError> {
        match self {
            Provider::OpenSky(client) => client.fetch_states().await,
            Provider::Simulated => Err(FetchError::Disabled),
        }
    }

    fn describe(&self) -> String {
        match self {
            Provider::OpenSky(client) => format!("opensky ({})", client.endpoint()),
            Provider::Simulated => "simulated".to_string(),
        }
    }
}
