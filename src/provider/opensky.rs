//! HTTP client for the OpenSky Network `states/all` endpoint.

use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client,
};
use serde_json::Value;

use crate::config::{Credentials, ProviderConfig};
use crate::geo::BoundingBox;
use crate::provider::error::FetchError;

/// Decoded body of a states request. Rows are kept as raw JSON arrays so the
/// normalizer can tolerate missing or mistyped columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatesResponse {
    /// Provider timestamp, epoch seconds.
    pub time: i64,
    pub states: Vec<Vec<Value>>,
}

pub struct OpenSkyClient {
    client: Client,
    endpoint: String,
    credentials: Option<Credentials>,
    bbox: Option<BoundingBox>,
}

impl OpenSkyClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("skywatch/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credentials: config.credentials.clone(),
            bbox: config.bbox,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_states(&self) -> Result<StatesResponse, FetchError> {
        let mut request = self.client.get(&self.endpoint);

        if let Some(bbox) = &self.bbox {
            request = request.query(&bbox_query(bbox));
        }
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        log::debug!("Fetching: {}", self.endpoint);

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status });
        }

        let body = response.bytes().await?;
        parse_states(&body)
    }
}

fn bbox_query(bbox: &BoundingBox) -> [(&'static str, f64); 4] {
    [
        ("lamin", bbox.south),
        ("lomin", bbox.west),
        ("lamax", bbox.north),
        ("lomax", bbox.east),
    ]
}

/// `states: null` is how the provider reports an empty sky and decodes to no
/// rows; a missing or non-array `states` member is a schema failure.
pub fn parse_states(body: &[u8]) -> Result<StatesResponse, FetchError> {
    let root: Value = serde_json::from_slice(body)?;

    let time = root
        .get("time")
        .and_then(Value::as_i64)
        .unwrap_or_else(|| Utc::now().timestamp());

    let states = match root.get("states") {
        Some(Value::Array(rows)) => rows
            .iter()
            .map(|row| row.as_array().cloned().unwrap_or_default())
            .collect(),
        Some(Value::Null) => Vec::new(),
        _ => return Err(FetchError::MissingStates),
    };

    Ok(StatesResponse { time, states })
}
