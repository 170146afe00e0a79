//! Minimal blocking client for the Swarms API logs endpoint

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::app::AppError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://swarms-api-285321057562.us-east1.run.app";
const LOGS_PATH: &str = "/v1/swarm/logs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) struct SwarmsClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl SwarmsClient {
    pub(crate) fn new(base_url: Option<&str>, api_key: Option<&str>) -> Result<Self, AppError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(AppError::MissingApiKey)?;
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        Ok(Self {
            agent: config.into(),
            base_url: base_url.unwrap_or(DEFAULT_BASE_URL).to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// `GET /v1/swarm/logs`; the response envelope carries a `logs` array.
    pub(crate) fn get_logs(&self) -> Result<Value, AppError> {
        let url = self.endpoint(LOGS_PATH);
        debug!(%url, "Fetching request logs");
        let response = self
            .agent
            .get(&url)
            .header("x-api-key", &self.api_key)
            .call()?;
        let mut body = response.into_body();
        Ok(serde_json::from_reader(body.as_reader())?)
    }
}
