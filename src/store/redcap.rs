use std::env;
use std::time::Duration;

use crate::error::{ChartError, ChartResult};

pub const ENDPOINT_ENV: &str = "REDCAP_API_ENDPOINT";
pub const TOKEN_ENV: &str = "REDCAP_API_TOKEN";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Connection settings for a REDCap record export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedcapConfig {
    pub endpoint: String,
    pub token: String,
    /// Fields to export; empty exports every field.
    pub fields: Vec<String>,
    pub timeout: Duration,
}

impl RedcapConfig {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            fields: vec!["record_id".to_owned()],
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `REDCAP_API_ENDPOINT` and `REDCAP_API_TOKEN`.
    pub fn from_env() -> ChartResult<Self> {
        let read = |name: &str| {
            env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ChartError::InvalidConfig(format!("`{name}` is not set")))
        };
        Ok(Self::new(read(ENDPOINT_ENV)?, read(TOKEN_ENV)?))
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Form body of a flat JSON record export.
    #[must_use]
    pub fn export_form(&self) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = [
            ("token", self.token.as_str()),
            ("content", "record"),
            ("action", "export"),
            ("format", "json"),
            ("type", "flat"),
            ("csvDelimiter", ""),
            ("rawOrLabel", "raw"),
            ("rawOrLabelHeaders", "raw"),
            ("exportCheckboxLabel", "true"),
            ("exportSurveyFields", "true"),
            ("exportDataAccessGroups", "true"),
            ("returnFormat", "json"),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect();
        form.extend(
            self.fields
                .iter()
                .enumerate()
                .map(|(index, field)| (format!("fields[{index}]"), field.clone())),
        );
        form
    }
}

#[cfg(feature = "redcap")]
mod source {
    use reqwest::blocking::Client;
    use tracing::debug;

    use super::RedcapConfig;
    use crate::core::Row;
    use crate::error::{ChartError, ChartResult};
    use crate::store::{CancelToken, RecordSource};

    /// Blocking REDCap record-export transport.
    pub struct RedcapSource {
        config: RedcapConfig,
        client: Client,
    }

    impl RedcapSource {
        pub fn new(config: RedcapConfig) -> ChartResult<Self> {
            let client = Client::builder()
                .timeout(config.timeout)
                .build()
                .map_err(|e| ChartError::Fetch(format!("reqwest client error: {e}")))?;
            Ok(Self { config, client })
        }
    }

    impl RecordSource for RedcapSource {
        fn fetch(&self, cancel: &CancelToken) -> ChartResult<Vec<Row>> {
            if cancel.is_cancelled() {
                return Err(ChartError::Fetch("request cancelled".to_owned()));
            }
            debug!(endpoint = %self.config.endpoint, "posting record export");
            self.client
                .post(&self.config.endpoint)
                .header(reqwest::header::ACCEPT, "application/json")
                .form(&self.config.export_form())
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(|e| ChartError::Fetch(format!("redcap request error: {e}")))?
                .json::<Vec<Row>>()
                .map_err(|e| ChartError::InvalidData(format!("redcap decode error: {e}")))
        }
    }
}

#[cfg(feature = "redcap")]
pub use source::RedcapSource;
