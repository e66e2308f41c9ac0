use std::time::Duration;

use log::{debug, info};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use crate::error::ClientError;
use crate::model::{ScheduleRequest, ScheduleResult};

pub const DEFAULT_BACKEND_URL: &str = "https://optimal-temp-ha-backend-a69b8b7983db.herokuapp.com";
const GENERATE_PATH: &str = "/generate_schedule";

/// Talks to the remote schedule optimizer.
#[derive(Clone)]
pub struct OptimizerClient {
    client: Client,
    backend_url: String,
}

impl OptimizerClient {
    /// Returns a new client
    ///
    /// # Arguments
    ///
    /// * 'backend_url' - base url of the optimizer, without the endpoint path
    /// * 'timeout' - overall request timeout, `None` keeps the transport default
    pub fn new(backend_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            backend_url: backend_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Sends one request and waits for the optimizer's answer.
    ///
    /// Any status outside 2xx is a failure. Nothing is retried.
    pub async fn submit(&self, request: &ScheduleRequest) -> Result<ScheduleResult, ClientError> {
        let url = format!("{}{}", self.backend_url, GENERATE_PATH);
        let body = serde_json::to_string(request)?;
        info!("sending optimization request to {}", url);
        debug!("request body: {}", body);

        let res = self.client.post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let json = res.text().await?;
        debug!("optimizer answered: {}", json);
        let result: ScheduleResult = serde_json::from_str(&json)?;

        Ok(result)
    }
}
