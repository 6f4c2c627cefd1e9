use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::config::Config;
use crate::error::PollError;

/// Boundary to the events api. One page per call, no retries.
pub struct Fetcher {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl Fetcher {
    pub fn new(config: &Config, token: Option<String>) -> Result<Self, PollError> {
        let client = Client::builder()
            .user_agent(concat!("ghactivity/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token,
        })
    }

    pub fn fetch_events(&self, username: &str, page: Option<u32>) -> Result<Vec<Value>, PollError> {
        let url = self.build_url(username, page);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }
        response.json::<Vec<Value>>().map_err(PollError::Decode)
    }

    fn build_url(&self, username: &str, page: Option<u32>) -> String {
        let url = self.api_url.replace("{username}", username);
        match page {
            Some(page) => format!("{}?page={}", url, page),
            None => url,
        }
    }
}
