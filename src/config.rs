// src/config.rs

pub mod creds;

use crate::{constants, error::AppResult};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base: Url,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl AppConfig {
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            api_base: Url::parse(constants::API_BASE_URL)?,
            user_agent: constants::USER_AGENT.into(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        })
    }
}

#[cfg(feature = "testing")]
impl AppConfig {
    /// Configuration pointing at a local mock server. Retries are disabled
    /// so that every request in a test maps to exactly one expected hit.
    pub fn for_tests(api_base: &str) -> Self {
        Self {
            api_base: Url::parse(api_base).expect("valid test base url"),
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 0,
        }
    }
}
