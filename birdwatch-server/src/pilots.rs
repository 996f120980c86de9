//! Pilot identity resolution.
//!
//! Lookups are per-serial and independently fallible: a failed lookup
//! yields `None` for that record and never aborts the tick. 404 means an
//! unregistered drone, which viewers see as a missing-pilot entry.

use async_trait::async_trait;
use birdwatch_core::Pilot;
use std::time::Duration;

const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolves the registered pilot for a drone serial.
#[async_trait]
pub trait PilotResolver: Send + Sync {
    async fn resolve(&self, serial_number: &str) -> Option<Pilot>;
}

/// Looks pilots up in the HTTP registry.
pub struct HttpPilotResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPilotResolver {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Ok(HttpPilotResolver {
            client: reqwest::Client::builder()
                .timeout(RESOLVE_TIMEOUT)
                .build()?,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl PilotResolver for HttpPilotResolver {
    async fn resolve(&self, serial_number: &str) -> Option<Pilot> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            serial_number
        );
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{}: pilot lookup failed: {}", serial_number, e);
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!(
                "{}: pilot lookup returned status {}",
                serial_number,
                response.status()
            );
            return None;
        }
        match response.json::<Pilot>().await {
            Ok(pilot) => Some(pilot),
            Err(e) => {
                log::warn!("{}: malformed pilot payload: {}", serial_number, e);
                None
            }
        }
    }
}
