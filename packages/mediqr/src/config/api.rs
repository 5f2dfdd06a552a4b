use super::DEFAULT_LATENCY_MS;
use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_latency_ms")]
    pub latency_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            latency_ms: ApiConfig::default_latency_ms(),
        }
    }
}

impl ApiConfig {
    pub fn with_latency(latency: Duration) -> Self {
        ApiConfig {
            latency_ms: latency.as_millis() as u64,
        }
    }

    pub const fn default_latency_ms() -> u64 {
        DEFAULT_LATENCY_MS
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}
