use crate::error::Error;
use serde::Deserialize;
use std::time::Duration;

/// One `code`/`value` pair from a device status report. Values stay
/// loosely typed: the set of codes varies between firmwares.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusDatum {
    pub code: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    success: bool,
    msg: Option<String>,
    result: Option<Vec<StatusDatum>>,
}

impl StatusEnvelope {
    fn into_status(self) -> Result<Vec<StatusDatum>, Error> {
        if !self.success {
            return Err(Error::UpstreamProtocol(
                self.msg.unwrap_or_else(|| "API failed".to_string()),
            ));
        }
        self.result
            .ok_or_else(|| Error::UpstreamProtocol("status response without result".to_string()))
    }
}

/// Seam between the sampler and the device cloud, so drivers and tests
/// can substitute their own source of readings.
#[async_trait::async_trait]
pub trait DeviceClient: Send + Sync {
    async fn get_status(&self) -> Result<Vec<StatusDatum>, Error>;
}

/// HTTP client for a Tuya-style device cloud.
pub struct TuyaClient {
    http: reqwest::Client,
    endpoint: String,
    device_id: String,
}

impl TuyaClient {
    /// The timeout bounds the whole status request: a hung upstream call
    /// surfaces as an upstream error instead of stalling the sampler.
    pub fn new(endpoint: &str, device_id: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            device_id: device_id.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl DeviceClient for TuyaClient {
    async fn get_status(&self) -> Result<Vec<StatusDatum>, Error> {
        let url = format!("{}/v1.0/devices/{}/status", self.endpoint, self.device_id);
        let envelope: StatusEnvelope = self.http.get(&url).send().await?.json().await?;
        envelope.into_status()
    }
}
