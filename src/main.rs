mod device;
mod error;
mod exporter;
mod format;
mod model;
mod sampler;

use crate::device::TuyaClient;
use crate::exporter::Output;
use crate::sampler::{Sampler, SamplerConfig};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[clap(version, about)]
struct Params {
    /// Base URL of the device cloud.
    #[clap(
        long,
        env = "TUYA_API_ENDPOINT",
        default_value = "https://openapi.tuyaeu.com"
    )]
    endpoint: String,
    /// Identifier of the plug to monitor.
    #[clap(long, env = "TUYA_DEVICE_ID")]
    device: String,
    /// Seconds between two samples.
    #[clap(long, default_value = "30")]
    interval: u64,
    /// Seconds before a status request is abandoned.
    #[clap(long, default_value = "10")]
    timeout: u64,
    /// Price of one kilowatt-hour.
    #[clap(long, default_value = "8.84")]
    cost_per_kwh: f64,
    /// Number of samples kept in memory.
    #[clap(long, default_value = "200")]
    history_limit: usize,
    #[clap(subcommand)]
    output: Output,
}

impl Params {
    fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            poll_interval: Duration::from_secs(self.interval),
            cost_per_kwh: self.cost_per_kwh,
            history_limit: self.history_limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let params = Params::parse();
    let client = TuyaClient::new(
        &params.endpoint,
        &params.device,
        Duration::from_secs(params.timeout),
    )?;
    let exporter = params.output.exporter()?;
    let sampler = Sampler::new(
        Arc::new(client),
        exporter,
        params.sampler_config(),
        chrono::Local::now(),
    );
    sampler.run().await;
    Ok(())
}
