use crate::device::DeviceClient;
use crate::error::Error;
use crate::exporter::Exporter;
use crate::model::{Reading, Sample};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub poll_interval: Duration,
    pub cost_per_kwh: f64,
    pub history_limit: usize,
}

/// Running daily totals. `day` always matches the calendar date of
/// `last_sample_at` while one is set; without one the totals are zero.
#[derive(Debug)]
struct Accumulator {
    energy_kwh_today: f64,
    cost_today: f64,
    last_sample_at: Option<DateTime<Local>>,
    day: NaiveDate,
    poll_interval: Duration,
    cost_per_kwh: f64,
}

impl Accumulator {
    fn new(now: DateTime<Local>, poll_interval: Duration, cost_per_kwh: f64) -> Self {
        Self {
            energy_kwh_today: 0.0,
            cost_today: 0.0,
            last_sample_at: None,
            day: now.date_naive(),
            poll_interval,
            cost_per_kwh,
        }
    }

    /// Zero the totals on the first sample of a new calendar date.
    fn roll_day(&mut self, now: DateTime<Local>) {
        if now.date_naive() != self.day {
            debug!("resetting daily counters for {}", now.date_naive());
            self.day = now.date_naive();
            self.energy_kwh_today = 0.0;
            self.cost_today = 0.0;
            self.last_sample_at = None;
        }
    }

    /// Fold one reading into the totals, charging the reading's power for
    /// the whole elapsed interval. Returns the unrounded cumulative energy
    /// and cost after the update.
    fn integrate(&mut self, reading: &Reading, now: DateTime<Local>) -> (f64, f64) {
        let dt_seconds = match self.last_sample_at {
            None => self.poll_interval.as_secs_f64(),
            Some(last) => {
                let elapsed = (now - last).num_milliseconds() as f64 / 1000.0;
                if elapsed <= 0.0 {
                    // duplicate or out-of-order trigger, charge the nominal
                    // cadence instead of integrating backwards
                    self.poll_interval.as_secs_f64()
                } else {
                    elapsed
                }
            }
        };
        self.energy_kwh_today += reading.power_w * (dt_seconds / 3600.0) / 1000.0;
        self.cost_today = self.energy_kwh_today * self.cost_per_kwh;
        self.last_sample_at = Some(now);
        (self.energy_kwh_today, self.cost_today)
    }
}

/// Fixed-capacity window of the most recent samples, oldest first.
struct History {
    items: VecDeque<Sample>,
    capacity: usize,
}

impl History {
    fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn append(&mut self, sample: Sample) {
        if self.items.len() >= self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(sample);
    }

    fn latest(&self) -> Option<&Sample> {
        self.items.back()
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Owned copy: later appends never touch a snapshot a reader already
    /// holds.
    fn snapshot(&self) -> Vec<Sample> {
        self.items.iter().cloned().collect()
    }
}

/// The totals, the history and the log handle form one resource group:
/// they only ever change together, under the sampler's lock.
struct Shared {
    accumulator: Accumulator,
    history: History,
    log: Box<dyn Exporter>,
}

pub struct Sampler {
    client: Arc<dyn DeviceClient>,
    poll_interval: Duration,
    shared: Mutex<Shared>,
}

impl Sampler {
    pub fn new(
        client: Arc<dyn DeviceClient>,
        log: Box<dyn Exporter>,
        config: SamplerConfig,
        now: DateTime<Local>,
    ) -> Self {
        Self {
            client,
            poll_interval: config.poll_interval,
            shared: Mutex::new(Shared {
                accumulator: Accumulator::new(now, config.poll_interval, config.cost_per_kwh),
                history: History::new(config.history_limit),
                log,
            }),
        }
    }

    /// Take one sample now. Concurrent callers are serialized, so no two
    /// attempts can interleave their integration, and a failed fetch or an
    /// unusable payload leaves totals, history and log exactly as they
    /// were. A failed log append does not reject the sample: durability
    /// is best effort.
    pub async fn attempt_sample(&self, now: DateTime<Local>) -> Result<Sample, Error> {
        let mut shared = self.shared.lock().await;
        let status = self.client.get_status().await?;
        let reading = Reading::from_status(&status)?;
        shared.accumulator.roll_day(now);
        let (energy_kwh, cost) = shared.accumulator.integrate(&reading, now);
        let sample = Sample::build(&reading, now, energy_kwh, cost);
        shared.history.append(sample.clone());
        if let Err(err) = shared.log.handle(&sample) {
            warn!("couldn't append sample to the log: {}", err);
        }
        Ok(sample)
    }

    /// Most recent accepted sample, if there is one.
    pub async fn latest(&self) -> Option<Sample> {
        self.shared.lock().await.history.latest().cloned()
    }

    /// Snapshot of the recent samples, oldest first. An empty buffer is
    /// seeded with a single zero-valued point so a fresh chart has
    /// something to draw; that point never reaches the log.
    pub async fn history(&self) -> Vec<Sample> {
        let mut shared = self.shared.lock().await;
        if shared.history.is_empty() {
            shared.history.append(Sample::placeholder(Local::now()));
        }
        shared.history.snapshot()
    }

    /// Poll the device forever at the configured cadence. Every attempt is
    /// independent: a failure is reported and the loop keeps going.
    pub async fn run(&self) {
        loop {
            match self.attempt_sample(Local::now()).await {
                Ok(sample) => info!(
                    "logged {}W at {}, {}kWh today",
                    sample.power_w,
                    sample.time_label(),
                    sample.energy_kwh_today
                ),
                Err(err) => warn!("sampling attempt failed: {}", err),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
