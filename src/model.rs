use crate::device::StatusDatum;
use crate::error::Error;
use chrono::{DateTime, Local};
use serde::Serializer;

/// Raw power values above this threshold are tenths of a watt, a quirk of
/// some plug firmwares.
const POWER_TENTH_WATT_THRESHOLD: f64 = 10_000.0;

const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchState {
    On,
    Off,
    Unknown,
}

/// One normalized reading of the plug's instantaneous values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub switch: SwitchState,
    pub power_w: f64,
    pub voltage_v: f64,
    pub current_ma: f64,
}

impl Reading {
    /// Build a reading from the loose `code`/`value` pairs of a status
    /// report. Codes we don't know are skipped, codes that are missing
    /// leave their field at zero (or the switch unknown); only a value
    /// that should be numeric but isn't makes the report unusable.
    pub fn from_status(items: &[StatusDatum]) -> Result<Self, Error> {
        let mut reading = Reading {
            switch: SwitchState::Unknown,
            power_w: 0.0,
            voltage_v: 0.0,
            current_ma: 0.0,
        };
        for item in items {
            match item.code.as_str() {
                "switch" | "switch_1" => {
                    reading.switch = if truthy(&item.value) {
                        SwitchState::On
                    } else {
                        SwitchState::Off
                    };
                }
                "cur_power" | "power" => {
                    let mut power = numeric(item)?;
                    if power > POWER_TENTH_WATT_THRESHOLD {
                        power /= 10.0;
                    }
                    reading.power_w = round2(power);
                }
                "cur_voltage" => {
                    reading.voltage_v = round1(numeric(item)? / 10.0);
                }
                "cur_current" => {
                    reading.current_ma = round1(numeric(item)?);
                }
                _ => {}
            }
        }
        Ok(reading)
    }
}

/// One accepted sample: the reading plus the cumulative totals at that
/// instant. Never mutated once built.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Sample {
    #[serde(rename = "time", serialize_with = "time_label")]
    pub timestamp: DateTime<Local>,
    pub switch: SwitchState,
    #[serde(rename = "power")]
    pub power_w: f64,
    #[serde(rename = "voltage")]
    pub voltage_v: f64,
    #[serde(rename = "current")]
    pub current_ma: f64,
    pub energy_kwh_today: f64,
    pub cost_today: f64,
}

impl Sample {
    /// The cumulative fields are rounded here, for display and for the
    /// log; the accumulator itself keeps full precision.
    pub fn build(
        reading: &Reading,
        timestamp: DateTime<Local>,
        energy_kwh_today: f64,
        cost_today: f64,
    ) -> Self {
        Self {
            timestamp,
            switch: reading.switch,
            power_w: reading.power_w,
            voltage_v: reading.voltage_v,
            current_ma: reading.current_ma,
            energy_kwh_today: round4(energy_kwh_today),
            cost_today: round2(cost_today),
        }
    }

    /// Zero-valued point handed to readers of an empty history so charts
    /// have something to draw. Never written to the log.
    pub fn placeholder(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            switch: SwitchState::Unknown,
            power_w: 0.0,
            voltage_v: 0.0,
            current_ma: 0.0,
            energy_kwh_today: 0.0,
            cost_today: 0.0,
        }
    }

    pub fn time_label(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }
}

fn time_label<S: Serializer>(
    timestamp: &DateTime<Local>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIME_FORMAT))
}

fn numeric(item: &StatusDatum) -> Result<f64, Error> {
    item.value
        .as_f64()
        .or_else(|| item.value.as_str().and_then(|value| value.parse().ok()))
        .ok_or_else(|| {
            Error::UpstreamProtocol(format!(
                "non-numeric value for code {:?}: {}",
                item.code, item.value
            ))
        })
}

// Mirrors the loose truthiness of the device payloads: some firmwares
// report the switch as a boolean, others as 0/1.
fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(value) => *value,
        serde_json::Value::Number(value) => value.as_f64().map(|v| v != 0.0).unwrap_or(false),
        serde_json::Value::String(value) => !value.is_empty(),
        serde_json::Value::Array(value) => !value.is_empty(),
        serde_json::Value::Object(value) => !value.is_empty(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round4(value: f64) -> f64 {
    (value * 10000.0).round() / 10000.0
}
