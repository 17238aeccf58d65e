pub(crate) mod csv;
pub(crate) mod json;

use crate::model::Sample;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Format {
    Json,
    Csv,
}

impl Default for Format {
    fn default() -> Self {
        Self::Csv
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown format {:?}", other)),
        }
    }
}

impl Format {
    pub fn formatter(&self) -> Box<dyn Formatter> {
        match self {
            Self::Csv => Box::new(csv::CsvFormatter),
            Self::Json => Box::new(json::JsonFormatter),
        }
    }
}

pub trait Formatter: Send {
    /// Line written once when the output is brand new.
    fn header(&self) -> Option<String> {
        None
    }

    fn format(&self, sample: &Sample) -> Result<String, String>;
}
