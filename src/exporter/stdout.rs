use crate::error::Error;
use crate::exporter::Exporter;
use crate::format::{Format, Formatter};
use crate::model::Sample;
use clap::Parser;
use std::io::{self, Write};

#[derive(Parser)]
pub struct StdOutOutput {
    /// Format of the output rows.
    #[clap(short, long)]
    format: Option<Format>,
}

impl StdOutOutput {
    pub fn exporter(&self) -> Result<Box<dyn Exporter>, Error> {
        Ok(Box::new(StdOutExporter {
            inner: io::stdout(),
            formatter: self.format.clone().unwrap_or_default().formatter(),
        }))
    }
}

pub struct StdOutExporter {
    inner: io::Stdout,
    formatter: Box<dyn Formatter>,
}

impl Exporter for StdOutExporter {
    fn handle(&mut self, sample: &Sample) -> Result<(), Error> {
        let mut line = self.formatter.format(sample).map_err(Error::Persistence)?;
        line.push_str(super::LINE_ENDING);
        self.inner.write_all(line.as_bytes())?;
        Ok(())
    }
}
