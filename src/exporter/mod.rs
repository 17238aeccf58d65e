mod file;
mod stdout;

use crate::error::Error;
use crate::model::Sample;
use clap::Parser;

const LINE_ENDING: &str = "\n";

pub trait Exporter: Send {
    fn handle(&mut self, sample: &Sample) -> Result<(), Error>;
}

#[derive(Parser)]
pub enum Output {
    /// Append the samples to a log file.
    #[clap()]
    File(file::FileOutput),
    /// Write the samples to standard output.
    #[clap()]
    Stdout(stdout::StdOutOutput),
}

impl Output {
    pub fn exporter(&self) -> Result<Box<dyn Exporter>, Error> {
        match self {
            Self::File(file) => file.exporter(),
            Self::Stdout(stdout) => stdout.exporter(),
        }
    }
}
