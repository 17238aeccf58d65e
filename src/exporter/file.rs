use crate::error::Error;
use crate::exporter::Exporter;
use crate::format::{Format, Formatter};
use crate::model::Sample;
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
pub struct FileOutput {
    /// Format of the output rows.
    #[clap(short, long)]
    format: Option<Format>,
    /// Path of the log file.
    #[clap()]
    output: PathBuf,
}

impl FileOutput {
    pub fn exporter(&self) -> Result<Box<dyn Exporter>, Error> {
        let exporter = FileExporter::open(
            &self.output,
            self.format.clone().unwrap_or_default().formatter(),
        )?;
        Ok(Box::new(exporter))
    }
}

pub struct FileExporter {
    file: File,
    formatter: Box<dyn Formatter>,
    needs_header: bool,
}

impl FileExporter {
    /// Opens the log for append, creating it if absent. The header goes
    /// in front of the first row only when the file didn't exist yet:
    /// an existing log is only ever grown, never rewritten.
    pub fn open(path: &Path, formatter: Box<dyn Formatter>) -> Result<Self, Error> {
        let needs_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            formatter,
            needs_header,
        })
    }
}

impl Exporter for FileExporter {
    fn handle(&mut self, sample: &Sample) -> Result<(), Error> {
        if self.needs_header {
            if let Some(header) = self.formatter.header() {
                writeln!(self.file, "{}", header)?;
            }
            self.needs_header = false;
        }
        let line = self.formatter.format(sample).map_err(Error::Persistence)?;
        writeln!(self.file, "{}", line)?;
        // the row has to be on disk before the sample is reported logged
        self.file.sync_data()?;
        Ok(())
    }
}
