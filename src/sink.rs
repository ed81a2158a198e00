//! Writing the collected rows out.
//!
//! Every sink writes the same seven columns, headed by [`HEADER`], in the
//! order the rows were collected.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::constants::HEADER;
use crate::error::Result;
use crate::types::Record;

/// Destination for a finished run
pub trait Sink {
    fn write(&mut self, records: &[Record], destination: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

pub fn sink_for(format: OutputFormat, delimiter: char) -> Box<dyn Sink> {
    match format {
        OutputFormat::Csv => Box::new(CsvSink::new(delimiter)),
        OutputFormat::Json => Box::new(JsonSink),
    }
}

/// Hand the rows to a sink, logging where they went
pub fn emit(records: &[Record], sink: &mut dyn Sink, destination: &str) -> Result<()> {
    sink.write(records, destination)?;
    info!("Saved {} rows to {}", records.len(), destination);
    Ok(())
}

fn create_output(destination: &str) -> Result<BufWriter<File>> {
    if let Some(parent) = Path::new(destination).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(destination)?))
}

/// Delimited text, quoted only where a field needs it
pub struct CsvSink {
    delimiter: char,
}

impl CsvSink {
    const ROW_END: &'static str = "\r\n";

    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    fn needs_quotes(&self, field: &str) -> bool {
        field.contains(self.delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r')
    }

    fn write_row<W: Write>(&self, w: &mut W, row: &[&str]) -> io::Result<()> {
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                write!(w, "{}", self.delimiter)?;
            }
            if self.needs_quotes(field) {
                write!(w, "\"{}\"", field.replace('"', "\"\""))?;
            } else {
                w.write_all(field.as_bytes())?;
            }
        }
        w.write_all(Self::ROW_END.as_bytes())
    }

    /// Header line followed by one line per record
    pub fn write_to<W: Write>(&self, w: &mut W, records: &[Record]) -> io::Result<()> {
        self.write_row(w, &HEADER)?;
        for record in records {
            self.write_row(w, &record.fields())?;
        }
        Ok(())
    }
}

impl Default for CsvSink {
    fn default() -> Self {
        Self::new(',')
    }
}

impl Sink for CsvSink {
    fn write(&mut self, records: &[Record], destination: &str) -> Result<()> {
        let mut out = create_output(destination)?;
        self.write_to(&mut out, records)?;
        out.flush()?;
        Ok(())
    }
}

/// Pretty-printed JSON array of objects keyed by the column names
pub struct JsonSink;

impl Sink for JsonSink {
    fn write(&mut self, records: &[Record], destination: &str) -> Result<()> {
        let mut out = create_output(destination)?;
        serde_json::to_writer_pretty(&mut out, records)?;
        out.flush()?;
        Ok(())
    }
}
