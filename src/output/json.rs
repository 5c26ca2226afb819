use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde_json::{Map, Value};

use crate::output::{Cell, OutputError, Provenance, ResultsWriter};

/// Writes results as a JSON array of objects keyed by column title
///
/// Rows are buffered and written by [`ResultsWriter::finalize`]; the
/// provenance record is not part of the array.
pub struct JsonWriter<W: Write> {
    out: W,
    titles: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl JsonWriter<BufWriter<File>> {
    /// # Errors
    ///
    /// Returns `OutputError::Io` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> JsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            titles: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultsWriter for JsonWriter<W> {
    fn write_header(&mut self, titles: &[&str]) -> Result<(), OutputError> {
        self.titles = titles.iter().map(ToString::to_string).collect();
        Ok(())
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), OutputError> {
        let mut row = Map::new();
        for (title, cell) in self.titles.iter().zip(cells) {
            row.insert(title.clone(), serde_json::to_value(cell)?);
        }
        self.rows.push(row);
        Ok(())
    }

    fn finalize(&mut self, provenance: &Provenance) -> Result<(), OutputError> {
        tracing::debug!("{provenance}");
        serde_json::to_writer_pretty(&mut self.out, &self.rows)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
