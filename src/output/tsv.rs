use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::output::{Cell, OutputError, Provenance, ResultsWriter};

const DELIMITER: char = '\t';
const QUOTE: char = '"';

/// Tab-delimited results, quoting only fields that need it
pub struct TsvWriter<W: Write> {
    out: W,
}

impl TsvWriter<BufWriter<File>> {
    /// # Errors
    ///
    /// Returns `OutputError::Io` if the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, OutputError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> TsvWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_fields<I, S>(&mut self, fields: I) -> Result<(), OutputError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = fields
            .into_iter()
            .map(|f| quote_field(f.as_ref()))
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

impl<W: Write> ResultsWriter for TsvWriter<W> {
    fn write_header(&mut self, titles: &[&str]) -> Result<(), OutputError> {
        self.write_fields(titles)
    }

    fn write_row(&mut self, cells: &[Cell]) -> Result<(), OutputError> {
        self.write_fields(cells.iter().map(ToString::to_string))
    }

    fn finalize(&mut self, provenance: &Provenance) -> Result<(), OutputError> {
        self.write_fields([provenance.to_string()])?;
        self.out.flush()?;
        Ok(())
    }
}

/// Quote a field containing the delimiter, a quote or a line break
fn quote_field(field: &str) -> String {
    if field.contains([DELIMITER, QUOTE, '\n', '\r']) {
        format!("\"{}\"", field.replace(QUOTE, "\"\""))
    } else {
        field.to_string()
    }
}
