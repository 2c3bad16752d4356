//! Minimal comma-separated output shared by both stages.
//!
//! Rows are written without a header, one record per `\n`-terminated line.
//! A field is quoted only when it contains a delimiter, a quote or a line
//! break, and embedded quotes are doubled.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum CsvError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Anything that can be rendered as one CSV record.
pub trait ToRecord {
    fn to_record(&self) -> Vec<String>;
}

impl ToRecord for (String, u64) {
    fn to_record(&self) -> Vec<String> {
        vec![self.0.clone(), self.1.to_string()]
    }
}

pub struct CsvWriter<W: Write> {
    inner: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> Self {
        CsvWriter { inner }
    }

    pub fn write_record<I, T>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut first = true;
        for field in fields {
            if !first {
                self.inner.write_all(b",")?;
            }
            first = false;
            write_field(&mut self.inner, field.as_ref())?;
        }
        self.inner.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn write_field<W: Write>(out: &mut W, field: &str) -> io::Result<()> {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        return out.write_all(field.as_bytes());
    }

    out.write_all(b"\"")?;
    out.write_all(field.replace('"', "\"\"").as_bytes())?;
    out.write_all(b"\"")
}

/// Creates (or truncates) `path` and writes every row to it.
pub fn write_file<R: ToRecord>(path: &Path, rows: &[R]) -> Result<(), CsvError> {
    let to_err = |source| CsvError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(to_err)?;
    let mut writer = CsvWriter::new(BufWriter::new(file));
    for row in rows {
        writer.write_record(row.to_record()).map_err(to_err)?;
    }
    writer.flush().map_err(to_err)?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Wrote csv file");
    Ok(())
}
