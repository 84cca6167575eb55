//! JSON Lines (JSONL) output writer.
//!
//! One compact JSON object per line, `\n` terminated. Used for training
//! examples, where records are produced slowly and should reach disk as they
//! are generated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Incremental JSONL writer.
///
/// Every record is flushed as soon as it is written so that an interrupted
/// run keeps all completed records.
pub struct JsonlWriter<W: Write> {
    inner: W,
    records: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Creates (or truncates) `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    /// Wraps any writer.
    pub fn new(inner: W) -> Self {
        Self { inner, records: 0 }
    }

    /// Appends one record and flushes.
    pub fn write_record<T: Serialize + ?Sized>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.inner, record)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Writes records to a JSONL file.
///
/// ```jsonl
/// {"context":"...","ending0":"...","label":2}
/// {"context":"...","ending0":"...","label":0}
/// ```
pub fn write_jsonl<T: Serialize>(records: &[T], output_path: impl AsRef<Path>) -> Result<()> {
    let mut writer = JsonlWriter::create(output_path)?;
    for record in records {
        writer.write_record(record)?;
    }
    Ok(())
}

/// Converts records to a JSONL string.
pub fn to_jsonl<T: Serialize>(records: &[T]) -> Result<String> {
    let mut writer = JsonlWriter::new(Vec::new());
    for record in records {
        writer.write_record(record)?;
    }
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
