//! JSON output writer.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::Result;

/// Writes `bytes` to `path` via a temporary file in the same directory.
///
/// The destination either keeps its previous content or receives all of
/// `bytes`; a crash mid-write never leaves a truncated file behind.
pub fn write_atomic(path: impl AsRef<Path>, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Writes a value as an indented JSON document.
///
/// # Format
/// ```json
/// [
///   {
///     "session_start": "07/02/20, 06:33 PM",
///     "session_end": "07/02/20, 06:40 PM",
///     "exchanges": [ ... ]
///   }
/// ]
/// ```
pub fn write_json<T>(value: &T, output_path: impl AsRef<Path>) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = to_json(value)?;
    write_atomic(output_path, json.as_bytes())
}

/// Converts a value to an indented JSON string.
///
/// Same format as [`write_json`], two-space indent, no trailing newline.
pub fn to_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string_pretty(value)?)
}
