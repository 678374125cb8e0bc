//! Whole-file JSON persistence shared by the loan book, the budget and the
//! savings goals.
//!
//! A save serializes into a temp file created next to the target and then
//! renames it over the target. If anything fails before the rename the temp
//! file is removed when it drops, so no partial file is left behind.

use crate::error::LedgerResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a JSON document, or `None` when the file does not exist
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> LedgerResult<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(value))
}

/// Replace `path` with the pretty-printed JSON of `value`
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> LedgerResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
