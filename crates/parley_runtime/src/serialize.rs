//! World model snapshots in `MessagePack`.
//!
//! A snapshot carries a format version next to the world. Loading always
//! re-stamps the world under a fresh model id, so two processors that load
//! the same file never share entities.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use parley_foundation::{Error, ErrorKind, Result};
use parley_storage::WorldModel;
use serde::{Deserialize, Serialize};

/// Snapshot format written by this version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    world: &'a WorldModel,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    world: WorldModel,
}

fn serialization(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::SerializationError(message.into()))
}

/// Encodes a world snapshot.
///
/// Uses named serialization to preserve struct field names.
pub fn to_bytes(world: &WorldModel) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        world,
    })
    .map_err(|e| serialization(e.to_string()))
}

/// Decodes a world snapshot and re-stamps it.
///
/// # Errors
///
/// Fails on malformed bytes or an unsupported format version.
pub fn from_bytes(bytes: &[u8]) -> Result<WorldModel> {
    let snapshot: Snapshot = rmp_serde::from_slice(bytes).map_err(|e| serialization(e.to_string()))?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(serialization(format!(
            "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
            snapshot.version
        )));
    }
    Ok(snapshot.world.restamped())
}

/// Saves a world snapshot, overwriting any existing file.
pub fn save_to_file<P: AsRef<Path>>(world: &WorldModel, path: P) -> Result<()> {
    let path = path.as_ref();
    let io = |what: &str, e: std::io::Error| {
        Error::new(ErrorKind::IoError(format!(
            "failed to {what} '{}': {e}",
            path.display()
        )))
    };

    let file = File::create(path).map_err(|e| io("create file", e))?;
    let mut writer = BufWriter::new(file);
    let bytes = to_bytes(world)?;
    writer.write_all(&bytes).map_err(|e| io("write to file", e))?;
    writer.flush().map_err(|e| io("flush file", e))?;
    Ok(())
}

/// Loads a world snapshot from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a snapshot.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<WorldModel> {
    let path = path.as_ref();
    let io = |what: &str, e: std::io::Error| {
        Error::new(ErrorKind::IoError(format!(
            "failed to {what} '{}': {e}",
            path.display()
        )))
    };

    let file = File::open(path).map_err(|e| io("open file", e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| io("read file", e))?;
    from_bytes(&bytes)
}
