//! File handling around the parser: loading the export and writing the report
//! without overwriting earlier reports.
//!
//! An existing report `NetList.rpt` is renamed to the first free name of
//! `NetList.rpt,0`, `NetList.rpt,1`, ... once the new one is ready to take its place.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::Error;

/// Largest export accepted by [`read_netlist`]
pub const MAX_INPUT_SIZE: u64 = 100 * 1024 * 1024;
/// Backup names `,0` to `,99` are tried
pub const MAX_BACKUPS: usize = 100;
/// Report file name used when none is given
pub const DEFAULT_REPORT_FILE: &str = "NetList.rpt";

/// Read an export as text, bytes that are not UTF-8 are replaced
pub fn read_netlist(path: &Path) -> Result<String, Error> {
    let size = fs::metadata(path)
        .map_err(|e| Error::io(path, e))?
        .len();
    if size > MAX_INPUT_SIZE {
        return Err(Error::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: MAX_INPUT_SIZE,
        });
    }
    info!(
        "Reading '{}' ({:.2} MB)",
        path.display(),
        size as f64 / (1024.0 * 1024.0)
    );
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    })
}

/// `path` with `suffix` appended to the file name
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

pub fn backup_name(path: &Path, index: usize) -> PathBuf {
    with_suffix(path, &format!(",{index}"))
}

fn exists(path: &Path) -> Result<bool, Error> {
    path.try_exists().map_err(|e| Error::io(path, e))
}

/// Move an existing file out of the way.
///
/// Returns the backup name, or `None` if there was nothing to move.
pub fn rotate_existing(path: &Path) -> Result<Option<PathBuf>, Error> {
    if !exists(path)? {
        return Ok(None);
    }
    for index in 0..MAX_BACKUPS {
        let backup = backup_name(path, index);
        if !exists(&backup)? {
            fs::rename(path, &backup).map_err(|e| Error::io(path, e))?;
            info!("Renamed old file to '{}'", backup.display());
            return Ok(Some(backup));
        }
    }
    Err(Error::RotationExhausted(path.to_path_buf()))
}

/// Write the new report, moving any previous one to a backup name.
///
/// The text goes to a temporary sibling first. The old report is only rotated
/// once that write succeeded, so on failure it stays under its name.
pub fn write_report(path: &Path, contents: &str) -> Result<Option<PathBuf>, Error> {
    let partial = with_suffix(path, ".tmp");
    fs::write(&partial, contents).map_err(|e| Error::io(&partial, e))?;

    let backup = match rotate_existing(path) {
        Ok(backup) => backup,
        Err(err) => {
            let _ = fs::remove_file(&partial);
            return Err(err);
        }
    };
    if let Err(err) = fs::rename(&partial, path) {
        let _ = fs::remove_file(&partial);
        if let Some(backup) = &backup {
            if let Err(restore) = fs::rename(backup, path) {
                warn!(
                    "Cannot move '{}' back to '{}': {}",
                    backup.display(),
                    path.display(),
                    restore
                );
            }
        }
        return Err(Error::io(path, err));
    }
    info!("Wrote net-list report file '{}'", path.display());
    Ok(backup)
}
