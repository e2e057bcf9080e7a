use std::{fs, io, path::Path};

use crate::error::{FileSystemError, FileSystemResult};

/// Removes a file, treating a missing file as already removed.
///
/// Returns `true` if a file was deleted.
///
/// # Errors
///
/// Returns a [`FileSystemError::File`] if the removal fails for any reason other than
/// the path not existing.
pub fn safe_remove_file<P: AsRef<Path>>(path: P) -> FileSystemResult<bool> {
    let path = path.as_ref();

    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => {
            Err(FileSystemError::File {
                path: path.to_path_buf(),
                action: "remove",
                source: err,
            })
        }
    }
}

/// Reads a whole file into a string, attaching the path to any failure.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> FileSystemResult<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|err| {
        FileSystemError::File {
            path: path.to_path_buf(),
            action: "read",
            source: err,
        }
    })
}
