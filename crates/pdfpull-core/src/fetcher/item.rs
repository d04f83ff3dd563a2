//! Single item: stream one response into `<name>.part`, then rename onto the destination.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::outcome::{classify, ItemError};
use crate::transport::{FetchRequest, Transport};
use crate::url_model::part_path;

fn io_error(action: &str, path: &Path, e: io::Error) -> ItemError {
    ItemError::Unexpected(format!("{} {}: {}", action, path.display(), e))
}

/// Downloads `request` into `destination`. On failure nothing is left on disk for this item.
pub(super) fn download_to<T: Transport + ?Sized>(
    transport: &mut T,
    request: &FetchRequest<'_>,
    destination: &Path,
) -> Result<u64, ItemError> {
    let part = part_path(destination);
    let mut file: Option<File> = None;
    let mut written = 0u64;

    let result = transport.get(request, &mut |chunk: &[u8]| -> io::Result<()> {
        // keep-alive / empty reads carry nothing
        if chunk.is_empty() {
            return Ok(());
        }
        if file.is_none() {
            file = Some(File::create(&part)?);
        }
        if let Some(f) = file.as_mut() {
            f.write_all(chunk)?;
        }
        written += chunk.len() as u64;
        Ok(())
    });

    if let Err(e) = result {
        drop(file);
        discard(&part);
        return Err(classify(&e));
    }

    // A 2xx with an empty body still produces an (empty) file.
    let file = match file {
        Some(f) => f,
        None => File::create(&part).map_err(|e| io_error("create", &part, e))?,
    };
    if let Err(e) = file.sync_all() {
        drop(file);
        discard(&part);
        return Err(io_error("sync", &part, e));
    }
    drop(file);
    if let Err(e) = fs::rename(&part, destination) {
        discard(&part);
        return Err(io_error("rename", &part, e));
    }
    Ok(written)
}

pub(super) fn discard(part: &Path) {
    match fs::remove_file(part) {
        Ok(()) => tracing::debug!("removed partial file {}", part.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("could not remove partial file {}: {}", part.display(), e),
    }
}
