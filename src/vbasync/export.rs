//! # Exporter
//!
//! Writes components as `name + extension` files. Existing files are
//! overwritten. The first write failure aborts the export; files written before
//! it stay on disk, there is no rollback.

use crate::error::{Result, SyncError};
use crate::listener::{Event, Listener};
use crate::model::Component;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
}

pub fn export(
    components: &[Component],
    dir: &Path,
    listener: &mut dyn Listener,
) -> Result<ExportReport> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| SyncError::file_io(dir, e))?;
        log::info!("created export folder {}", dir.display());
    }

    let mut report = ExportReport::default();
    for component in components {
        let path = dir.join(component.file_name());
        fs::write(&path, &component.code).map_err(|e| SyncError::file_io(&path, e))?;
        listener.on_event(Event::Exported {
            name: component.name.clone(),
            path: path.clone(),
        });
        report.written.push(path);
    }

    Ok(report)
}

/// Same layout as [`export`], bundled into a gzip-compressed tarball under a
/// top-level `prefix/` directory.
pub fn write_archive<W: Write>(writer: W, prefix: &str, components: &[Component]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for component in components {
        let entry_name = format!("{}/{}", prefix, component.file_name());
        let bytes = component.code.as_bytes();

        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();

        tar.append_data(&mut header, entry_name, bytes)
            .map_err(SyncError::Io)?;
    }

    tar.into_inner()
        .map_err(SyncError::Io)?
        .finish()
        .map_err(SyncError::Io)?;
    Ok(())
}
