//! # Folder Scanner
//!
//! Builds a component list from a directory of exported text files. The read
//! path is lenient: a file that cannot be read or decoded is reported in
//! [`ScanReport::skipped`] and the scan moves on.
//!
//! Output is sorted by component name so two scans of the same folder always
//! agree, whatever order the filesystem enumerates entries in.

use crate::error::{Result, SyncError};
use crate::model::{Component, ComponentKind};
use crate::resolve::KindResolver;
use encoding_rs::Encoding;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub components: Vec<Component>,
    pub skipped: Vec<SkippedFile>,
}

/// Decode file contents as UTF-8 (dropping a leading BOM), falling back to
/// `fallback` for legacy files. `None` when neither decoding is clean.
pub fn decode_text(bytes: &[u8], fallback: &'static Encoding) -> Option<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Some(text.strip_prefix('\u{feff}').unwrap_or(text).to_string()),
        Err(_) => fallback
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned()),
    }
}

pub fn scan(dir: &Path, resolver: &KindResolver, fallback: &'static Encoding) -> Result<ScanReport> {
    if !dir.is_dir() {
        return Err(SyncError::NotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|e| SyncError::file_io(dir, e))?;
    Ok(scan_entries(
        dir,
        entries.map(|entry| entry.map(|e| e.path())),
        resolver,
        fallback,
    ))
}

/// Scans the given directory entries. An entry that cannot be read is skipped
/// like any other unreadable file.
fn scan_entries<I>(
    dir: &Path,
    entries: I,
    resolver: &KindResolver,
    fallback: &'static Encoding,
) -> ScanReport
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    let mut report = ScanReport::default();
    let mut found: Vec<(Component, PathBuf)> = Vec::new();

    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("cannot read an entry of {}: {}", dir.display(), e);
                report.skipped.push(SkippedFile {
                    path: dir.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }

        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if ComponentKind::from_extension(ext).is_none() {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            report.skipped.push(SkippedFile {
                path: path.clone(),
                reason: "file name is not valid Unicode".to_string(),
            });
            continue;
        };
        let Some(kind) = resolver.resolve(stem, ext) else {
            continue;
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                report.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let Some(code) = decode_text(&bytes, fallback) else {
            log::warn!(
                "{} is neither UTF-8 nor {}",
                path.display(),
                fallback.name()
            );
            report.skipped.push(SkippedFile {
                path: path.clone(),
                reason: format!("not valid UTF-8 or {}", fallback.name()),
            });
            continue;
        };

        log::debug!("scanned {} as {}", path.display(), kind.label());
        found.push((Component::new(stem, kind, code), path));
    }

    found.sort_by(|(a, pa), (b, pb)| a.name.cmp(&b.name).then_with(|| pa.cmp(pb)));
    for (component, path) in found {
        if report
            .components
            .last()
            .is_some_and(|prev: &Component| prev.same_name(&component))
        {
            report.skipped.push(SkippedFile {
                path,
                reason: format!("duplicate component name '{}'", component.name),
            });
            continue;
        }
        report.components.push(component);
    }

    report
}
