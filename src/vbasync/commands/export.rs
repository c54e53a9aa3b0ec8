use crate::commands::{project_components, select, tracked, CmdMessage, CmdResult};
use crate::error::{Result, SyncError};
use crate::export::{export, write_archive};
use crate::host::session::Session;
use crate::host::HostAdapter;
use crate::listener::{Event, Listener, OperationKind};
use std::fs::File;
use std::path::Path;

const DEFAULT_ARCHIVE_PREFIX: &str = "vba";

/// Exports the selected live components (all when `names` is empty) into
/// `folder`, and optionally into a `.tar.gz` archive as well. The container is
/// only read.
pub fn run<H: HostAdapter + ?Sized>(
    host: &mut H,
    container: &Path,
    folder: &Path,
    names: &[String],
    archive: Option<&Path>,
    listener: &mut dyn Listener,
) -> Result<CmdResult> {
    tracked(OperationKind::Export, container, listener, |listener| {
        let mut result = CmdResult::default();

        let session = Session::open_read_only(host, container)?;
        listener.on_event(Event::Opened { writable: false });
        let components = project_components(&session, &mut result, listener)?;
        session.close();

        let selected = select(components, names, &mut result);
        if selected.is_empty() {
            result.add_message(CmdMessage::info("No components to export."));
            return Ok(result);
        }

        let report = export(&selected, folder, listener)?;
        result.written = report.written;
        result.add_message(CmdMessage::success(format!(
            "Exported {} component(s) to {}",
            selected.len(),
            folder.display()
        )));

        if let Some(archive) = archive {
            let prefix = folder
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_ARCHIVE_PREFIX);
            let file = File::create(archive).map_err(|e| SyncError::file_io(archive, e))?;
            write_archive(file, prefix, &selected)?;
            result.written.push(archive.to_path_buf());
            result.add_message(CmdMessage::success(format!(
                "Archived to {}",
                archive.display()
            )));
        }

        result.project_components = selected;
        Ok(result)
    })
}
