use crate::commands::{project_components, scan_folder, tracked, CmdResult};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::host::session::Session;
use crate::host::HostAdapter;
use crate::listener::{Event, Listener, OperationKind};
use std::path::Path;

/// Components of the container and, when given, of a folder. The container is
/// opened read-only.
pub fn run<H: HostAdapter + ?Sized>(
    host: &mut H,
    container: &Path,
    folder: Option<&Path>,
    config: &SyncConfig,
    listener: &mut dyn Listener,
) -> Result<CmdResult> {
    tracked(OperationKind::List, container, listener, |listener| {
        let mut result = CmdResult::default();

        let session = Session::open_read_only(host, container)?;
        listener.on_event(Event::Opened { writable: false });
        let family = session.family();
        let components = project_components(&session, &mut result, listener)?;
        session.close();
        result.project_components = components;

        if let Some(folder) = folder {
            result.folder_components =
                scan_folder(folder, family, config, &mut result, listener)?;
        }

        Ok(result)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::host::memory::fixtures::HostFixture;
    use crate::listener::{NullListener, Recorder};
    use crate::model::ComponentKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_project_in_host_order() {
        let (mut host, path) = HostFixture::new("book.xlsm")
            .with_component("Module1", ComponentKind::StandardModule, "x")
            .with_component("Dialog", ComponentKind::UserForm, "")
            .build();

        let result = run(&mut host, &path, None, &SyncConfig::default(), &mut NullListener)
            .unwrap();
        let names: Vec<_> = result
            .project_components
            .iter()
            .map(|c| c.display_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "ThisWorkbook(Document)",
                "Sheet1(Document)",
                "Module1(Module)",
                "Dialog(UserForm)"
            ]
        );
        assert!(result.folder_components.is_empty());
        assert_eq!(host.close_count(), 1);
    }

    #[test]
    fn unknown_type_is_a_warning_not_an_error() {
        let (mut host, path) = HostFixture::new("doc.docm")
            .with_type_code("Designer", 11)
            .build();
        let mut recorder = Recorder::new();

        let result = run(&mut host, &path, None, &SyncConfig::default(), &mut recorder).unwrap();
        assert_eq!(result.project_components.len(), 1);
        assert!(result.has_warnings());
        assert!(recorder
            .events
            .iter()
            .any(|e| matches!(e, Event::Skipped { item, .. } if item == "Designer")));
    }

    #[test]
    fn includes_folder_components_resolved_for_the_family() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ThisWorkbook.bas"), "' wb").unwrap();
        fs::write(dir.path().join("Helpers.bas"), "").unwrap();
        let (mut host, path) = HostFixture::new("book.xlsm").build();

        let result = run(
            &mut host,
            &path,
            Some(dir.path()),
            &SyncConfig::default(),
            &mut NullListener,
        )
        .unwrap();
        assert_eq!(result.folder_components.len(), 2);
        assert_eq!(result.folder_components[0].name, "Helpers");
        assert_eq!(
            result.folder_components[1].kind,
            ComponentKind::DocumentModule
        );
    }

    #[test]
    fn missing_container_finishes_unsuccessfully() {
        let (mut host, _) = HostFixture::new("doc.docm").build();
        let mut recorder = Recorder::new();
        let err = run(
            &mut host,
            Path::new("other.docm"),
            None,
            &SyncConfig::default(),
            &mut recorder,
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
        assert_eq!(
            recorder.events.last(),
            Some(&Event::Finished {
                operation: OperationKind::List,
                success: false
            })
        );
    }
}
