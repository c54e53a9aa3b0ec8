use crate::commands::{scan_folder, select, tracked, CmdMessage, CmdResult};
use crate::config::SyncConfig;
use crate::error::Result;
use crate::host::session::Session;
use crate::host::HostAdapter;
use crate::listener::{Event, Listener, OperationKind};
use crate::sync::merge;
use crate::upgrade::output_path;
use std::path::Path;

/// Merges the selected folder components (all when `names` is empty) into the
/// container and saves it, switching to the macro-enabled format when needed.
///
/// A failed merge is not saved: the session is dropped, which discards the
/// partial changes, and the container on disk stays as it was.
pub fn run<H: HostAdapter + ?Sized>(
    host: &mut H,
    container: &Path,
    folder: &Path,
    names: &[String],
    config: &SyncConfig,
    listener: &mut dyn Listener,
) -> Result<CmdResult> {
    tracked(OperationKind::Import, container, listener, |listener| {
        let mut result = CmdResult::default();

        let mut session = Session::open_read_only(host, container)?;
        listener.on_event(Event::Opened { writable: false });
        let family = session.family();

        let components = scan_folder(folder, family, config, &mut result, listener)?;
        let selected = select(components, names, &mut result);
        if selected.is_empty() {
            result.add_message(CmdMessage::info("No components to import."));
            return Ok(result);
        }

        session.reopen_writable()?;
        listener.on_event(Event::Opened { writable: true });

        let report = merge(&mut session, &selected, listener)?;

        let target = output_path(container, family.profile());
        let saved = session.save_to(&target.path)?;
        listener.on_event(Event::Saved {
            path: saved.clone(),
            upgraded: target.upgraded,
        });
        session.close();

        result.add_message(CmdMessage::success(format!(
            "Imported {} component(s): {} added, {} updated",
            report.actions.len(),
            report.added(),
            report.updated()
        )));
        if target.upgraded {
            result.add_message(CmdMessage::info(format!(
                "Saved as macro-enabled {}; {} was left unchanged",
                saved.display(),
                container.display()
            )));
        }
        result.saved = Some(saved);
        result.folder_components = selected;
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
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn folder(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn imports_and_saves_in_place() {
        let dir = folder(&[("Module1.bas", "Sub X()\nEnd Sub"), ("Widget.cls", "")]);
        let (mut host, path) = HostFixture::new("doc.docm").build();

        let result = run(
            &mut host,
            &path,
            dir.path(),
            &[],
            &SyncConfig::default(),
            &mut NullListener,
        )
        .unwrap();

        assert_eq!(result.saved, Some(path.clone()));
        let saved = host.container(&path).unwrap();
        assert_eq!(saved.components.len(), 3);
        assert_eq!(host.live_handles(), 0);
        assert_eq!(host.open_count(), host.close_count());
    }

    #[test]
    fn legacy_container_is_saved_as_new_file() {
        let dir = folder(&[("Module1.bas", "x")]);
        let (mut host, path) = HostFixture::new("old.doc").build();
        let before = host.container(&path).unwrap();

        let result = run(
            &mut host,
            &path,
            dir.path(),
            &[],
            &SyncConfig::default(),
            &mut NullListener,
        )
        .unwrap();

        assert_eq!(result.saved, Some(PathBuf::from("old.docm")));
        assert_eq!(host.container(&path).unwrap(), before);
        assert_eq!(
            host.container(Path::new("old.docm")).unwrap().components.len(),
            2
        );
    }

    #[test]
    fn failed_merge_is_not_saved() {
        let dir = folder(&[("Alpha.bas", "a"), ("Beta.bas", "b")]);
        let (mut host, path) = HostFixture::new("doc.docm").build();
        host.fail_on("Beta");
        let before = host.container(&path).unwrap();

        let mut recorder = Recorder::new();
        let err = run(
            &mut host,
            &path,
            dir.path(),
            &[],
            &SyncConfig::default(),
            &mut recorder,
        )
        .unwrap_err();

        assert!(matches!(err, SyncError::Host(_)));
        assert!(host.saved_paths().is_empty());
        assert_eq!(host.container(&path).unwrap(), before);
        assert_eq!(host.live_handles(), 0);
        assert_eq!(
            recorder.events.last(),
            Some(&Event::Finished {
                operation: OperationKind::Import,
                success: false
            })
        );
    }

    #[test]
    fn document_module_without_target_aborts() {
        let dir = folder(&[("ThisWorkbook.bas", "' not for word")]);
        let (mut host, path) = HostFixture::new("doc.docm").build();

        let err = run(
            &mut host,
            &path,
            dir.path(),
            &[],
            &SyncConfig {
                keywords: vec!["ThisWorkbook=Document".parse().unwrap()],
                ..SyncConfig::default()
            },
            &mut NullListener,
        )
        .unwrap_err();
        assert!(matches!(err, SyncError::ModuleNotFound(ref n) if n == "ThisWorkbook"));
    }

    #[test]
    fn selection_limits_imported_components() {
        let dir = folder(&[("Alpha.bas", "a"), ("Beta.bas", "b")]);
        let (mut host, path) = HostFixture::new("doc.docm").build();

        run(
            &mut host,
            &path,
            dir.path(),
            &["Beta".to_string()],
            &SyncConfig::default(),
            &mut NullListener,
        )
        .unwrap();
        let saved = host.container(&path).unwrap();
        assert!(saved.find("Beta").is_some());
        assert!(saved.find("Alpha").is_none());
    }

    #[test]
    fn opens_read_only_then_reopens_writable() {
        let dir = folder(&[("Alpha.bas", "a")]);
        let (mut host, path) = HostFixture::new("doc.docm").build();
        let mut recorder = Recorder::new();

        run(
            &mut host,
            &path,
            dir.path(),
            &[],
            &SyncConfig::default(),
            &mut recorder,
        )
        .unwrap();

        let opened: Vec<_> = recorder
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Opened { writable } => Some(*writable),
                _ => None,
            })
            .collect();
        assert_eq!(opened, vec![false, true]);
        assert_eq!(host.open_count(), 2);
        assert_eq!(host.close_count(), 2);
    }
}
