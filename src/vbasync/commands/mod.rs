use crate::config::SyncConfig;
use crate::error::Result;
use crate::host::family::HostFamily;
use crate::host::session::Session;
use crate::host::HostAdapter;
use crate::listener::{Event, Listener, OperationKind};
use crate::model::Component;
use crate::resolve::KindResolver;
use crate::scan;
use std::path::{Path, PathBuf};

pub mod config;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod remove;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Components of the live project.
    pub project_components: Vec<Component>,
    /// Components found in the folder.
    pub folder_components: Vec<Component>,
    /// Files written by an export, archive included.
    pub written: Vec<PathBuf>,
    /// Where the container was saved, when it was.
    pub saved: Option<PathBuf>,
    pub config: Option<SyncConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_project_components(mut self, components: Vec<Component>) -> Self {
        self.project_components = components;
        self
    }

    pub fn with_folder_components(mut self, components: Vec<Component>) -> Self {
        self.folder_components = components;
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Warning)
    }
}

/// Keeps the components named in `names`, in their original order. An empty
/// selection keeps everything. Names that match nothing produce a warning.
pub(crate) fn select(
    components: Vec<Component>,
    names: &[String],
    result: &mut CmdResult,
) -> Vec<Component> {
    if names.is_empty() {
        return components;
    }
    for name in names {
        if !components.iter().any(|c| &c.name == name) {
            result.add_message(CmdMessage::warning(format!(
                "No component named '{}'",
                name
            )));
        }
    }
    components
        .into_iter()
        .filter(|c| names.contains(&c.name))
        .collect()
}

/// Scans `folder` with the keyword rules of `family` plus the configured ones.
/// Skipped files become warnings and `Skipped` events.
pub(crate) fn scan_folder(
    folder: &Path,
    family: HostFamily,
    config: &SyncConfig,
    result: &mut CmdResult,
    listener: &mut dyn Listener,
) -> Result<Vec<Component>> {
    let resolver = KindResolver::for_family(family, &config.keywords);
    let report = scan::scan(folder, &resolver, config.encoding()?)?;
    for skipped in report.skipped {
        let item = skipped.path.display().to_string();
        result.add_message(CmdMessage::warning(format!(
            "Skipped {}: {}",
            item, skipped.reason
        )));
        listener.on_event(Event::Skipped {
            item,
            reason: skipped.reason,
        });
    }
    Ok(report.components)
}

/// Live components of the project. Unknown component types become warnings
/// and `Skipped` events.
pub(crate) fn project_components<H: HostAdapter + ?Sized>(
    session: &Session<'_, H>,
    result: &mut CmdResult,
    listener: &mut dyn Listener,
) -> Result<Vec<Component>> {
    let listing = session.list_components()?;
    for unresolved in listing.unresolved {
        let reason = format!("unsupported component type {}", unresolved.type_code);
        result.add_message(CmdMessage::warning(format!(
            "Skipped {}: {}",
            unresolved.name, reason
        )));
        listener.on_event(Event::Skipped {
            item: unresolved.name,
            reason,
        });
    }
    Ok(listing.components)
}

/// Brackets an operation with `Started` and `Finished` events. A failure is
/// reported as `Failed` before `Finished`.
pub(crate) fn tracked<T>(
    operation: OperationKind,
    container: &Path,
    listener: &mut dyn Listener,
    body: impl FnOnce(&mut dyn Listener) -> Result<T>,
) -> Result<T> {
    listener.on_event(Event::Started {
        operation,
        container: container.to_path_buf(),
    });
    log::debug!("{} {}", operation, container.display());

    let outcome = body(&mut *listener);
    if let Err(e) = &outcome {
        log::warn!("{} failed: {}", operation, e);
        listener.on_event(Event::Failed {
            message: e.to_string(),
        });
    }
    listener.on_event(Event::Finished {
        operation,
        success: outcome.is_ok(),
    });
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::listener::Recorder;
    use crate::model::ComponentKind;

    fn components() -> Vec<Component> {
        ["A", "B", "C"]
            .into_iter()
            .map(|n| Component::new(n, ComponentKind::StandardModule, ""))
            .collect()
    }

    #[test]
    fn empty_selection_keeps_all() {
        let mut result = CmdResult::default();
        assert_eq!(select(components(), &[], &mut result).len(), 3);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn selection_filters_and_warns_on_unknown() {
        let mut result = CmdResult::default();
        let picked = select(
            components(),
            &["C".to_string(), "A".to_string(), "Z".to_string()],
            &mut result,
        );
        let names: Vec<_> = picked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert!(result.has_warnings());
    }

    #[test]
    fn tracked_reports_failure_then_finish() {
        let mut recorder = Recorder::new();
        let outcome: Result<()> = tracked(
            OperationKind::Remove,
            Path::new("a.docm"),
            &mut recorder,
            |_| Err(SyncError::Host("boom".into())),
        );
        assert!(outcome.is_err());
        assert_eq!(recorder.events.len(), 3);
        assert!(matches!(recorder.events[1], Event::Failed { .. }));
        assert_eq!(
            recorder.events[2],
            Event::Finished {
                operation: OperationKind::Remove,
                success: false
            }
        );
    }
}
