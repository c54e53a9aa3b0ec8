//! File-backed host.
//!
//! A container is a JSON document describing its macro project:
//!
//! ```text
//! {
//!   "family": "Excel",
//!   "trust_access": true,
//!   "saved_at": "2026-01-05T10:00:00Z",
//!   "components": [
//!     { "name": "ThisWorkbook", "type": 100, "code": "" },
//!     { "name": "Module1", "type": 1, "code": "Sub X()\nEnd Sub" }
//!   ]
//! }
//! ```
//!
//! `type` carries the host type code, so unknown component types survive a
//! round trip untouched. Open projects are working copies: nothing reaches the
//! disk until `save`, and `close` without `save` discards changes.

use super::family::HostFamily;
use super::{ComponentRef, HostAdapter, HostEntry, ProjectHandle};
use crate::error::{Result, SyncError};
use crate::model::ComponentKind;
use crate::resolve::{type_code, TYPE_DOCUMENT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub type_code: i32,
    #[serde(default)]
    pub code: String,
}

/// The macro project of one container, as held by the file-backed and
/// in-memory hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub family: HostFamily,
    /// Mirrors the host's "trust access to the project object model" setting.
    #[serde(default = "default_trust_access")]
    pub trust_access: bool,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub components: Vec<StoredComponent>,
}

fn default_trust_access() -> bool {
    true
}

impl ProjectSnapshot {
    /// An empty project with the family's intrinsic document modules.
    pub fn new(family: HostFamily) -> Self {
        let components = family
            .profile()
            .intrinsic_modules
            .iter()
            .map(|name| StoredComponent {
                name: name.to_string(),
                type_code: TYPE_DOCUMENT,
                code: String::new(),
            })
            .collect();
        Self {
            family,
            trust_access: true,
            saved_at: None,
            components,
        }
    }

    pub fn entries(&self) -> Vec<HostEntry> {
        self.components
            .iter()
            .map(|c| HostEntry {
                name: c.name.clone(),
                type_code: c.type_code,
                code: c.code.clone(),
            })
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<ComponentRef> {
        self.components
            .iter()
            .find(|c| c.name == name)
            .map(|c| ComponentRef {
                name: c.name.clone(),
                type_code: c.type_code,
            })
    }

    pub fn add(&mut self, kind: ComponentKind, name: &str, code: &str) -> Result<ComponentRef> {
        if !kind.is_creatable() {
            return Err(SyncError::UnsupportedType {
                name: name.to_string(),
                code: type_code(kind),
            });
        }
        if name.is_empty() {
            return Err(SyncError::Host("Component name cannot be empty".to_string()));
        }
        if self.find(name).is_some() {
            return Err(SyncError::Host(format!(
                "A component named '{}' already exists",
                name
            )));
        }
        self.components.push(StoredComponent {
            name: name.to_string(),
            type_code: type_code(kind),
            code: code.to_string(),
        });
        Ok(ComponentRef {
            name: name.to_string(),
            type_code: type_code(kind),
        })
    }

    pub fn update(&mut self, component: &ComponentRef, code: &str) -> Result<()> {
        let stored = self
            .components
            .iter_mut()
            .find(|c| c.name == component.name)
            .ok_or_else(|| {
                SyncError::Host(format!("Component '{}' no longer exists", component.name))
            })?;
        stored.code.clear();
        stored.code.push_str(code);
        Ok(())
    }

    pub fn remove(&mut self, component: &ComponentRef) -> Result<()> {
        let index = self
            .components
            .iter()
            .position(|c| c.name == component.name)
            .ok_or_else(|| {
                SyncError::Host(format!("Component '{}' no longer exists", component.name))
            })?;
        if self.components[index].type_code == TYPE_DOCUMENT {
            return Err(SyncError::Host(format!(
                "Document module '{}' cannot be removed",
                component.name
            )));
        }
        self.components.remove(index);
        Ok(())
    }
}

pub fn load_snapshot(path: &Path) -> Result<ProjectSnapshot> {
    if !path.is_file() {
        return Err(SyncError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|e| SyncError::file_io(path, e))?;
    let snapshot: ProjectSnapshot =
        serde_json::from_str(&content).map_err(SyncError::Serialization)?;
    Ok(snapshot)
}

/// Writes through a temporary file, then renames over `path`.
pub fn write_snapshot(path: &Path, snapshot: &ProjectSnapshot) -> Result<()> {
    let content = serde_json::to_string_pretty(snapshot).map_err(SyncError::Serialization)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, content).map_err(|e| SyncError::file_io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| SyncError::file_io(path, e))?;
    Ok(())
}

struct OpenProject {
    working: ProjectSnapshot,
}

#[derive(Default)]
pub struct SnapshotHost {
    open: HashMap<u64, OpenProject>,
    next_id: u64,
}

impl SnapshotHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn project(&self, handle: &ProjectHandle) -> Result<&ProjectSnapshot> {
        self.open
            .get(&handle.id())
            .map(|p| &p.working)
            .ok_or_else(|| SyncError::Host("Project handle is not open".to_string()))
    }

    fn project_mut(&mut self, handle: &ProjectHandle) -> Result<&mut ProjectSnapshot> {
        if !handle.is_writable() {
            return Err(SyncError::AccessDenied(format!(
                "{} is open read-only",
                handle.path().display()
            )));
        }
        self.open
            .get_mut(&handle.id())
            .map(|p| &mut p.working)
            .ok_or_else(|| SyncError::Host("Project handle is not open".to_string()))
    }
}

impl HostAdapter for SnapshotHost {
    fn open(&mut self, path: &Path, writable: bool) -> Result<ProjectHandle> {
        let snapshot = load_snapshot(path)?;
        if !snapshot.trust_access {
            return Err(SyncError::AccessDenied(format!(
                "Access to the macro project of {} is not trusted",
                path.display()
            )));
        }
        self.next_id += 1;
        let id = self.next_id;
        self.open.insert(id, OpenProject { working: snapshot });
        log::debug!("opened {} (id={} writable={})", path.display(), id, writable);
        Ok(ProjectHandle::new(id, path.to_path_buf(), writable))
    }

    fn family(&self, handle: &ProjectHandle) -> Result<HostFamily> {
        Ok(self.project(handle)?.family)
    }

    fn entries(&self, handle: &ProjectHandle) -> Result<Vec<HostEntry>> {
        Ok(self.project(handle)?.entries())
    }

    fn find_component(&self, handle: &ProjectHandle, name: &str) -> Result<Option<ComponentRef>> {
        Ok(self.project(handle)?.find(name))
    }

    fn add_component(
        &mut self,
        handle: &ProjectHandle,
        kind: ComponentKind,
        name: &str,
        code: &str,
    ) -> Result<ComponentRef> {
        self.project_mut(handle)?.add(kind, name, code)
    }

    fn update_component(
        &mut self,
        handle: &ProjectHandle,
        component: &ComponentRef,
        code: &str,
    ) -> Result<()> {
        self.project_mut(handle)?.update(component, code)
    }

    fn remove_component(
        &mut self,
        handle: &ProjectHandle,
        component: &ComponentRef,
    ) -> Result<()> {
        self.project_mut(handle)?.remove(component)
    }

    fn save(&mut self, handle: &ProjectHandle, path: &Path) -> Result<PathBuf> {
        let project = self.project_mut(handle)?;
        project.saved_at = Some(Utc::now());
        let snapshot = project.clone();
        write_snapshot(path, &snapshot)?;
        log::debug!("saved {} to {}", handle.path().display(), path.display());
        Ok(path.to_path_buf())
    }

    fn close(&mut self, handle: ProjectHandle) {
        if self.open.remove(&handle.id()).is_none() {
            log::warn!("close called for unknown handle id={}", handle.id());
        }
    }

    fn create_container(&mut self, path: &Path, family: HostFamily) -> Result<()> {
        if path.exists() {
            return Err(SyncError::Api(format!(
                "Container already exists: {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| SyncError::file_io(parent, e))?;
            }
        }
        write_snapshot(path, &ProjectSnapshot::new(family))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn container(dir: &TempDir, name: &str, family: HostFamily) -> PathBuf {
        let path = dir.path().join(name);
        SnapshotHost::new().create_container(&path, family).unwrap();
        path
    }

    #[test]
    fn new_container_has_intrinsic_modules() {
        let dir = TempDir::new().unwrap();
        let path = container(&dir, "book.xlsm", HostFamily::Excel);

        let snapshot = load_snapshot(&path).unwrap();
        let names: Vec<_> = snapshot.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ThisWorkbook", "Sheet1"]);
        assert!(snapshot.components.iter().all(|c| c.type_code == TYPE_DOCUMENT));
    }

    #[test]
    fn open_missing_container_is_not_found() {
        let dir = TempDir::new().unwrap();
        let mut host = SnapshotHost::new();
        let err = host.open(&dir.path().join("nope.docm"), false).unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
    }

    #[test]
    fn untrusted_container_is_access_denied() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("locked.docm");
        let mut snapshot = ProjectSnapshot::new(HostFamily::Word);
        snapshot.trust_access = false;
        write_snapshot(&path, &snapshot).unwrap();

        let err = SnapshotHost::new().open(&path, false).unwrap_err();
        assert!(matches!(err, SyncError::AccessDenied(_)));
    }

    #[test]
    fn read_only_handle_rejects_mutation() {
        let dir = TempDir::new().unwrap();
        let path = container(&dir, "doc.docm", HostFamily::Word);
        let mut host = SnapshotHost::new();
        let handle = host.open(&path, false).unwrap();

        let err = host
            .add_component(&handle, ComponentKind::StandardModule, "M", "")
            .unwrap_err();
        assert!(matches!(err, SyncError::AccessDenied(_)));
        host.close(handle);
    }

    #[test]
    fn changes_reach_disk_only_on_save() {
        let dir = TempDir::new().unwrap();
        let path = container(&dir, "doc.docm", HostFamily::Word);
        let mut host = SnapshotHost::new();

        let handle = host.open(&path, true).unwrap();
        host.add_component(&handle, ComponentKind::ClassModule, "Parser", "x")
            .unwrap();
        host.close(handle);
        assert_eq!(load_snapshot(&path).unwrap().components.len(), 1);

        let handle = host.open(&path, true).unwrap();
        host.add_component(&handle, ComponentKind::ClassModule, "Parser", "x")
            .unwrap();
        let saved = host.save(&handle, &path).unwrap();
        host.close(handle);
        assert_eq!(saved, path);

        let snapshot = load_snapshot(&path).unwrap();
        assert_eq!(snapshot.components.len(), 2);
        assert!(snapshot.saved_at.is_some());
        assert!(!dir.path().join("doc.docm.tmp").exists());
    }

    #[test]
    fn snapshot_rejects_document_module_creation_and_removal() {
        let mut snapshot = ProjectSnapshot::new(HostFamily::Word);
        let err = snapshot
            .add(ComponentKind::DocumentModule, "Other", "")
            .unwrap_err();
        assert!(matches!(err, SyncError::UnsupportedType { code: 100, .. }));

        let this_doc = snapshot.find("ThisDocument").unwrap();
        assert!(snapshot.remove(&this_doc).is_err());
    }

    #[test]
    fn snapshot_rejects_duplicate_names() {
        let mut snapshot = ProjectSnapshot::new(HostFamily::PowerPoint);
        snapshot.add(ComponentKind::StandardModule, "M", "").unwrap();
        assert!(snapshot.add(ComponentKind::ClassModule, "M", "").is_err());
    }

    #[test]
    fn unknown_type_codes_survive_round_trip() {
        let json = r#"{
            "family": "Excel",
            "components": [{ "name": "Designer1", "type": 11, "code": "" }]
        }"#;
        let snapshot: ProjectSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.trust_access);
        let back = serde_json::to_string(&snapshot).unwrap();
        assert!(back.contains("\"type\":11"));
    }
}
