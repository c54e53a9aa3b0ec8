use super::family::HostFamily;
use super::snapshot::ProjectSnapshot;
use super::{ComponentRef, HostAdapter, HostEntry, ProjectHandle};
use crate::error::{Result, SyncError};
use crate::model::ComponentKind;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// In-memory host for testing and development.
/// Does NOT persist data. Clones share the same containers, so a test can hand
/// one clone to an operation and inspect the outcome through another.
#[derive(Clone, Default)]
pub struct MemoryHost {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    /// What a real host would have on disk.
    containers: HashMap<PathBuf, ProjectSnapshot>,
    open: HashMap<u64, ProjectSnapshot>,
    next_id: u64,
    opens: usize,
    closes: usize,
    saves: Vec<PathBuf>,
    failing_components: Vec<String>,
    fail_saves: bool,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, path: impl Into<PathBuf>, snapshot: ProjectSnapshot) {
        self.state().containers.insert(path.into(), snapshot);
    }

    /// The persisted state of a container, if it exists.
    pub fn container(&self, path: &Path) -> Option<ProjectSnapshot> {
        self.state().containers.get(path).cloned()
    }

    pub fn open_count(&self) -> usize {
        self.state().opens
    }

    pub fn close_count(&self) -> usize {
        self.state().closes
    }

    /// Handles currently open.
    pub fn live_handles(&self) -> usize {
        self.state().open.len()
    }

    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.state().saves.clone()
    }

    /// Make every add or update of `name` fail with a host error.
    pub fn fail_on(&self, name: &str) {
        self.state().failing_components.push(name.to_string());
    }

    pub fn fail_saves(&self) {
        self.state().fail_saves = true;
    }
}

impl MemoryState {
    fn project(&self, handle: &ProjectHandle) -> Result<&ProjectSnapshot> {
        self.open
            .get(&handle.id())
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
            .ok_or_else(|| SyncError::Host("Project handle is not open".to_string()))
    }

    fn check_failure(&self, name: &str) -> Result<()> {
        if self.failing_components.iter().any(|n| n == name) {
            return Err(SyncError::Host(format!("Injected failure for '{}'", name)));
        }
        Ok(())
    }
}

impl HostAdapter for MemoryHost {
    fn open(&mut self, path: &Path, writable: bool) -> Result<ProjectHandle> {
        let mut state = self.state();
        let snapshot = state
            .containers
            .get(path)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(path.to_path_buf()))?;
        if !snapshot.trust_access {
            return Err(SyncError::AccessDenied(format!(
                "Access to the macro project of {} is not trusted",
                path.display()
            )));
        }
        state.next_id += 1;
        state.opens += 1;
        let id = state.next_id;
        state.open.insert(id, snapshot);
        Ok(ProjectHandle::new(id, path.to_path_buf(), writable))
    }

    fn family(&self, handle: &ProjectHandle) -> Result<HostFamily> {
        Ok(self.state().project(handle)?.family)
    }

    fn entries(&self, handle: &ProjectHandle) -> Result<Vec<HostEntry>> {
        Ok(self.state().project(handle)?.entries())
    }

    fn find_component(&self, handle: &ProjectHandle, name: &str) -> Result<Option<ComponentRef>> {
        Ok(self.state().project(handle)?.find(name))
    }

    fn add_component(
        &mut self,
        handle: &ProjectHandle,
        kind: ComponentKind,
        name: &str,
        code: &str,
    ) -> Result<ComponentRef> {
        let mut state = self.state();
        state.check_failure(name)?;
        state.project_mut(handle)?.add(kind, name, code)
    }

    fn update_component(
        &mut self,
        handle: &ProjectHandle,
        component: &ComponentRef,
        code: &str,
    ) -> Result<()> {
        let mut state = self.state();
        state.check_failure(&component.name)?;
        state.project_mut(handle)?.update(component, code)
    }

    fn remove_component(
        &mut self,
        handle: &ProjectHandle,
        component: &ComponentRef,
    ) -> Result<()> {
        let mut state = self.state();
        state.check_failure(&component.name)?;
        state.project_mut(handle)?.remove(component)
    }

    fn save(&mut self, handle: &ProjectHandle, path: &Path) -> Result<PathBuf> {
        let mut state = self.state();
        if state.fail_saves {
            return Err(SyncError::file_io(
                path,
                std::io::Error::other("injected save failure"),
            ));
        }
        let snapshot = state.project_mut(handle)?.clone();
        state.containers.insert(path.to_path_buf(), snapshot);
        state.saves.push(path.to_path_buf());
        Ok(path.to_path_buf())
    }

    fn close(&mut self, handle: ProjectHandle) {
        let mut state = self.state();
        state.closes += 1;
        state.open.remove(&handle.id());
    }

    fn create_container(&mut self, path: &Path, family: HostFamily) -> Result<()> {
        let mut state = self.state();
        if state.containers.contains_key(path) {
            return Err(SyncError::Api(format!(
                "Container already exists: {}",
                path.display()
            )));
        }
        state
            .containers
            .insert(path.to_path_buf(), ProjectSnapshot::new(family));
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::host::snapshot::StoredComponent;
    use crate::resolve::type_code;

    /// Builds a [`MemoryHost`] holding a single container.
    pub struct HostFixture {
        pub host: MemoryHost,
        pub path: PathBuf,
        snapshot: ProjectSnapshot,
    }

    impl HostFixture {
        pub fn new(path: &str) -> Self {
            let path = PathBuf::from(path);
            let family = HostFamily::detect(&path).unwrap_or(HostFamily::Word);
            Self {
                host: MemoryHost::new(),
                path,
                snapshot: ProjectSnapshot::new(family),
            }
        }

        pub fn with_component(mut self, name: &str, kind: ComponentKind, code: &str) -> Self {
            self.snapshot.components.push(StoredComponent {
                name: name.to_string(),
                type_code: type_code(kind),
                code: code.to_string(),
            });
            self
        }

        pub fn with_type_code(mut self, name: &str, code: i32) -> Self {
            self.snapshot.components.push(StoredComponent {
                name: name.to_string(),
                type_code: code,
                code: String::new(),
            });
            self
        }

        pub fn untrusted(mut self) -> Self {
            self.snapshot.trust_access = false;
            self
        }

        pub fn build(self) -> (MemoryHost, PathBuf) {
            self.host.insert(self.path.clone(), self.snapshot);
            (self.host, self.path)
        }
    }
}
