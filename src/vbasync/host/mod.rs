//! # Host Document Adapters
//!
//! The engine never talks to an office application directly. Everything it
//! needs from a live container goes through the [`HostAdapter`] trait: open a
//! project, list its components, add or rewrite one, save, close.
//!
//! ## Implementations
//!
//! - [`memory::MemoryHost`]: containers held in memory, shared between clones.
//!   Used by tests; counts opens and closes and can inject failures.
//! - [`snapshot::SnapshotHost`]: containers stored on disk as JSON project
//!   snapshots. This is what the CLI drives when no office automation is
//!   available.
//!
//! Host application differences (reserved module names, extensions) are data,
//! not code: see [`family`].
//!
//! ## Handles
//!
//! [`ProjectHandle`] is an opaque token handed out by `open` and consumed by
//! `close`. Callers should not juggle handles themselves: [`session::Session`]
//! owns one and guarantees it is closed exactly once.

use crate::error::Result;
use crate::model::{Component, ComponentKind};
use crate::resolve::kind_from_type_code;
use std::path::{Path, PathBuf};

pub mod family;
pub mod memory;
pub mod session;
pub mod snapshot;

use family::HostFamily;

#[derive(Debug, PartialEq, Eq)]
pub struct ProjectHandle {
    id: u64,
    path: PathBuf,
    writable: bool,
}

impl ProjectHandle {
    pub fn new(id: u64, path: PathBuf, writable: bool) -> Self {
        Self { id, path, writable }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }
}

/// A component as the host reports it, before type resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub name: String,
    pub type_code: i32,
    pub code: String,
}

/// Reference to a live component inside an open project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRef {
    pub name: String,
    pub type_code: i32,
}

impl ComponentRef {
    /// `None` for components whose host type code is not one we know.
    pub fn kind(&self) -> Option<ComponentKind> {
        kind_from_type_code(self.type_code)
    }

    pub fn is_document_module(&self) -> bool {
        self.kind() == Some(ComponentKind::DocumentModule)
    }
}

/// A host entry left out of a listing because its type code is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub name: String,
    pub type_code: i32,
}

#[derive(Debug, Default)]
pub struct Listing {
    pub components: Vec<Component>,
    pub unresolved: Vec<Unresolved>,
}

/// Capability surface of a host application.
pub trait HostAdapter {
    /// Open a container. Fails with `NotFound` or `AccessDenied`.
    fn open(&mut self, path: &Path, writable: bool) -> Result<ProjectHandle>;

    /// Which host application owns the open container.
    fn family(&self, handle: &ProjectHandle) -> Result<HostFamily>;

    /// Raw components in project order.
    fn entries(&self, handle: &ProjectHandle) -> Result<Vec<HostEntry>>;

    /// Exact, case-sensitive lookup by name.
    fn find_component(&self, handle: &ProjectHandle, name: &str) -> Result<Option<ComponentRef>>;

    /// Create a new component. Document modules cannot be created.
    fn add_component(
        &mut self,
        handle: &ProjectHandle,
        kind: ComponentKind,
        name: &str,
        code: &str,
    ) -> Result<ComponentRef>;

    /// Replace the whole code body of an existing component.
    fn update_component(
        &mut self,
        handle: &ProjectHandle,
        component: &ComponentRef,
        code: &str,
    ) -> Result<()>;

    /// Delete a creatable component. Document modules cannot be removed.
    fn remove_component(&mut self, handle: &ProjectHandle, component: &ComponentRef)
        -> Result<()>;

    /// Persist the project to `path` and return where it landed.
    fn save(&mut self, handle: &ProjectHandle, path: &Path) -> Result<PathBuf>;

    /// Release the handle. Unsaved changes are discarded.
    fn close(&mut self, handle: ProjectHandle);

    /// Create an empty container holding the family's intrinsic document modules.
    fn create_container(&mut self, path: &Path, _family: HostFamily) -> Result<()> {
        Err(crate::error::SyncError::Host(format!(
            "This host cannot create containers: {}",
            path.display()
        )))
    }

    /// Components with their type codes resolved. Unknown codes are reported
    /// in [`Listing::unresolved`] instead of failing the listing.
    fn list_components(&self, handle: &ProjectHandle) -> Result<Listing> {
        let mut listing = Listing::default();
        for entry in self.entries(handle)? {
            match kind_from_type_code(entry.type_code) {
                Some(kind) => listing
                    .components
                    .push(Component::new(entry.name, kind, entry.code)),
                None => {
                    log::warn!(
                        "skipping component '{}' with unknown type code {}",
                        entry.name,
                        entry.type_code
                    );
                    listing.unresolved.push(Unresolved {
                        name: entry.name,
                        type_code: entry.type_code,
                    });
                }
            }
        }
        Ok(listing)
    }
}
