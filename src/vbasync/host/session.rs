//! One open project and its lifecycle.
//!
//! ```text
//! Closed → OpenReadOnly → OpenWritable → Modified → Saved → Closed
//! ```
//!
//! Mutations require `OpenWritable` (or a state reached from it). A session
//! opened read-only must go through [`Session::reopen_writable`] first; nothing
//! upgrades the handle implicitly. The handle is released exactly once, either
//! by [`Session::close`] or when the session is dropped on an error path.

use super::family::HostFamily;
use super::{ComponentRef, HostAdapter, Listing, ProjectHandle};
use crate::error::{Result, SyncError};
use crate::model::ComponentKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    OpenReadOnly,
    OpenWritable,
    Modified,
    Saved,
}

pub struct Session<'h, H: HostAdapter + ?Sized> {
    host: &'h mut H,
    handle: Option<ProjectHandle>,
    state: SessionState,
    path: PathBuf,
    family: HostFamily,
}

impl<'h, H: HostAdapter + ?Sized> Session<'h, H> {
    pub fn open_read_only(host: &'h mut H, path: &Path) -> Result<Self> {
        Self::open(host, path, false)
    }

    pub fn open_writable(host: &'h mut H, path: &Path) -> Result<Self> {
        Self::open(host, path, true)
    }

    fn open(host: &'h mut H, path: &Path, writable: bool) -> Result<Self> {
        let handle = host.open(path, writable)?;
        let family = match host.family(&handle) {
            Ok(family) => family,
            Err(e) => {
                host.close(handle);
                return Err(e);
            }
        };
        Ok(Self {
            host,
            handle: Some(handle),
            state: if writable {
                SessionState::OpenWritable
            } else {
                SessionState::OpenReadOnly
            },
            path: path.to_path_buf(),
            family,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Path the container was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn family(&self) -> HostFamily {
        self.family
    }

    fn handle(&self) -> Result<&ProjectHandle> {
        self.handle
            .as_ref()
            .ok_or_else(|| SyncError::InvalidState("session is closed".to_string()))
    }

    /// Close the read-only handle and open the same container writable.
    /// A no-op when the session can already write.
    pub fn reopen_writable(&mut self) -> Result<()> {
        match self.state {
            SessionState::OpenWritable | SessionState::Saved => return Ok(()),
            SessionState::OpenReadOnly => {}
            SessionState::Modified => {
                return Err(SyncError::InvalidState(
                    "cannot reopen a project with unsaved changes".to_string(),
                ))
            }
            SessionState::Closed => {
                return Err(SyncError::InvalidState("session is closed".to_string()))
            }
        }

        if let Some(handle) = self.handle.take() {
            self.host.close(handle);
        }
        self.state = SessionState::Closed;
        log::debug!("reopening {} writable", self.path.display());

        let handle = self.host.open(&self.path, true)?;
        self.handle = Some(handle);
        self.state = SessionState::OpenWritable;
        Ok(())
    }

    fn require_writable(&self) -> Result<()> {
        match self.state {
            SessionState::OpenWritable | SessionState::Modified | SessionState::Saved => Ok(()),
            SessionState::OpenReadOnly => Err(SyncError::InvalidState(
                "project is open read-only; reopen it writable first".to_string(),
            )),
            SessionState::Closed => Err(SyncError::InvalidState("session is closed".to_string())),
        }
    }

    pub fn list_components(&self) -> Result<Listing> {
        self.host.list_components(self.handle()?)
    }

    pub fn find(&self, name: &str) -> Result<Option<ComponentRef>> {
        self.host.find_component(self.handle()?, name)
    }

    pub fn add(&mut self, kind: ComponentKind, name: &str, code: &str) -> Result<ComponentRef> {
        self.require_writable()?;
        let handle = self.handle.as_ref().ok_or_else(closed)?;
        let added = self.host.add_component(handle, kind, name, code)?;
        self.state = SessionState::Modified;
        Ok(added)
    }

    pub fn update(&mut self, component: &ComponentRef, code: &str) -> Result<()> {
        self.require_writable()?;
        let handle = self.handle.as_ref().ok_or_else(closed)?;
        self.host.update_component(handle, component, code)?;
        self.state = SessionState::Modified;
        Ok(())
    }

    pub fn remove(&mut self, component: &ComponentRef) -> Result<()> {
        self.require_writable()?;
        let handle = self.handle.as_ref().ok_or_else(closed)?;
        self.host.remove_component(handle, component)?;
        self.state = SessionState::Modified;
        Ok(())
    }

    pub fn save_to(&mut self, path: &Path) -> Result<PathBuf> {
        self.require_writable()?;
        let handle = self.handle.as_ref().ok_or_else(closed)?;
        let saved = self.host.save(handle, path)?;
        self.state = SessionState::Saved;
        Ok(saved)
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            log::debug!("closing {}", self.path.display());
            self.host.close(handle);
        }
        self.state = SessionState::Closed;
    }
}

fn closed() -> SyncError {
    SyncError::InvalidState("session is closed".to_string())
}

impl<H: HostAdapter + ?Sized> Drop for Session<'_, H> {
    fn drop(&mut self) {
        self.release();
    }
}
