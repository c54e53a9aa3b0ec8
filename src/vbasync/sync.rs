//! # Synchronizer
//!
//! Merges a component list (usually a folder scan) into a live project.
//!
//! For each incoming component, in order:
//!
//! - a live component with the same name gets its code replaced; its kind is
//!   never touched
//! - otherwise a creatable kind is added to the project
//! - otherwise (a document module) it is bound to the family's reserved
//!   document module when named exactly after it, or the merge fails with
//!   [`SyncError::ModuleNotFound`]
//!
//! The first failure stops the merge. Components after it are not processed,
//! and whatever was applied before stays applied in the open project; it is up
//! to the caller not to save.

use crate::error::{Result, SyncError};
use crate::host::session::Session;
use crate::host::{ComponentRef, HostAdapter};
use crate::listener::{Event, Listener};
use crate::model::{Component, ComponentKind};

/// Word's document module name, accepted as an alias of the reserved module
/// in every family.
pub const DOCUMENT_KEYWORD: &str = "ThisDocument";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    Added {
        name: String,
        kind: ComponentKind,
    },
    Updated {
        name: String,
    },
    /// An incoming document module written into a live one with another name.
    Bound {
        name: String,
        target: String,
    },
}

#[derive(Debug, Default)]
pub struct MergeReport {
    pub actions: Vec<MergeAction>,
}

impl MergeReport {
    pub fn added(&self) -> usize {
        self.actions
            .iter()
            .filter(|a| matches!(a, MergeAction::Added { .. }))
            .count()
    }

    pub fn updated(&self) -> usize {
        self.actions.len() - self.added()
    }
}

pub fn merge<H: HostAdapter + ?Sized>(
    session: &mut Session<'_, H>,
    incoming: &[Component],
    listener: &mut dyn Listener,
) -> Result<MergeReport> {
    let mut report = MergeReport::default();

    for component in incoming {
        let action = merge_one(session, component)?;
        match &action {
            MergeAction::Added { name, kind } => listener.on_event(Event::Added {
                name: name.clone(),
                kind: *kind,
            }),
            MergeAction::Updated { name } => {
                listener.on_event(Event::Updated { name: name.clone() })
            }
            MergeAction::Bound { name, target } => listener.on_event(Event::Bound {
                name: name.clone(),
                target: target.clone(),
            }),
        }
        report.actions.push(action);
    }

    Ok(report)
}

fn merge_one<H: HostAdapter + ?Sized>(
    session: &mut Session<'_, H>,
    component: &Component,
) -> Result<MergeAction> {
    if let Some(live) = session.find(&component.name)? {
        log::debug!("updating {}", component.display_name());
        session.update(&live, &component.code)?;
        return Ok(MergeAction::Updated {
            name: component.name.clone(),
        });
    }

    if component.kind.is_creatable() {
        log::debug!("adding {}", component.display_name());
        session.add(component.kind, &component.name, &component.code)?;
        return Ok(MergeAction::Added {
            name: component.name.clone(),
            kind: component.kind,
        });
    }

    let target = bind_document_module(session, &component.name)?;
    log::debug!("binding {} to {}", component.name, target.name);
    session.update(&target, &component.code)?;
    Ok(MergeAction::Bound {
        name: component.name.clone(),
        target: target.name,
    })
}

/// Only reached when no live component carries the incoming name. The reserved
/// document module is the one fallback target, and only for an exact name.
fn bind_document_module<H: HostAdapter + ?Sized>(
    session: &Session<'_, H>,
    name: &str,
) -> Result<ComponentRef> {
    let reserved = session.family().profile().reserved_module;
    if name == reserved || name == DOCUMENT_KEYWORD {
        if let Some(live) = session.find(reserved)? {
            if live.is_document_module() {
                return Ok(live);
            }
        }
    }
    Err(SyncError::ModuleNotFound(name.to_string()))
}
