use crate::commands::{project_components, tracked, CmdMessage, CmdResult};
use crate::error::Result;
use crate::host::session::Session;
use crate::host::{ComponentRef, HostAdapter};
use crate::listener::{Event, Listener, OperationKind};
use crate::resolve::type_code;
use std::path::Path;

/// Strips all macro code from the container: creatable components are
/// deleted, document modules are emptied. Saved in place. Components of an
/// unknown type are left alone.
pub fn run<H: HostAdapter + ?Sized>(
    host: &mut H,
    container: &Path,
    listener: &mut dyn Listener,
) -> Result<CmdResult> {
    tracked(OperationKind::Remove, container, listener, |listener| {
        let mut result = CmdResult::default();

        let mut session = Session::open_read_only(host, container)?;
        listener.on_event(Event::Opened { writable: false });
        let components = project_components(&session, &mut result, listener)?;

        session.reopen_writable()?;
        listener.on_event(Event::Opened { writable: true });

        let mut removed = 0;
        let mut cleared = 0;
        for component in &components {
            let live = ComponentRef {
                name: component.name.clone(),
                type_code: type_code(component.kind),
            };
            if component.kind.is_creatable() {
                session.remove(&live)?;
                listener.on_event(Event::Removed {
                    name: component.name.clone(),
                });
                removed += 1;
            } else {
                session.update(&live, "")?;
                listener.on_event(Event::Updated {
                    name: component.name.clone(),
                });
                cleared += 1;
            }
        }

        if removed + cleared == 0 {
            result.add_message(CmdMessage::info("No macro code to remove."));
            session.close();
            return Ok(result);
        }

        let saved = session.save_to(container)?;
        listener.on_event(Event::Saved {
            path: saved.clone(),
            upgraded: false,
        });
        session.close();

        result.add_message(CmdMessage::success(format!(
            "Removed {} component(s), cleared {} document module(s)",
            removed, cleared
        )));
        result.saved = Some(saved);
        Ok(result)
    })
}
