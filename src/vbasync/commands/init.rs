use crate::commands::{tracked, CmdMessage, CmdResult};
use crate::error::{Result, SyncError};
use crate::host::family::HostFamily;
use crate::host::HostAdapter;
use crate::listener::{Listener, OperationKind};
use std::path::Path;

pub fn run<H: HostAdapter + ?Sized>(
    host: &mut H,
    container: &Path,
    listener: &mut dyn Listener,
) -> Result<CmdResult> {
    tracked(OperationKind::Init, container, listener, |_| {
        let family = HostFamily::detect(container)
            .ok_or_else(|| SyncError::UnsupportedContainer(container.to_path_buf()))?;
        host.create_container(container, family)?;

        let mut result = CmdResult::default();
        result.add_message(CmdMessage::success(format!(
            "Initialized {} container at {}",
            family,
            container.display()
        )));
        Ok(result)
    })
}
