//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every vbasync operation, whatever UI drives it.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Owns** the host adapter and the loaded configuration
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! Progress goes to the `&mut dyn Listener` passed to each call; pass
//! [`NullListener`](crate::listener::NullListener) to ignore it.
//!
//! ## Generic Over HostAdapter
//!
//! `VbaApi<H: HostAdapter>` is generic over the host backend:
//! - CLI: `VbaApi<SnapshotHost>`
//! - Testing: `VbaApi<MemoryHost>`
//!
//! Methods take `&mut self`, so one API value runs one operation at a time. To
//! run an operation off the calling thread, move the API into
//! [`runner::submit`](crate::runner::submit).

use crate::commands;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::host::HostAdapter;
use crate::listener::Listener;
use std::path::{Path, PathBuf};

pub struct VbaApi<H: HostAdapter> {
    host: H,
    config: SyncConfig,
    config_dir: PathBuf,
}

impl<H: HostAdapter> VbaApi<H> {
    pub fn new(host: H, config: SyncConfig, config_dir: PathBuf) -> Self {
        Self {
            host,
            config,
            config_dir,
        }
    }

    /// Loads the configuration stored in `config_dir` (defaults when absent).
    pub fn open(host: H, config_dir: PathBuf) -> Result<Self> {
        let config = SyncConfig::load(&config_dir)?;
        Ok(Self::new(host, config, config_dir))
    }

    pub fn list(
        &mut self,
        container: &Path,
        folder: Option<&Path>,
        listener: &mut dyn Listener,
    ) -> Result<commands::CmdResult> {
        commands::list::run(&mut self.host, container, folder, &self.config, listener)
    }

    pub fn export<N: AsRef<str>>(
        &mut self,
        container: &Path,
        folder: &Path,
        names: &[N],
        archive: Option<&Path>,
        listener: &mut dyn Listener,
    ) -> Result<commands::CmdResult> {
        let names = owned_names(names);
        commands::export::run(&mut self.host, container, folder, &names, archive, listener)
    }

    pub fn import<N: AsRef<str>>(
        &mut self,
        container: &Path,
        folder: &Path,
        names: &[N],
        listener: &mut dyn Listener,
    ) -> Result<commands::CmdResult> {
        let names = owned_names(names);
        commands::import::run(
            &mut self.host,
            container,
            folder,
            &names,
            &self.config,
            listener,
        )
    }

    pub fn remove(
        &mut self,
        container: &Path,
        listener: &mut dyn Listener,
    ) -> Result<commands::CmdResult> {
        commands::remove::run(&mut self.host, container, listener)
    }

    pub fn init(
        &mut self,
        container: &Path,
        listener: &mut dyn Listener,
    ) -> Result<commands::CmdResult> {
        commands::init::run(&mut self.host, container, listener)
    }

    /// Shows or changes configuration. A successful `Set` also applies to
    /// later operations on this API value.
    pub fn config(&mut self, action: ConfigAction) -> Result<commands::CmdResult> {
        let result = commands::config::run(&self.config_dir, action.clone())?;
        if let (ConfigAction::Set(..), Some(config)) = (&action, &result.config) {
            self.config = config.clone();
        }
        Ok(result)
    }

    pub fn settings(&self) -> &SyncConfig {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

fn owned_names<N: AsRef<str>>(names: &[N]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.as_ref().trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

pub use crate::commands::config::ConfigAction;
pub use commands::{CmdMessage, CmdResult, MessageLevel};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::fixtures::HostFixture;
    use crate::host::memory::MemoryHost;
    use crate::listener::NullListener;
    use crate::model::ComponentKind;
    use std::fs;
    use tempfile::TempDir;

    fn api(host: MemoryHost, dir: &TempDir) -> VbaApi<MemoryHost> {
        VbaApi::open(host, dir.path().join("config")).unwrap()
    }

    #[test]
    fn export_then_import_round_trips_through_a_folder() {
        let dir = TempDir::new().unwrap();
        let (source, source_path) = HostFixture::new("source.docm")
            .with_component("Module1", ComponentKind::StandardModule, "Sub X()\nEnd Sub")
            .with_component("LoginForm", ComponentKind::UserForm, "' form")
            .build();
        let folder = dir.path().join("vba");

        let mut api = api(source.clone(), &dir);
        api.export(&source_path, &folder, &[] as &[&str], None, &mut NullListener)
            .unwrap();

        api.init(Path::new("target.docm"), &mut NullListener).unwrap();
        api.import(
            Path::new("target.docm"),
            &folder,
            &[] as &[&str],
            &mut NullListener,
        )
        .unwrap();

        let listed = api
            .list(Path::new("target.docm"), None, &mut NullListener)
            .unwrap();
        let module = listed
            .project_components
            .iter()
            .find(|c| c.name == "Module1")
            .unwrap();
        assert_eq!(module.code, "Sub X()\nEnd Sub");
        assert_eq!(listed.project_components.len(), 3);
    }

    #[test]
    fn config_set_applies_to_later_scans() {
        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("vba");
        fs::create_dir(&folder).unwrap();
        fs::write(folder.join("Sheet2.bas"), "").unwrap();
        let (host, path) = HostFixture::new("book.xlsm").build();

        let mut api = api(host, &dir);
        api.config(ConfigAction::Set("keywords".into(), "Sheet=Document".into()))
            .unwrap();
        let result = api.list(&path, Some(&folder), &mut NullListener).unwrap();
        assert_eq!(
            result.folder_components[0].kind,
            ComponentKind::DocumentModule
        );
        assert_eq!(api.settings().keywords.len(), 1);
    }

    #[test]
    fn blank_selection_names_are_ignored() {
        assert_eq!(owned_names(&[" A ", "", "B"]), vec!["A", "B"]);
    }
}
