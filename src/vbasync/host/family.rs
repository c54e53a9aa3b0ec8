//! Per-application host data.
//!
//! Word, Excel and PowerPoint differ only in a handful of facts: which file
//! extensions they open, what their own document module is called, which
//! document modules a fresh container starts with, and which extensions are
//! legacy or macro-incapable. Everything else in the engine is shared.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostFamily {
    Word,
    Excel,
    PowerPoint,
}

#[derive(Debug)]
pub struct HostProfile {
    pub family: HostFamily,
    /// Name of the module that represents the container itself.
    pub reserved_module: &'static str,
    /// Document modules present in a freshly created container.
    pub intrinsic_modules: &'static [&'static str],
    /// Container extensions this host opens (lowercase, with dot).
    pub extensions: &'static [&'static str],
    /// Legacy or macro-incapable extension → macro-enabled replacement.
    pub upgrades: &'static [(&'static str, &'static str)],
}

static WORD: HostProfile = HostProfile {
    family: HostFamily::Word,
    reserved_module: "ThisDocument",
    intrinsic_modules: &["ThisDocument"],
    extensions: &[".docm", ".doc", ".docx", ".dotm", ".dot", ".dotx"],
    upgrades: &[
        (".doc", ".docm"),
        (".docx", ".docm"),
        (".dot", ".dotm"),
        (".dotx", ".dotm"),
    ],
};

static EXCEL: HostProfile = HostProfile {
    family: HostFamily::Excel,
    reserved_module: "ThisWorkbook",
    intrinsic_modules: &["ThisWorkbook", "Sheet1"],
    extensions: &[".xlsm", ".xls", ".xlsx", ".xltm", ".xlt", ".xltx"],
    upgrades: &[
        (".xls", ".xlsm"),
        (".xlsx", ".xlsm"),
        (".xlt", ".xltm"),
        (".xltx", ".xltm"),
    ],
};

static POWERPOINT: HostProfile = HostProfile {
    family: HostFamily::PowerPoint,
    reserved_module: "ThisPresentation",
    intrinsic_modules: &[],
    extensions: &[".pptm", ".ppt", ".pptx", ".potm", ".pot", ".potx"],
    upgrades: &[
        (".ppt", ".pptm"),
        (".pptx", ".pptm"),
        (".pot", ".potm"),
        (".potx", ".potm"),
    ],
};

impl HostFamily {
    pub const ALL: [HostFamily; 3] = [HostFamily::Word, HostFamily::Excel, HostFamily::PowerPoint];

    /// Picks the host application for a container path by its extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = dotted_extension(path)?;
        HostFamily::ALL
            .into_iter()
            .find(|family| family.profile().extensions.contains(&ext.as_str()))
    }

    pub fn profile(&self) -> &'static HostProfile {
        match self {
            HostFamily::Word => &WORD,
            HostFamily::Excel => &EXCEL,
            HostFamily::PowerPoint => &POWERPOINT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostFamily::Word => "Word",
            HostFamily::Excel => "Excel",
            HostFamily::PowerPoint => "PowerPoint",
        }
    }
}

impl fmt::Display for HostFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercased extension including the leading dot, e.g. `".xlsm"`.
pub(crate) fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
}
