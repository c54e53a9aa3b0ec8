use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four kinds of code unit a macro project can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    StandardModule,
    ClassModule,
    UserForm,
    /// Intrinsic to the container (the document itself, a sheet). Never created
    /// or deleted by this crate, only rewritten.
    DocumentModule,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::StandardModule,
        ComponentKind::ClassModule,
        ComponentKind::UserForm,
        ComponentKind::DocumentModule,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ComponentKind::StandardModule | ComponentKind::DocumentModule => ".bas",
            ComponentKind::ClassModule => ".cls",
            ComponentKind::UserForm => ".frm",
        }
    }

    /// Kind implied by a file extension alone. Accepts the extension with or
    /// without the leading dot, in any case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "bas" => Some(ComponentKind::StandardModule),
            "cls" => Some(ComponentKind::ClassModule),
            "frm" => Some(ComponentKind::UserForm),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComponentKind::StandardModule => "Module",
            ComponentKind::ClassModule => "Class",
            ComponentKind::UserForm => "UserForm",
            ComponentKind::DocumentModule => "Document",
        }
    }

    pub fn is_creatable(&self) -> bool {
        !matches!(self, ComponentKind::DocumentModule)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ComponentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "module" | "standard" | "standardmodule" => Ok(ComponentKind::StandardModule),
            "class" | "classmodule" => Ok(ComponentKind::ClassModule),
            "form" | "userform" => Ok(ComponentKind::UserForm),
            "document" | "documentmodule" => Ok(ComponentKind::DocumentModule),
            other => Err(format!("Unknown component kind: {}", other)),
        }
    }
}

/// One named unit of macro code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub code: String,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            code: code.into(),
        }
    }

    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }

    pub fn file_name(&self) -> String {
        format!("{}{}", self.name, self.kind.extension())
    }

    pub fn display_name(&self) -> String {
        format!("{}({})", self.name, self.kind.label())
    }

    /// Merge identity. Content is deliberately not compared.
    pub fn same_name(&self, other: &Component) -> bool {
        self.name == other.name
    }
}
