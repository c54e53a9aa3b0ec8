//! # Component Type Resolution
//!
//! Two independent sources decide a component's kind:
//!
//! 1. **Host type codes** when reading a live project. The host reports an
//!    integer per component; codes outside the known set are unresolved and the
//!    component is left out of the listing.
//! 2. **File names** when scanning a folder. A keyword found anywhere in the
//!    file stem overrides whatever the extension says; otherwise the extension
//!    decides.
//!
//! The keyword rule exists because `.bas` is shared by standard modules and
//! document modules, so the extension alone cannot tell them apart.

use crate::host::family::HostFamily;
use crate::model::ComponentKind;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TYPE_STD_MODULE: i32 = 1;
pub const TYPE_CLASS_MODULE: i32 = 2;
pub const TYPE_MS_FORM: i32 = 3;
pub const TYPE_DOCUMENT: i32 = 100;

pub fn kind_from_type_code(code: i32) -> Option<ComponentKind> {
    match code {
        TYPE_STD_MODULE => Some(ComponentKind::StandardModule),
        TYPE_CLASS_MODULE => Some(ComponentKind::ClassModule),
        TYPE_MS_FORM => Some(ComponentKind::UserForm),
        TYPE_DOCUMENT => Some(ComponentKind::DocumentModule),
        _ => None,
    }
}

pub fn type_code(kind: ComponentKind) -> i32 {
    match kind {
        ComponentKind::StandardModule => TYPE_STD_MODULE,
        ComponentKind::ClassModule => TYPE_CLASS_MODULE,
        ComponentKind::UserForm => TYPE_MS_FORM,
        ComponentKind::DocumentModule => TYPE_DOCUMENT,
    }
}

/// A file-name keyword and the kind it forces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub kind: ComponentKind,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            keyword: keyword.into(),
            kind,
        }
    }
}

impl fmt::Display for KeywordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.keyword, self.kind.label())
    }
}

impl FromStr for KeywordRule {
    type Err = String;

    /// Parses `Keyword=Kind`, e.g. `Sheet=Document`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (keyword, kind) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected Keyword=Kind, got: {}", s))?;
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err("Keyword cannot be empty".to_string());
        }
        Ok(KeywordRule::new(keyword, kind.trim().parse()?))
    }
}

static DEFAULT_RULES: Lazy<Vec<KeywordRule>> = Lazy::new(|| {
    vec![
        KeywordRule::new("Form", ComponentKind::UserForm),
        KeywordRule::new("ThisDocument", ComponentKind::DocumentModule),
    ]
});

/// Ordered keyword rules; the first matching keyword wins.
#[derive(Debug, Clone)]
pub struct KindResolver {
    rules: Vec<KeywordRule>,
}

impl Default for KindResolver {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl KindResolver {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Default rules, then the host's own document module name, then `extra`.
    pub fn for_family(family: HostFamily, extra: &[KeywordRule]) -> Self {
        let mut resolver = Self::default();
        resolver.push(KeywordRule::new(
            family.profile().reserved_module,
            ComponentKind::DocumentModule,
        ));
        for rule in extra {
            resolver.push(rule.clone());
        }
        resolver
    }

    fn push(&mut self, rule: KeywordRule) {
        if !self.rules.iter().any(|r| r.keyword == rule.keyword) {
            self.rules.push(rule);
        }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    pub fn keyword_kind(&self, stem: &str) -> Option<ComponentKind> {
        self.rules
            .iter()
            .find(|rule| stem.contains(rule.keyword.as_str()))
            .map(|rule| rule.kind)
    }

    /// Kind for a folder file, or `None` when the extension is not one of ours.
    pub fn resolve(&self, stem: &str, extension: &str) -> Option<ComponentKind> {
        let by_extension = ComponentKind::from_extension(extension)?;
        Some(self.keyword_kind(stem).unwrap_or(by_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_type_codes_resolve() {
        assert_eq!(kind_from_type_code(1), Some(ComponentKind::StandardModule));
        assert_eq!(kind_from_type_code(2), Some(ComponentKind::ClassModule));
        assert_eq!(kind_from_type_code(3), Some(ComponentKind::UserForm));
        assert_eq!(kind_from_type_code(100), Some(ComponentKind::DocumentModule));
    }

    #[test]
    fn unknown_type_codes_are_unresolved() {
        assert_eq!(kind_from_type_code(11), None);
        assert_eq!(kind_from_type_code(0), None);
        assert_eq!(kind_from_type_code(-1), None);
    }

    #[test]
    fn type_code_round_trips_for_every_kind() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind_from_type_code(type_code(kind)), Some(kind));
        }
    }

    #[test]
    fn this_document_bas_is_a_document_module() {
        let resolver = KindResolver::default();
        assert_eq!(
            resolver.resolve("ThisDocument", ".bas"),
            Some(ComponentKind::DocumentModule)
        );
        assert_eq!(
            resolver.resolve("Backup_ThisDocument_v2", ".bas"),
            Some(ComponentKind::DocumentModule)
        );
    }

    #[test]
    fn keyword_beats_extension() {
        let resolver = KindResolver::default();
        assert_eq!(
            resolver.resolve("LoginForm", ".bas"),
            Some(ComponentKind::UserForm)
        );
        assert_eq!(
            resolver.resolve("ThisDocument", ".cls"),
            Some(ComponentKind::DocumentModule)
        );
    }

    #[test]
    fn first_matching_keyword_wins() {
        let resolver = KindResolver::default();
        assert_eq!(
            resolver.resolve("ThisDocumentForm", ".bas"),
            Some(ComponentKind::UserForm)
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let resolver = KindResolver::default();
        assert_eq!(
            resolver.resolve("thisdocument", ".bas"),
            Some(ComponentKind::StandardModule)
        );
    }

    #[test]
    fn extension_decides_without_keyword() {
        let resolver = KindResolver::default();
        assert_eq!(
            resolver.resolve("Module1", ".bas"),
            Some(ComponentKind::StandardModule)
        );
        assert_eq!(
            resolver.resolve("Parser", ".CLS"),
            Some(ComponentKind::ClassModule)
        );
        assert_eq!(resolver.resolve("Readme", ".md"), None);
    }

    #[test]
    fn family_adds_reserved_module_name() {
        let resolver = KindResolver::for_family(HostFamily::Excel, &[]);
        assert_eq!(
            resolver.resolve("ThisWorkbook", ".bas"),
            Some(ComponentKind::DocumentModule)
        );
        // Word's reserved name is already a default rule
        let word = KindResolver::for_family(HostFamily::Word, &[]);
        assert_eq!(word.rules().len(), 2);
    }

    #[test]
    fn extra_rules_come_last() {
        let extra = vec![KeywordRule::new("Sheet", ComponentKind::DocumentModule)];
        let resolver = KindResolver::for_family(HostFamily::Excel, &extra);
        assert_eq!(
            resolver.resolve("Sheet1", ".bas"),
            Some(ComponentKind::DocumentModule)
        );
        assert_eq!(resolver.rules().last().unwrap().keyword, "Sheet");
    }

    #[test]
    fn parses_keyword_rule() {
        let rule: KeywordRule = "Sheet=Document".parse().unwrap();
        assert_eq!(rule, KeywordRule::new("Sheet", ComponentKind::DocumentModule));
        assert_eq!(rule.to_string(), "Sheet=Document");
        assert!("Sheet".parse::<KeywordRule>().is_err());
        assert!("=Document".parse::<KeywordRule>().is_err());
        assert!("Sheet=Table".parse::<KeywordRule>().is_err());
    }
}
