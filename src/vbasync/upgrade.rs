//! Where a container is saved after an import.
//!
//! Legacy and macro-incapable formats cannot keep macro code, so saving one
//! writes a sibling file with the macro-enabled extension. The original file is
//! never overwritten in that case. The decision looks at the extension only.

use crate::host::family::{dotted_extension, HostProfile};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveTarget {
    pub path: PathBuf,
    /// True when `path` differs from the container because of a format change.
    pub upgraded: bool,
}

pub fn output_path(container: &Path, profile: &HostProfile) -> SaveTarget {
    let upgrade = dotted_extension(container).and_then(|ext| {
        profile
            .upgrades
            .iter()
            .find(|(legacy, _)| *legacy == ext)
            .map(|(_, enabled)| *enabled)
    });

    match upgrade {
        Some(enabled) => SaveTarget {
            path: container.with_extension(enabled.trim_start_matches('.')),
            upgraded: true,
        },
        None => SaveTarget {
            path: container.to_path_buf(),
            upgraded: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::family::HostFamily;

    fn target(path: &str) -> SaveTarget {
        let path = Path::new(path);
        let family = HostFamily::detect(path).unwrap();
        output_path(path, family.profile())
    }

    #[test]
    fn legacy_formats_move_to_macro_enabled() {
        assert_eq!(target("a/report.doc").path, PathBuf::from("a/report.docm"));
        assert_eq!(target("report.docx").path, PathBuf::from("report.docm"));
        assert_eq!(target("tmpl.dot").path, PathBuf::from("tmpl.dotm"));
        assert_eq!(target("book.xls").path, PathBuf::from("book.xlsm"));
        assert_eq!(target("book.xltx").path, PathBuf::from("book.xltm"));
        assert_eq!(target("deck.ppt").path, PathBuf::from("deck.pptm"));
        assert_eq!(target("deck.potx").path, PathBuf::from("deck.potm"));
        assert!(target("book.xlsx").upgraded);
    }

    #[test]
    fn extension_match_ignores_case() {
        let t = target("OLD.DOC");
        assert_eq!(t.path, PathBuf::from("OLD.docm"));
        assert!(t.upgraded);
    }

    #[test]
    fn macro_enabled_formats_save_in_place() {
        for path in ["a.docm", "a.dotm", "a.xlsm", "a.xltm", "a.pptm", "a.potm"] {
            let t = target(path);
            assert_eq!(t.path, PathBuf::from(path));
            assert!(!t.upgraded);
        }
    }

    #[test]
    fn dotted_stem_keeps_its_dots() {
        assert_eq!(
            target("q1.final.xls").path,
            PathBuf::from("q1.final.xlsm")
        );
    }
}
