use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "vbasync", bin_name = "vbasync", version = get_version())]
#[command(
    about = "Sync macro code between office documents and a folder of text files",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print diagnostic logging to stderr
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the components of a document, and of a folder if given
    #[command(alias = "ls", display_order = 1)]
    List {
        /// Document (.docm, .xlsm, .pptm, ...)
        container: PathBuf,

        /// Folder of exported components to list alongside
        #[arg(short, long, value_name = "DIR")]
        folder: Option<PathBuf>,
    },

    /// Export components from a document into a folder
    #[command(display_order = 2)]
    Export {
        /// Document to read
        container: PathBuf,

        /// Destination folder (created if missing)
        folder: PathBuf,

        /// Only these components (repeatable; default: all)
        #[arg(short, long = "select", value_name = "NAME")]
        select: Vec<String>,

        /// Also bundle the exported files into this .tar.gz
        #[arg(long, value_name = "FILE")]
        archive: Option<PathBuf>,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Import components from a folder into a document and save it
    #[command(display_order = 3)]
    Import {
        /// Document to update
        container: PathBuf,

        /// Folder holding .bas/.cls/.frm files
        folder: PathBuf,

        /// Only these components (repeatable; default: all)
        #[arg(short, long = "select", value_name = "NAME")]
        select: Vec<String>,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Delete all macro code from a document
    #[command(alias = "rm", display_order = 4)]
    Remove {
        /// Document to strip
        container: PathBuf,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Create an empty document snapshot
    #[command(display_order = 5)]
    Init {
        /// Path of the new document
        container: PathBuf,
    },

    /// Get or set configuration
    #[command(display_order = 6)]
    Config {
        /// Configuration key (legacy-encoding, keywords)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn version_starts_with_package_version() {
        let version = get_version();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        if env!("IS_RELEASE") == "true" {
            assert_eq!(version, env!("CARGO_PKG_VERSION"));
        }
    }

    #[test]
    fn parses_export_with_repeated_selection() {
        let cli = parse(&[
            "vbasync", "export", "a.docm", "out", "-s", "Module1", "--select", "Widget", "-y",
        ]);
        match cli.command {
            Commands::Export {
                container,
                folder,
                select,
                archive,
                yes,
            } => {
                assert_eq!(container, PathBuf::from("a.docm"));
                assert_eq!(folder, PathBuf::from("out"));
                assert_eq!(select, vec!["Module1", "Widget"]);
                assert!(archive.is_none());
                assert!(yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn verbose_is_global() {
        let cli = parse(&["vbasync", "list", "a.xlsm", "--verbose"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List { folder: None, .. }));
    }

    #[test]
    fn remove_alias() {
        let cli = parse(&["vbasync", "rm", "a.pptm", "-y"]);
        assert!(matches!(cli.command, Commands::Remove { yes: true, .. }));
    }

    #[test]
    fn import_requires_folder() {
        assert!(Cli::try_parse_from(["vbasync", "import", "a.docm"]).is_err());
    }
}
