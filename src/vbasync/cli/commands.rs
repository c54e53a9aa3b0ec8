use super::render::{print_components, print_event, print_messages, render_config};
use super::setup::{Cli, Commands};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use vbasync::api::{CmdResult, ConfigAction, VbaApi};
use vbasync::config::config_dir;
use vbasync::error::{Result, SyncError};
use vbasync::host::family::HostFamily;
use vbasync::host::snapshot::SnapshotHost;
use vbasync::listener::{Listener, NullListener};
use vbasync::runner::submit;
use vbasync::upgrade::output_path;

type Api = VbaApi<SnapshotHost>;

struct AppContext {
    api: Api,
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(cli.verbose);
    let ctx = init_context(&cli)?;

    match cli.command {
        Commands::List { container, folder } => handle_list(ctx, container, folder),
        Commands::Export {
            container,
            folder,
            select,
            archive,
            yes,
        } => handle_export(ctx, container, folder, select, archive, yes),
        Commands::Import {
            container,
            folder,
            select,
            yes,
        } => handle_import(ctx, container, folder, select, yes),
        Commands::Remove { container, yes } => handle_remove(ctx, container, yes),
        Commands::Init { container } => handle_init(ctx, container),
        Commands::Config { key, value } => handle_config(ctx, key, value),
    }
}

/// Diagnostics go to stderr, and only when asked for.
fn init_logging(verbose: bool) -> Option<LoggerHandle> {
    if !verbose {
        return None;
    }
    match Logger::try_with_str("vbasync=debug").and_then(|logger| {
        logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format)
            .start()
    }) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("Warning: failed to start logger: {}", e);
            None
        }
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let api = VbaApi::open(SnapshotHost::new(), config_dir()?)?;
    Ok(AppContext {
        api,
        verbose: cli.verbose,
    })
}

/// Runs one operation on the worker thread, printing its events as they
/// arrive.
fn run_with_progress<F>(ctx: AppContext, operation: F) -> Result<CmdResult>
where
    F: FnOnce(&mut Api, &mut dyn Listener) -> Result<CmdResult> + Send + 'static,
{
    let task = submit(ctx.api, operation)?;
    for event in task.events().iter() {
        print_event(&event, ctx.verbose);
    }
    let (_, result) = task.join()?;
    result
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N]: ", prompt);
    io::stdout().flush().map_err(SyncError::Io)?;

    let mut input = String::new();
    io::stdin().read_line(&mut input).map_err(SyncError::Io)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes" | "YES"))
}

fn cancelled() -> Result<()> {
    println!("Operation cancelled.");
    Ok(())
}

fn handle_list(mut ctx: AppContext, container: PathBuf, folder: Option<PathBuf>) -> Result<()> {
    let result = ctx
        .api
        .list(&container, folder.as_deref(), &mut NullListener)?;
    print_components(
        &format!("Project {}", container.display()),
        &result.project_components,
    );
    if let Some(folder) = &folder {
        println!();
        print_components(
            &format!("Folder {}", folder.display()),
            &result.folder_components,
        );
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_export(
    ctx: AppContext,
    container: PathBuf,
    folder: PathBuf,
    select: Vec<String>,
    archive: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    if !yes && has_entries(&folder) {
        let prompt = format!(
            "Files in {} with the same names will be overwritten. Continue?",
            folder.display()
        );
        if !confirm(&prompt)? {
            return cancelled();
        }
    }

    let result = run_with_progress(ctx, move |api, listener| {
        api.export(&container, &folder, &select, archive.as_deref(), listener)
    })?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_import(
    ctx: AppContext,
    container: PathBuf,
    folder: PathBuf,
    select: Vec<String>,
    yes: bool,
) -> Result<()> {
    if !yes {
        let prompt = match HostFamily::detect(&container)
            .map(|family| output_path(&container, family.profile()))
        {
            Some(target) if target.upgraded => format!(
                "Import {} into a new file {}?",
                folder.display(),
                target.path.display()
            ),
            _ => format!(
                "Import {} into {}? Matching components will be replaced.",
                folder.display(),
                container.display()
            ),
        };
        if !confirm(&prompt)? {
            return cancelled();
        }
    }

    let result = run_with_progress(ctx, move |api, listener| {
        api.import(&container, &folder, &select, listener)
    })?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_remove(ctx: AppContext, container: PathBuf, yes: bool) -> Result<()> {
    if !yes {
        let prompt = format!(
            "This will delete all macro code from {}. Continue?",
            container.display()
        );
        if !confirm(&prompt)? {
            return cancelled();
        }
    }

    let result = run_with_progress(ctx, move |api, listener| api.remove(&container, listener))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_init(mut ctx: AppContext, container: PathBuf) -> Result<()> {
    let result = ctx.api.init(&container, &mut NullListener)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(mut ctx: AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_config(config));
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn has_entries(dir: &Path) -> bool {
    dir.read_dir()
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
