//! # Rendering
//!
//! Turns command results into terminal text. Every `render_*` function returns
//! a `String` and takes an explicit color switch so output can be tested
//! without a terminal; the `print_*` wrappers decide color from the
//! environment.
//!
//! Column math uses display width, not byte or char counts, so component names
//! in CJK scripts line up.

use colored::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use vbasync::api::{CmdMessage, MessageLevel};
use vbasync::config::{SyncConfig, KEYS};
use vbasync::listener::Event;
use vbasync::model::{Component, ComponentKind};

pub const NAME_WIDTH: usize = 32;
const KIND_WIDTH: usize = 10;

fn use_color() -> bool {
    colored::control::SHOULD_COLORIZE.should_colorize()
}

fn paint(text: &str, color: bool, f: impl FnOnce(&str) -> ColoredString) -> String {
    if color {
        f(text).to_string()
    } else {
        text.to_string()
    }
}

pub fn render_messages(messages: &[CmdMessage], color: bool) -> String {
    let mut out = String::new();
    for message in messages {
        let line = paint(&message.content, color, |s| match message.level {
            MessageLevel::Info => s.dimmed(),
            MessageLevel::Success => s.green(),
            MessageLevel::Warning => s.yellow(),
            MessageLevel::Error => s.red(),
        });
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn print_messages(messages: &[CmdMessage]) {
    print!("{}", render_messages(messages, use_color()));
}

/// A titled table of components: name, kind, line count.
pub fn render_components(title: &str, components: &[Component], color: bool) -> String {
    let mut out = String::new();
    let heading = format!("{} ({})", title, components.len());
    out.push_str(&paint(&heading, color, |s| s.bold()));
    out.push('\n');

    if components.is_empty() {
        out.push_str(&paint("  No components found.", color, |s| s.dimmed()));
        out.push('\n');
        return out;
    }

    for component in components {
        let name = truncate_to_width(&component.name, NAME_WIDTH);
        let padding = " ".repeat(NAME_WIDTH.saturating_sub(name.width()));
        let kind = format!("{:<width$}", component.kind.label(), width = KIND_WIDTH);
        let kind = paint(&kind, color, |s| match component.kind {
            ComponentKind::DocumentModule => s.cyan(),
            ComponentKind::UserForm => s.magenta(),
            _ => s.normal(),
        });
        let lines = format!("{} lines", component.code.lines().count());
        out.push_str(&format!(
            "  {}{}  {}  {}\n",
            name,
            padding,
            kind,
            paint(&lines, color, |s| s.dimmed())
        ));
    }
    out
}

pub fn print_components(title: &str, components: &[Component]) {
    print!("{}", render_components(title, components, use_color()));
}

/// One progress line, or `None` for bookkeeping events shown only with
/// `--verbose`. Skips and failures also reach the user as messages.
pub fn render_event(event: &Event, verbose: bool, color: bool) -> Option<String> {
    let text = event.to_string();
    match event {
        Event::Started { .. }
        | Event::Opened { .. }
        | Event::Skipped { .. }
        | Event::Failed { .. }
        | Event::Finished { .. }
            if !verbose =>
        {
            None
        }
        Event::Skipped { .. } => Some(paint(&text, color, |s| s.yellow())),
        Event::Failed { .. } => Some(paint(&text, color, |s| s.red())),
        _ => Some(paint(&text, color, |s| s.dimmed())),
    }
}

pub fn print_event(event: &Event, verbose: bool) {
    if let Some(line) = render_event(event, verbose, use_color()) {
        println!("{}", line);
    }
}

pub fn render_config(config: &SyncConfig) -> String {
    let mut out = String::new();
    for key in KEYS {
        let value = config.get(key).unwrap_or_default();
        out.push_str(&format!("{} = {}\n", key, value));
    }
    out
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_empty_components() {
        let output = render_components("Project", &[], false);
        assert_eq!(output, "Project (0)\n  No components found.\n");
    }

    #[test]
    fn test_render_component_rows_align() {
        let components = vec![
            Component::new("Module1", ComponentKind::StandardModule, "a\nb"),
            Component::new("模块", ComponentKind::ClassModule, ""),
        ];
        let output = render_components("Folder", &components, false);
        let lines: Vec<_> = output.lines().collect();

        assert_eq!(lines[0], "Folder (2)");
        assert!(lines[1].starts_with("  Module1 "));
        assert!(lines[1].ends_with("2 lines"));
        let kind_at = |line: &str, label: &str| line[..line.find(label).unwrap()].width();
        assert_eq!(kind_at(lines[1], "Module "), kind_at(lines[2], "Class"));
    }

    #[test]
    fn test_truncate_long_names() {
        let long = "X".repeat(50);
        let cut = truncate_to_width(&long, NAME_WIDTH);
        assert_eq!(cut.width(), NAME_WIDTH);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate_to_width("short", NAME_WIDTH), "short");
    }

    #[test]
    fn test_render_messages_plain() {
        let output = render_messages(
            &[CmdMessage::success("done"), CmdMessage::warning("careful")],
            false,
        );
        assert_eq!(output, "done\ncareful\n");
    }

    #[test]
    fn test_bookkeeping_events_hidden_unless_verbose() {
        let opened = Event::Opened { writable: true };
        assert!(render_event(&opened, false, false).is_none());
        assert!(render_event(&opened, true, false).is_some());

        let saved = Event::Saved {
            path: PathBuf::from("a.docm"),
            upgraded: false,
        };
        assert_eq!(render_event(&saved, false, false).unwrap(), "Saved a.docm");
    }

    #[test]
    fn test_render_config_lists_every_key() {
        let output = render_config(&SyncConfig::default());
        assert_eq!(output, "legacy-encoding = gbk\nkeywords = \n");
    }
}
