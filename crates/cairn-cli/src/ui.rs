use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Terminal-dependent rendering choices, fixed once at startup.
#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(
        flags,
        std::io::stdout().is_terminal(),
        std::io::stderr().is_terminal(),
    ));
}

fn resolve(flags: &GlobalFlags, stdout_tty: bool, stderr_tty: bool) -> UiPrefs {
    let table_color = stdout_tty
        && flags.format == OutputFormat::Table
        && std::env::var_os("NO_COLOR").is_none();

    // Bars draw on stderr and stay out of machine-readable runs.
    let progress = stderr_tty && !flags.quiet && flags.format != OutputFormat::Json;

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, quiet: bool) -> GlobalFlags {
        GlobalFlags {
            format,
            limit: None,
            quiet,
            verbose: false,
            project: None,
        }
    }

    #[test]
    fn progress_needs_a_terminal_and_non_json_output() {
        assert!(resolve(&flags(OutputFormat::Table, false), false, true).progress);
        assert!(!resolve(&flags(OutputFormat::Json, false), true, true).progress);
        assert!(!resolve(&flags(OutputFormat::Table, true), true, true).progress);
        assert!(!resolve(&flags(OutputFormat::Table, false), true, false).progress);
    }

    #[test]
    fn color_only_for_tables_on_a_terminal() {
        assert!(!resolve(&flags(OutputFormat::Raw, false), true, true).table_color);
        assert!(!resolve(&flags(OutputFormat::Table, false), false, true).table_color);
    }
}
