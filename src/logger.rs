//! Terminal output for mcdk itself and for the supervised child.
//!
//! - `log!`: status line with a colored `[module]` prefix
//! - `debug!`: same, printed only with `--verbose`
//! - [`console`]: one classified child output line, colored by class
//!
//! # Example
//!
//! ```ignore
//! log!("reload"; "changed: {}", path.display());
//! debug!("ipc"; "client connected: {}", addr);
//! ```

use crossterm::{
    execute,
    terminal::{Clear, ClearType},
};
use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::session::LineClass;

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Print `[module] message`, clearing any partial line first
pub fn log(module: &str, message: &str) {
    let prefix = colorize_prefix(module);

    let mut stdout = stdout().lock();
    execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Prefix color groups modules by the component they come from
fn colorize_prefix(module: &str) -> String {
    let prefix = format!("[{module}]");
    match module.to_ascii_lowercase().as_str() {
        "serve" | "ipc" => prefix.bright_blue().bold().to_string(),
        "watch" | "reload" => prefix.bright_green().bold().to_string(),
        "focus" | "debugger" => prefix.bright_cyan().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Console (child output)
// ============================================================================

/// Write one classified child-output line to the terminal.
///
/// The stdout lock is held for the whole line, so lines coming from the
/// stdout and stderr reader threads never interleave mid-line.
pub fn console(class: LineClass, line: &str) {
    let styled = paint(class, line);
    let mut stdout = stdout().lock();
    writeln!(stdout, "{styled}").ok();
    stdout.flush().ok();
}

fn paint(class: LineClass, line: &str) -> String {
    let out = Stream::Stdout;
    match class {
        LineClass::Developer => line.if_supports_color(out, |t| t.dimmed()).to_string(),
        LineClass::Success => line.if_supports_color(out, |t| t.bright_green()).to_string(),
        LineClass::Error => line.if_supports_color(out, |t| t.bright_red()).to_string(),
        LineClass::Warning => line.if_supports_color(out, |t| t.bright_yellow()).to_string(),
        LineClass::Debug => line.if_supports_color(out, |t| t.bright_cyan()).to_string(),
        LineClass::Default => line.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_default_is_verbatim() {
        assert_eq!(paint(LineClass::Default, "plain text"), "plain text");
    }

    #[test]
    fn test_paint_keeps_text() {
        for class in [
            LineClass::Developer,
            LineClass::Success,
            LineClass::Error,
            LineClass::Warning,
            LineClass::Debug,
        ] {
            assert!(paint(class, "message").contains("message"));
        }
    }

    #[test]
    fn test_paint_without_color_is_plain() {
        owo_colors::set_override(false);
        assert_eq!(paint(LineClass::Error, "boom"), "boom");
        owo_colors::unset_override();
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
