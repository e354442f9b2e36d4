use super::LineClass;

/// Destination for classified child output lines.
///
/// Called concurrently from the stdout and stderr readers; implementations
/// must keep each line whole.
pub trait LineSink: Send + Sync {
    fn emit(&self, class: LineClass, line: &str);
}

/// Writes lines to the terminal with class-dependent colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl LineSink for ConsoleSink {
    fn emit(&self, class: LineClass, line: &str) {
        crate::logger::console(class, line);
    }
}
