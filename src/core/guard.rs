//! Callback isolation for watch loops.

use std::panic::{AssertUnwindSafe, catch_unwind};

/// Run a user callback, logging its error or panic instead of propagating.
///
/// Background loops call every callback through here so that a failing
/// callback never terminates the loop that invoked it.
pub fn invoke_guarded<F>(context: &str, f: F) -> bool
where
    F: FnOnce() -> anyhow::Result<()>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            crate::log!("error"; "{} callback failed: {:#}", context, e);
            false
        }
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            crate::log!("error"; "{} callback panicked: {}", context, msg);
            false
        }
    }
}
