//! Core primitives shared by every background component.

mod guard;
mod state;
mod stop;

pub use guard::invoke_guarded;
pub use state::{is_shutdown, setup_shutdown_handler};
pub use stop::{StopHandle, StopToken, stop_pair};
