//! Debug channel: a loopback TCP server the child connects back to.
//!
//! The child learns the port from the `MCDEV_DEBUG_IPC_PORT` environment
//! variable and reads framed messages (see [`frame`]) from the stream.

pub mod frame;
mod server;

pub use frame::{Message, RELOAD_MODULES, encode_frame, read_message};
pub use server::DebugServer;

#[cfg(test)]
mod tests;
