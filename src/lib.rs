//! mcdk - development session controller.
//!
//! Launches a game as a child process, relays and classifies its output,
//! and hot-reloads edited mod sources over a loopback debug channel while
//! the game window has focus.

pub mod logger;

pub mod cli;
pub mod config;
pub mod core;
pub mod focus;
pub mod hotreload;
pub mod ipc;
pub mod session;
pub mod watch;
