//! Loopback debug channel server.
//!
//! The accept loop runs on its own thread and only pushes streams into the
//! client registry. Sends happen on the caller's thread while holding the
//! registry lock, which serializes writers and keeps per-client order.

use std::io::{self, Write};
use std::net::{Ipv4Addr, Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;

use super::frame::encode_frame;
use crate::core::{StopHandle, StopToken, stop_pair};

/// How long the accept loop sleeps when no connection is pending.
const ACCEPT_POLL: Duration = Duration::from_millis(50);

/// Upper bound on a single client write; a stuck client is dropped.
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

struct Client {
    stream: TcpStream,
    addr: SocketAddr,
}

type Registry = Arc<Mutex<Vec<Client>>>;

struct Running {
    port: u16,
    stop: StopHandle,
    thread: JoinHandle<()>,
}

/// Broadcasts framed messages to every connected debug client.
#[derive(Default)]
pub struct DebugServer {
    clients: Registry,
    running: Mutex<Option<Running>>,
}

impl DebugServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `127.0.0.1:0` and start accepting. No-op if already running.
    ///
    /// Returns the bound port.
    pub fn start(&self) -> io::Result<u16> {
        let mut running = self.running.lock();
        if let Some(r) = running.as_ref() {
            return Ok(r.port);
        }

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        listener.set_nonblocking(true)?;
        let port = listener.local_addr()?.port();

        let (stop, token) = stop_pair();
        let clients = Arc::clone(&self.clients);
        let thread = thread::Builder::new()
            .name("mcdk-ipc".into())
            .spawn(move || accept_loop(listener, clients, token))?;

        crate::debug!("ipc"; "listening on 127.0.0.1:{}", port);
        *running = Some(Running { port, stop, thread });
        Ok(port)
    }

    /// Bound port, or 0 when not running.
    pub fn port(&self) -> u16 {
        self.running.lock().as_ref().map_or(0, |r| r.port)
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Send one framed message to every connected client.
    ///
    /// Clients whose write fails are dropped from the registry. Returns the
    /// number of clients the message reached; zero clients is not an error.
    pub fn send_message(&self, kind: u16, payload: &[u8]) -> io::Result<usize> {
        let frame = encode_frame(kind, payload)?;

        let mut clients = self.clients.lock();
        if clients.is_empty() {
            crate::debug!("ipc"; "no clients connected, dropping message type {}", kind);
            return Ok(0);
        }

        clients.retain_mut(|client| match client.stream.write_all(&frame) {
            Ok(()) => true,
            Err(e) => {
                crate::debug!("ipc"; "client {} disconnected: {}", client.addr, e);
                let _ = client.stream.shutdown(Shutdown::Both);
                false
            }
        });
        crate::debug!("ipc"; "sent type {} ({} bytes) to {} clients", kind, payload.len(), clients.len());
        Ok(clients.len())
    }

    /// Close the listener and every client. Idempotent; never fails.
    pub fn stop(&self) {
        // Take the state out first so the join happens without the lock held
        let running = self.running.lock().take();
        if let Some(Running { stop, thread, .. }) = running {
            stop.stop();
            if thread.join().is_err() {
                crate::log!("ipc"; "accept thread panicked");
            }
        }

        for client in self.clients.lock().drain(..) {
            let _ = client.stream.shutdown(Shutdown::Both);
        }
    }
}

impl Drop for DebugServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn accept_loop(listener: TcpListener, clients: Registry, stop: StopToken) {
    loop {
        if stop.is_stopped() {
            break;
        }
        match listener.accept() {
            Ok((stream, addr)) => {
                if let Err(e) = prepare_stream(&stream) {
                    crate::log!("ipc"; "rejecting client {}: {}", addr, e);
                    continue;
                }
                let mut clients = clients.lock();
                clients.push(Client { stream, addr });
                crate::debug!("ipc"; "client connected: {} (total: {})", addr, clients.len());
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                if stop.wait(ACCEPT_POLL) {
                    break;
                }
            }
            Err(e) => {
                crate::log!("ipc"; "accept error: {}", e);
                if stop.wait(ACCEPT_POLL) {
                    break;
                }
            }
        }
    }
    // Listener is dropped here, closing the socket
    crate::debug!("ipc"; "accept loop stopped");
}

fn prepare_stream(stream: &TcpStream) -> io::Result<()> {
    stream.set_nonblocking(false)?;
    stream.set_nodelay(true)?;
    stream.set_write_timeout(Some(WRITE_TIMEOUT))
}
