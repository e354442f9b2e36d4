use std::net::TcpStream;
use std::time::Instant;

use parking_lot::Mutex;

use super::*;
use crate::ipc::{RELOAD_MODULES, read_message};

/// Collects emitted lines in memory.
#[derive(Default)]
struct MemorySink(Mutex<Vec<(LineClass, String)>>);

impl LineSink for MemorySink {
    fn emit(&self, class: LineClass, line: &str) {
        self.0.lock().push((class, line.to_string()));
    }
}

#[test]
fn test_reload_action_without_clients() {
    let server = Arc::new(DebugServer::new());
    server.start().unwrap();
    let action = reload_action(Arc::clone(&server));
    action(&["mod.a".to_string()]).unwrap();
    server.stop();
}

#[test]
fn test_reload_action_sends_module_list() {
    let server = Arc::new(DebugServer::new());
    let port = server.start().unwrap();
    let mut client = TcpStream::connect(("127.0.0.1", port)).unwrap();
    client
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    let start = Instant::now();
    while server.client_count() == 0 {
        assert!(start.elapsed() < Duration::from_secs(5));
        thread::sleep(Duration::from_millis(5));
    }

    let action = reload_action(Arc::clone(&server));
    action(&["mod.a".to_string(), "mod.b".to_string()]).unwrap();

    let msg = read_message(&mut client).unwrap();
    assert_eq!(msg.kind, RELOAD_MODULES);
    assert_eq!(msg.payload, br#"["mod.a","mod.b"]"#);
    server.stop();
}

#[test]
fn test_run_session_spawn_failure() {
    let mut config = DevConfig::default();
    config.game.executable = "/nonexistent/mcdk-game".into();

    let sink: Arc<dyn LineSink> = Arc::new(MemorySink::default());
    let err = run_session(&config, sink).unwrap_err();
    assert!(err.to_string().contains("Failed to spawn"));
}
