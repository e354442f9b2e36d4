//! Pipe readers that turn raw child output into lines.

use std::io::{self, Read};
use std::thread::{self, JoinHandle};

const READ_CHUNK: usize = 4096;

/// Accumulates raw bytes and yields complete lines.
///
/// Lines are split on `\n` with a trailing `\r` removed. Invalid UTF-8 is
/// replaced rather than rejected.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
    /// Only lines containing this marker are yielded.
    required: Option<String>,
}

impl LineBuffer {
    pub fn new(required: Option<String>) -> Self {
        Self {
            buf: Vec::new(),
            required,
        }
    }

    /// Append `bytes`, calling `emit` for each completed line.
    pub fn push(&mut self, bytes: &[u8], mut emit: impl FnMut(&str)) {
        self.buf.extend_from_slice(bytes);

        let mut start = 0;
        while let Some(offset) = self.buf[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset;
            self.emit_line(start, end, &mut emit);
            start = end + 1;
        }
        self.buf.drain(..start);
    }

    /// Flush a trailing partial line at end of stream.
    pub fn finish(&mut self, mut emit: impl FnMut(&str)) {
        if !self.buf.is_empty() {
            let end = self.buf.len();
            self.emit_line(0, end, &mut emit);
        }
        self.buf.clear();
    }

    fn emit_line(&self, start: usize, end: usize, emit: &mut impl FnMut(&str)) {
        let mut raw = &self.buf[start..end];
        if let [rest @ .., b'\r'] = raw {
            raw = rest;
        }
        let line = String::from_utf8_lossy(raw);
        if let Some(marker) = &self.required
            && !line.contains(marker.as_str())
        {
            return;
        }
        emit(&line);
    }
}

/// Read `source` to EOF on a new thread, calling `on_line` for every line.
pub fn spawn_reader<R, F>(name: &str, mut source: R, mut buffer: LineBuffer, mut on_line: F) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
    F: FnMut(&str) + Send + 'static,
{
    let label = name.to_string();
    thread::Builder::new()
        .name(format!("mcdk-{name}"))
        .spawn(move || {
            let mut chunk = [0u8; READ_CHUNK];
            loop {
                match source.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => buffer.push(&chunk[..n], &mut on_line),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => {
                        crate::debug!("serve"; "{} pipe closed: {}", label, e);
                        break;
                    }
                }
            }
            buffer.finish(&mut on_line);
        })
}
