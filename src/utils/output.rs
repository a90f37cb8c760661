//! Protocol output guard and diagnostic logging.
//!
//! The MCP stdio transport treats every line on stdout as a JSON-RPC frame,
//! so a single stray line of text breaks the session. Two things keep stdout
//! clean:
//!
//! - [`init_logging`] sends all `tracing` output to stderr.
//! - [`OutputGuard`] wraps the protocol writer and reroutes any line that does
//!   not start with `{` or `[` to the diagnostic writer.

use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Destination of a line written through the guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Protocol,
    Diagnostic,
}

impl Channel {
    /// Classify a line by its first non-whitespace byte
    pub fn classify(first: u8) -> Self {
        match first {
            b'{' | b'[' => Channel::Protocol,
            _ => Channel::Diagnostic,
        }
    }
}

/// Line-routing writer in front of the protocol channel
///
/// Routing is decided once per line, at its first non-whitespace byte, and
/// the rest of that line follows the same channel even when it arrives in
/// later writes. Whitespace-only lines stay on the protocol channel.
#[derive(Debug)]
pub struct OutputGuard<P: Write, D: Write> {
    protocol: P,
    diagnostic: D,
    current: Option<Channel>,
    pending: Vec<u8>,
}

impl OutputGuard<io::Stdout, io::Stderr> {
    /// Guard the process's stdout, diverting to stderr
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<P: Write, D: Write> OutputGuard<P, D> {
    pub fn new(protocol: P, diagnostic: D) -> Self {
        Self {
            protocol,
            diagnostic,
            current: None,
            pending: Vec::new(),
        }
    }

    fn writer(&mut self, channel: Channel) -> &mut dyn Write {
        match channel {
            Channel::Protocol => &mut self.protocol,
            Channel::Diagnostic => &mut self.diagnostic,
        }
    }

    /// Write a serializable value as one compact JSON frame
    pub fn write_frame<T: serde::Serialize>(&mut self, value: &T) -> io::Result<()> {
        let mut line = serde_json::to_vec(value)?;
        line.push(b'\n');
        self.write_all(&line)?;
        self.flush()
    }

    pub fn into_inner(self) -> (P, D) {
        (self.protocol, self.diagnostic)
    }
}

impl<P: Write, D: Write> Write for OutputGuard<P, D> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut rest = buf;

        while !rest.is_empty() {
            match self.current {
                Some(channel) => {
                    let end = rest
                        .iter()
                        .position(|&b| b == b'\n')
                        .map_or(rest.len(), |i| i + 1);
                    self.writer(channel).write_all(&rest[..end])?;
                    if rest[end - 1] == b'\n' {
                        self.current = None;
                    }
                    rest = &rest[end..];
                }
                None => {
                    let ws = rest.iter().take_while(|b| b.is_ascii_whitespace()).count();

                    if let Some(nl) = rest[..ws].iter().position(|&b| b == b'\n') {
                        let mut line = std::mem::take(&mut self.pending);
                        line.extend_from_slice(&rest[..=nl]);
                        self.protocol.write_all(&line)?;
                        rest = &rest[nl + 1..];
                    } else if ws < rest.len() {
                        let channel = Channel::classify(rest[ws]);
                        let mut head = std::mem::take(&mut self.pending);
                        head.extend_from_slice(&rest[..ws]);
                        self.writer(channel).write_all(&head)?;
                        self.current = Some(channel);
                        rest = &rest[ws..];
                    } else {
                        self.pending.extend_from_slice(rest);
                        rest = &[];
                    }
                }
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.protocol.flush()?;
        self.diagnostic.flush()
    }
}

/// Initialize tracing with all output on stderr
pub fn init_logging(verbosity: u8, quiet: bool, json: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("suarify_mcp={}", level)),
    );

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(false)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}
