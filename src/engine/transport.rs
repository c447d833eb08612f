//! Line transport to the engine process.
//!
//! [`Launcher`] and [`Transport`] are the seam between the session logic
//! and the operating system; tests substitute scripted implementations.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::error::{EngineError, ProtocolError};

/// How long a process gets to exit after `quit` before it is killed
const QUIT_GRACE_MS: u64 = 250;

const EXIT_POLL_MS: u64 = 10;

/// A bidirectional line channel to a running engine.
pub trait Transport: Send {
    fn send(&mut self, line: &str) -> Result<(), ProtocolError>;

    /// Next line, or `Ok(None)` if nothing arrived within `timeout`.
    fn recv(&mut self, timeout: Duration) -> Result<Option<String>, ProtocolError>;

    /// Ask the engine to exit and release it. Must be idempotent.
    fn shutdown(&mut self);
}

/// Starts engine processes.
pub trait Launcher: Send + Sync {
    fn launch(&self) -> Result<Box<dyn Transport>, EngineError>;
}

/// Spawns the engine binary with piped stdin/stdout.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    path: PathBuf,
    args: Vec<String>,
}

impl ProcessLauncher {
    pub fn new(path: impl Into<PathBuf>, args: Vec<String>) -> Self {
        ProcessLauncher {
            path: path.into(),
            args,
        }
    }

    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        ProcessLauncher::new(config.path.clone(), config.args.clone())
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self) -> Result<Box<dyn Transport>, EngineError> {
        let unavailable = |what: &str, e: &dyn std::fmt::Display| EngineError::Unavailable {
            reason: format!("{what} {}: {e}", self.path.display()),
        };

        let mut child = Command::new(&self.path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| unavailable("cannot spawn", &e))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(EngineError::Unavailable {
                reason: format!("no stdio pipes for {}", self.path.display()),
            });
        };

        let (tx, rx) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("engine-reader".to_string())
            .spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let stop = line.is_err();
                    if tx.send(line).is_err() || stop {
                        break;
                    }
                }
            });
        if let Err(e) = reader {
            let _ = child.kill();
            let _ = child.wait();
            return Err(unavailable("cannot read from", &e));
        }

        debug!("spawned engine {} (pid {})", self.path.display(), child.id());
        Ok(Box::new(ProcessTransport {
            child,
            stdin: Some(stdin),
            lines: rx,
            finished: false,
        }))
    }
}

/// A spawned engine. Stdout is drained by a reader thread into a channel so
/// reads can time out.
pub struct ProcessTransport {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<std::io::Result<String>>,
    finished: bool,
}

impl Transport for ProcessTransport {
    fn send(&mut self, line: &str) -> Result<(), ProtocolError> {
        let stdin = self.stdin.as_mut().ok_or(ProtocolError::Closed)?;
        trace!("> {line}");
        writeln!(stdin, "{line}")?;
        stdin.flush()?;
        Ok(())
    }

    fn recv(&mut self, timeout: Duration) -> Result<Option<String>, ProtocolError> {
        match self.lines.recv_timeout(timeout) {
            Ok(Ok(line)) => {
                trace!("< {line}");
                Ok(Some(line))
            }
            Ok(Err(e)) => Err(e.into()),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ProtocolError::Closed),
        }
    }

    fn shutdown(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;

        if let Some(mut stdin) = self.stdin.take() {
            let _ = writeln!(stdin, "quit");
            let _ = stdin.flush();
        }

        let deadline = Instant::now() + Duration::from_millis(QUIT_GRACE_MS);
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    debug!("engine exited with {status}");
                    return;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(EXIT_POLL_MS));
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("cannot poll engine process: {e}");
                    break;
                }
            }
        }

        debug!("engine ignored quit, killing it");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}
