//! Scripted engine doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use chess_ai::{EngineAdapter, EngineConfig, EngineError, Launcher, ProtocolError, Transport};

/// How a scripted engine answers.
#[derive(Clone)]
pub struct Script {
    pub name: &'static str,
    pub handshake_ok: bool,
    /// Lines emitted after each `go`
    pub on_go: Vec<&'static str>,
}

impl Script {
    pub fn replying(on_go: Vec<&'static str>) -> Self {
        Script {
            name: "Scripted",
            handshake_ok: true,
            on_go,
        }
    }
}

/// Shared view of everything the scripted engines saw.
#[derive(Clone, Default)]
pub struct Probe {
    pub launches: Arc<AtomicUsize>,
    pub sent: Arc<Mutex<Vec<String>>>,
}

impl Probe {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn saw(&self, line: &str) -> bool {
        self.sent.lock().iter().any(|l| l == line)
    }

    pub fn saw_prefix(&self, prefix: &str) -> bool {
        self.sent.lock().iter().any(|l| l.starts_with(prefix))
    }
}

pub struct ScriptedTransport {
    script: Script,
    pending: VecDeque<String>,
    probe: Probe,
}

impl Transport for ScriptedTransport {
    fn send(&mut self, line: &str) -> Result<(), ProtocolError> {
        self.probe.sent.lock().push(line.to_string());
        let word = line.split_whitespace().next().unwrap_or_default();
        match word {
            "uci" if self.script.handshake_ok => {
                self.pending.push_back(format!("id name {}", self.script.name));
                self.pending.push_back("uciok".to_string());
            }
            "isready" => self.pending.push_back("readyok".to_string()),
            "go" => self
                .pending
                .extend(self.script.on_go.iter().map(|l| (*l).to_string())),
            _ => {}
        }
        Ok(())
    }

    fn recv(&mut self, _timeout: Duration) -> Result<Option<String>, ProtocolError> {
        Ok(self.pending.pop_front())
    }

    fn shutdown(&mut self) {
        self.pending.clear();
    }
}

pub struct ScriptedLauncher {
    script: Script,
    probe: Probe,
}

impl Launcher for ScriptedLauncher {
    fn launch(&self) -> Result<Box<dyn Transport>, EngineError> {
        self.probe.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedTransport {
            script: self.script.clone(),
            pending: VecDeque::new(),
            probe: self.probe.clone(),
        }))
    }
}

/// An adapter over a scripted engine, plus a probe into its traffic.
pub fn scripted_engine(script: Script) -> (EngineAdapter, Probe) {
    let probe = Probe::default();
    let launcher = ScriptedLauncher {
        script,
        probe: probe.clone(),
    };
    let config = EngineConfig {
        handshake_timeout: Duration::from_millis(50),
        response_grace: Duration::from_millis(50),
        depth_timeout: Duration::from_millis(200),
        ..EngineConfig::default()
    };
    (EngineAdapter::new(Box::new(launcher), config), probe)
}
