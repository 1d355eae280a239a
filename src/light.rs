use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;
use parking_lot::Mutex;
use rand::Rng;

use crate::config::LightConfig;
use crate::mailbox::{Mailbox, RecvError};
use crate::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    AlreadyStarted,
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartError::AlreadyStarted => write!(f, "traffic light is already running"),
        }
    }
}

impl std::error::Error for StartError {}

// The phase lock and the mailbox lock are independent. The cycling thread
// never holds the phase lock across a send, and readers never hold it while
// blocked in recv.
struct Shared {
    phase: Mutex<Phase>,
    transitions: Mailbox<Phase>,
    shutdown: AtomicBool,
}

/// A single traffic light: a background thread toggles the phase between
/// red and green at randomized intervals and publishes every transition.
pub struct TrafficLight {
    shared: Arc<Shared>,
    started: AtomicBool,
    config: LightConfig,
}

impl TrafficLight {
    pub fn new(config: LightConfig) -> Self {
        TrafficLight {
            shared: Arc::new(Shared {
                phase: Mutex::new(Phase::Red),
                transitions: Mailbox::new(),
                shutdown: AtomicBool::new(false),
            }),
            started: AtomicBool::new(false),
            config,
        }
    }

    pub fn current_phase(&self) -> Phase {
        *self.shared.phase.lock()
    }

    /// Blocks until the light reports a transition to green. Returns `Err`
    /// only once the light has been shut down.
    pub fn wait_for_green(&self) -> Result<(), RecvError> {
        loop {
            if self.shared.transitions.recv()? == Phase::Green {
                return Ok(());
            }
        }
    }

    /// Spawns the phase-cycling thread and appends its handle to the
    /// caller's container. The caller owns the handle and joins it after
    /// [`shutdown`](Self::shutdown). Starting twice is an error.
    pub fn start(&self, threads: &mut Vec<JoinHandle<()>>) -> Result<(), StartError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(StartError::AlreadyStarted);
        }
        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        threads.push(thread::spawn(move || cycle_phases(&shared, &config)));
        Ok(())
    }

    /// Stops the phase-cycling thread at its next poll and wakes every
    /// caller blocked in [`wait_for_green`](Self::wait_for_green).
    pub fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        self.shared.transitions.close();
    }
}

fn cycle_phases(shared: &Shared, config: &LightConfig) {
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    // One generator for the whole task, fresh threshold after every toggle.
    let mut rng = rand::rng();
    let mut threshold = next_threshold(&mut rng, config);
    let mut last_toggle = Instant::now();

    while !shared.shutdown.load(Ordering::SeqCst) {
        thread::sleep(poll_interval);
        if last_toggle.elapsed() < threshold {
            continue;
        }

        let next = {
            let mut phase = shared.phase.lock();
            *phase = phase.toggled();
            *phase
        };
        shared.transitions.send(next);
        debug!("traffic light switched to {}", next.as_string());

        last_toggle = Instant::now();
        threshold = next_threshold(&mut rng, config);
    }
}

fn next_threshold(rng: &mut impl Rng, config: &LightConfig) -> Duration {
    Duration::from_secs_f64(rng.random_range(config.min_phase_secs..config.max_phase_secs))
}
