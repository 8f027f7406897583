//! Round countdown.
//!
//! Each round owns its own [`Timer`]: a worker thread that sends one
//! [`TimerTick`] per interval on a channel private to that timer. Ticks are
//! stamped with the [`RoundId`] that started the timer, so a tick can never be
//! mistaken for one belonging to a later round.

use crate::error::{GameError, Result};
use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identity of one round. Increases every time a round is (re)started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RoundId(u64);

impl RoundId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTick {
    pub round: RoundId,
}

/// How the round clock advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickMode {
    /// A background timer ticks once per interval.
    Threaded(Duration),
    /// No timer; the caller drives the clock with explicit ticks.
    Manual,
}

impl Default for TickMode {
    fn default() -> Self {
        Self::Threaded(DEFAULT_TICK_INTERVAL)
    }
}

/// A running countdown bound to one round.
///
/// Stopping (or dropping) the timer joins its worker and discards any tick
/// that was still queued, so nothing is delivered afterwards.
#[derive(Debug)]
pub struct Timer {
    round: RoundId,
    ticks: Receiver<TimerTick>,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Timer {
    pub fn start(round: RoundId, interval: Duration) -> Result<Self> {
        let (tick_tx, ticks) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name(format!("round-timer-{}", round.0))
            .spawn(move || run_countdown(round, interval, &stop_rx, &tick_tx))
            .map_err(GameError::TimerSpawn)?;

        log::debug!("Timer for round {round} started ({interval:?} interval)");
        Ok(Self {
            round,
            ticks,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn round(&self) -> RoundId {
        self.round
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Takes every tick queued so far without blocking.
    pub fn drain(&self) -> Vec<TimerTick> {
        self.ticks.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next tick.
    pub fn wait_tick(&self, timeout: Duration) -> Option<TimerTick> {
        if !self.is_running() {
            return None;
        }
        self.ticks.recv_timeout(timeout).ok()
    }

    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The worker also exits when the sender is dropped.
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Timer thread for round {} panicked", self.round);
            }
            while self.ticks.try_recv().is_ok() {}
            log::debug!("Timer for round {} stopped", self.round);
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_countdown(
    round: RoundId,
    interval: Duration,
    stop_rx: &Receiver<()>,
    tick_tx: &Sender<TimerTick>,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if tick_tx.send(TimerTick { round }).is_err() {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
