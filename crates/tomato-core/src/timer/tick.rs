//! Tick sources: where the one-second heartbeat comes from.
//!
//! A source delivers [`Tick`]s into a channel owned by the session. Each
//! subscription is stamped with a generation so ticks queued by a cancelled
//! subscription can be told apart from live ones.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Sending half handed to a [`TickSource`] on subscribe.
#[derive(Debug, Clone)]
pub struct TickSender {
    tx: mpsc::UnboundedSender<Tick>,
    generation: u64,
}

impl TickSender {
    pub fn new(tx: mpsc::UnboundedSender<Tick>, generation: u64) -> Self {
        Self { tx, generation }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns false once the receiving side is gone.
    pub fn send(&self) -> bool {
        self.tx
            .send(Tick {
                generation: self.generation,
            })
            .is_ok()
    }
}

pub trait TickSource {
    /// Begin delivering ticks through `sender`, replacing any previous
    /// subscription.
    fn subscribe(&mut self, sender: TickSender);

    /// Stop delivering ticks. No-op when not subscribed.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;
}

/// Real-time source backed by a tokio interval.
///
/// The first tick arrives one full period after `subscribe`. Must be
/// subscribed from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalTicker {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for IntervalTicker {
    fn subscribe(&mut self, sender: TickSender) {
        self.cancel();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if !sender.send() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Manually advanced clock for deterministic tests. Clones share state, so a
/// test can keep one handle while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    sender: Arc<Mutex<Option<TickSender>>>,
    subscriptions: Arc<Mutex<u32>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `n` ticks if subscribed. Returns how many were sent.
    pub fn advance(&self, n: u32) -> u32 {
        let guard = self.sender.lock().unwrap_or_else(|p| p.into_inner());
        let Some(sender) = guard.as_ref() else {
            return 0;
        };
        let mut sent = 0;
        for _ in 0..n {
            if !sender.send() {
                break;
            }
            sent += 1;
        }
        sent
    }

    /// Total number of `subscribe` calls so far.
    pub fn subscriptions(&self) -> u32 {
        *self.subscriptions.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl TickSource for ManualTicker {
    fn subscribe(&mut self, sender: TickSender) {
        *self.sender.lock().unwrap_or_else(|p| p.into_inner()) = Some(sender);
        *self.subscriptions.lock().unwrap_or_else(|p| p.into_inner()) += 1;
    }

    fn cancel(&mut self) {
        self.sender.lock().unwrap_or_else(|p| p.into_inner()).take();
    }

    fn is_active(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }
}
