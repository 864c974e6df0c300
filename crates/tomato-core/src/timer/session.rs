//! Session: a [`PhaseEngine`] wired to a tick source and a cue player.
//!
//! The engine stays pure; the session owns the single tick subscription
//! and dispatches the effects each transition returns.

use tokio::sync::mpsc;

use super::effect::{Accrual, Effect, PhaseCompletion};
use super::engine::PhaseEngine;
use super::phase::PhaseConfig;
use super::tick::{Tick, TickSender, TickSource};
use crate::audio::{CuePlayer, SoundCue};
use crate::events::Event;

type CompletionHook = Box<dyn FnMut(&PhaseCompletion)>;
type AccrualHook = Box<dyn FnMut(&Accrual)>;

pub struct Session<T: TickSource> {
    engine: PhaseEngine,
    ticker: T,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
    generation: u64,
    player: Box<dyn CuePlayer>,
    on_complete: Option<CompletionHook>,
    on_accrue: Option<AccrualHook>,
}

impl<T: TickSource> Session<T> {
    pub fn new(engine: PhaseEngine, ticker: T, player: Box<dyn CuePlayer>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            engine,
            ticker,
            tx,
            rx,
            generation: 0,
            player,
            on_complete: None,
            on_accrue: None,
        }
    }

    /// Called after every phase boundary. Its result is not awaited.
    pub fn on_complete(mut self, hook: impl FnMut(&PhaseCompletion) + 'static) -> Self {
        self.on_complete = Some(Box::new(hook));
        self
    }

    /// Called when a work phase finishes with a task associated.
    pub fn on_accrue(mut self, hook: impl FnMut(&Accrual) + 'static) -> Self {
        self.on_accrue = Some(Box::new(hook));
        self
    }

    pub fn engine(&self) -> &PhaseEngine {
        &self.engine
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting. Subscribes the tick source only when the engine
    /// actually transitions to running, so repeated starts never stack
    /// timers.
    pub fn start(&mut self) -> Option<Event> {
        let event = self.engine.start()?;
        self.generation += 1;
        self.ticker
            .subscribe(TickSender::new(self.tx.clone(), self.generation));
        Some(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.stop_ticks();
        event
    }

    /// Start if paused, pause if running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.engine.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset();
        self.stop_ticks();
        event
    }

    pub fn reconfigure(&mut self, config: PhaseConfig, cue: SoundCue) -> Option<Event> {
        let event = self.engine.reconfigure(config, cue);
        self.stop_ticks();
        event
    }

    pub fn associate_task(&mut self, task_id: Option<String>) {
        self.engine.associate_task(task_id);
    }

    // ── Ticks ────────────────────────────────────────────────────────

    /// Wait for the next tick from the current or a stale subscription.
    pub async fn next_tick(&mut self) -> Option<Tick> {
        self.rx.recv().await
    }

    /// Process every tick already queued, returning all resulting effects.
    pub fn pump(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Ok(tick) = self.rx.try_recv() {
            effects.extend(self.handle_tick(tick));
        }
        effects
    }

    pub fn handle_tick(&mut self, tick: Tick) -> Vec<Effect> {
        if tick.generation != self.generation {
            tracing::trace!(
                stale = tick.generation,
                current = self.generation,
                "dropping stale tick"
            );
            return Vec::new();
        }
        let effects = self.engine.tick();
        if !self.engine.is_running() {
            self.stop_ticks();
        }
        self.dispatch(&effects);
        effects
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn stop_ticks(&mut self) {
        self.ticker.cancel();
        self.generation += 1;
    }

    fn dispatch(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::PlayCue(cue) => {
                    if let Err(e) = self.player.play(cue) {
                        tracing::warn!(error = %e, sound = %cue.sound, "failed to play cue");
                    }
                }
                Effect::PhaseCompleted(completion) => {
                    tracing::info!(
                        completed = %completion.completed,
                        next = %completion.next,
                        count = completion.completed_work_count,
                        "phase complete"
                    );
                    if let Some(hook) = self.on_complete.as_mut() {
                        hook(completion);
                    }
                }
                Effect::AccrueDuration(accrual) => {
                    if let Some(hook) = self.on_accrue.as_mut() {
                        hook(accrual);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::RecordingPlayer;
    use crate::timer::{ManualTicker, Phase};

    fn session(work: u64, cycles: u32) -> (Session<ManualTicker>, ManualTicker, RecordingPlayer) {
        let ticker = ManualTicker::new();
        let player = RecordingPlayer::new();
        let engine = PhaseEngine::new(
            PhaseConfig::from_secs(work, 5, 10, cycles),
            SoundCue::new("water", 30),
        );
        let session = Session::new(engine, ticker.clone(), Box::new(player.clone()));
        (session, ticker, player)
    }

    #[test]
    fn repeated_start_subscribes_once() {
        let (mut session, ticker, _) = session(10, 4);
        assert!(session.start().is_some());
        assert!(session.start().is_none());
        assert_eq!(ticker.subscriptions(), 1);
    }

    #[test]
    fn ticks_count_down_while_running() {
        let (mut session, ticker, _) = session(10, 4);
        session.start();
        ticker.advance(3);
        assert!(session.pump().is_empty());
        assert_eq!(session.engine().remaining_secs(), 7);
    }

    #[test]
    fn boundary_cancels_ticks_and_plays_cue() {
        let (mut session, ticker, player) = session(5, 4);
        session.start();
        ticker.advance(5);
        let effects = session.pump();

        assert_eq!(session.engine().phase(), Phase::ShortBreak);
        assert!(!ticker.is_active());
        assert_eq!(player.played(), vec![SoundCue::new("water", 30)]);
        assert_eq!(effects.len(), 2);

        // No auto-continue: further ticks are not delivered.
        assert_eq!(ticker.advance(3), 0);
        assert_eq!(session.engine().remaining_secs(), 5);
    }

    #[test]
    fn stale_ticks_after_pause_are_discarded() {
        let (mut session, ticker, _) = session(10, 4);
        session.start();
        ticker.advance(2);
        session.pause();
        session.start();
        ticker.advance(1);
        session.pump();
        // Only the tick from the live subscription counts.
        assert_eq!(session.engine().remaining_secs(), 9);
    }

    #[test]
    fn failing_player_does_not_block_transition() {
        let ticker = ManualTicker::new();
        let engine = PhaseEngine::new(PhaseConfig::from_secs(5, 5, 5, 4), SoundCue::default());
        let mut session = Session::new(engine, ticker.clone(), Box::new(RecordingPlayer::failing()));
        session.start();
        ticker.advance(5);
        session.pump();
        assert_eq!(session.engine().phase(), Phase::ShortBreak);
    }

    #[test]
    fn hooks_receive_completion_and_accrual() {
        let completions = Rc::new(RefCell::new(Vec::new()));
        let accruals = Rc::new(RefCell::new(Vec::new()));
        let (base, ticker, _) = session(60, 4);
        let mut session = base
            .on_complete({
                let completions = Rc::clone(&completions);
                move |c| completions.borrow_mut().push(*c)
            })
            .on_accrue({
                let accruals = Rc::clone(&accruals);
                move |a| accruals.borrow_mut().push(a.clone())
            });
        session.associate_task(Some("task-1".into()));
        session.start();
        ticker.advance(60);
        session.pump();

        assert_eq!(completions.borrow().len(), 1);
        assert_eq!(completions.borrow()[0].next, Phase::ShortBreak);
        assert_eq!(
            *accruals.borrow(),
            vec![Accrual {
                task_id: "task-1".into(),
                minutes: 1.0
            }]
        );
    }

    #[test]
    fn reset_cancels_subscription() {
        let (mut session, ticker, _) = session(10, 4);
        session.start();
        ticker.advance(4);
        session.reset();
        assert!(!ticker.is_active());
        session.pump();
        assert_eq!(session.engine().remaining_secs(), 10);
        assert_eq!(session.engine().completed_work_count(), 0);
    }
}
