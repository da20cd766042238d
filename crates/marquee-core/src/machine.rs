//! The marquee aggregate: owns offset, overflow and phase, and drives the
//! pending-work schedule through virtual time.
//!
//! Hosts feed it three kinds of input: width samples ([`Marquee::measure`]),
//! pointer events ([`Marquee::pointer_enter`], [`Marquee::pointer_leave`]) and
//! time ([`Marquee::advance_to`]). They read back [`Marquee::render_hints`]
//! each redraw.
//!
//! # Invariants
//!
//! 1. Published offsets stay within `[0, overflow_width]`.
//! 2. At most one scroll chain is pending; `start` always clears the slate first.
//! 3. With `overflow_width <= 0` the phase is `Idle` and pointer events are ignored.

use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::clock::{ConfiguredDelays, DelayPolicy};
use crate::config::MarqueeConfig;
use crate::layout::{self, LayoutOracle, Widths};
use crate::pending::{ChainStep, Due, PendingCommit, PendingWork};

/// Position in the scroll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Not scrolling
    #[default]
    Idle,
    /// Waiting out the leading delay of a fresh cycle
    Leading,
    /// Ticking
    Scrolling,
    /// Holding the fully scrolled position before the loop reset
    TrailingPause,
    /// Loop reset published, waiting before ticking resumes
    LoopDelay,
}

/// One scrolling-text instance
#[derive(Debug)]
pub struct Marquee {
    /// Configuration the current cycle runs with
    pub(crate) config: MarqueeConfig,
    /// Received while a cycle was running; adopted by the next start
    pub(crate) next_config: Option<MarqueeConfig>,
    pub(crate) policy: Box<dyn DelayPolicy>,
    pub(crate) overflow_width: f64,
    pub(crate) offset: f64,
    pub(crate) phase: Phase,
    /// Last commit was a loop reset
    pub(crate) start_of_loop: bool,
    /// Eased return to the start after the pointer left
    pub(crate) settling: bool,
    pub(crate) hover_active: bool,
    /// A non-looping cycle ran to its end; layout updates leave it there
    pub(crate) finished: bool,
    /// Virtual time since construction
    pub(crate) now: Duration,
    pub(crate) pending: PendingWork,
}

impl Default for Marquee {
    fn default() -> Self {
        Self::new(MarqueeConfig::default())
    }
}

impl Marquee {
    pub fn new(config: MarqueeConfig) -> Self {
        Self {
            config: config.sanitized(),
            next_config: None,
            policy: Box::new(ConfiguredDelays),
            overflow_width: 0.0,
            offset: 0.0,
            phase: Phase::Idle,
            start_of_loop: false,
            settling: false,
            hover_active: false,
            finished: false,
            now: Duration::ZERO,
            pending: PendingWork::default(),
        }
    }

    /// Replace the delay policy consulted at cycle boundaries
    pub fn with_delay_policy(mut self, policy: impl DelayPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Most recently applied configuration, which may not have reached the running cycle yet
    pub fn config(&self) -> &MarqueeConfig {
        self.next_config.as_ref().unwrap_or(&self.config)
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn overflow_width(&self) -> f64 {
        self.overflow_width
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether there is anything to scroll (pointer handlers attached)
    #[inline]
    pub fn is_overflowing(&self) -> bool {
        self.overflow_width > 0.0
    }

    /// Whether a scroll chain is pending
    #[inline]
    pub fn is_running(&self) -> bool {
        self.pending.has_chain()
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hover_active
    }

    #[inline]
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    #[inline]
    pub fn has_pending_commit(&self) -> bool {
        self.pending.has_commit()
    }

    /// Current virtual time
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Earliest pending timer deadline, for hosts that sleep until it
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.next_deadline()
    }

    /// Whether the host should keep redrawing at a high rate
    pub fn needs_update(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply a new configuration.
    ///
    /// A change in text length invalidates the current offset, so every
    /// pending timer is cancelled and the offset returns to 0. Otherwise a
    /// running cycle keeps its settings and the new ones apply from the next start.
    pub fn reconfigure(&mut self, config: MarqueeConfig) {
        let config = config.sanitized();
        let old_len = self.config().text_len();

        if config.text_len() != old_len {
            debug!(
                old_len,
                new_len = config.text_len(),
                "Marquee text length changed, resetting cycle"
            );
            self.reset();
            self.config = config;
        } else if self.is_running() {
            self.next_config = Some(config);
        } else {
            self.config = config;
            self.next_config = None;
        }
    }

    /// Sample widths through `oracle` and apply them.
    ///
    /// Returns the overflow, or `None` (and changes nothing) when either
    /// element is not attached or not laid out yet.
    pub fn measure<O: LayoutOracle>(
        &mut self,
        oracle: &O,
        container: Option<&O::Container>,
        content: Option<&O::Content>,
    ) -> Option<f64> {
        let widths = layout::sample(oracle, container, content)?;
        Some(self.apply_widths(widths))
    }

    /// Apply an already sampled pair of widths; returns the overflow
    pub fn apply_widths(&mut self, widths: Widths) -> f64 {
        let overflow = widths.overflow();

        if overflow != self.overflow_width {
            debug!(old = self.overflow_width, new = overflow, "Marquee overflow changed");
            self.overflow_width = overflow;
            self.finished = false;

            if overflow <= 0.0 {
                // Nothing to scroll: handlers detach and the cycle ends
                self.clear_pending();
                self.offset = 0.0;
                self.phase = Phase::Idle;
                self.start_of_loop = false;
                self.hover_active = false;
            } else if self.offset > overflow {
                self.offset = overflow;
            }
        }

        self.rearm();
        overflow
    }

    /// Auto-start for hover-to-stop mode after a layout update.
    ///
    /// Skipped while the pointer holds the marquee frozen, a chain is
    /// already pending, or a non-looping cycle has finished.
    fn rearm(&mut self) {
        if self.config().hover_to_stop
            && self.is_overflowing()
            && !self.hover_active
            && !self.finished
            && !self.is_running()
        {
            self.start();
        }
    }

    /// Cancel everything and return to the first frame
    pub fn reset(&mut self) {
        self.clear_pending();
        self.promote_config();
        self.finished = false;
        self.offset = 0.0;
        self.phase = Phase::Idle;
        self.start_of_loop = false;
    }

    /// Full teardown when the instance is destroyed
    pub fn teardown(&mut self) {
        debug!(offset = self.offset, "Marquee torn down");
        self.clear_pending();
        self.phase = Phase::Idle;
        self.hover_active = false;
    }

    /// Cancel every pending timer and commit
    pub(crate) fn clear_pending(&mut self) {
        self.pending.cancel_all();
        self.settling = false;
    }

    /// Adopt a configuration deferred while a cycle was running
    pub(crate) fn promote_config(&mut self) {
        if let Some(config) = self.next_config.take() {
            self.config = config;
        }
    }

    pub(crate) fn queue_commit(&mut self, offset: f64, phase: Phase, start_of_loop: bool) {
        self.pending.queue_commit(PendingCommit {
            offset,
            phase,
            start_of_loop,
        });
    }

    /// Apply the queued commit at a frame boundary. Returns whether one was applied.
    pub fn commit_frame(&mut self) -> bool {
        let Some(commit) = self.pending.take_commit() else {
            return false;
        };
        self.offset = commit.offset.clamp(0.0, self.overflow_width.max(0.0));
        self.phase = commit.phase;
        self.start_of_loop = commit.start_of_loop;
        true
    }

    /// Fire the earliest timer due at or before `now`.
    ///
    /// A frame boundary always precedes the next timer, so a queued commit is
    /// applied first. Returns whether a timer fired; the caller decides when
    /// to commit what it queued.
    pub fn poll(&mut self, now: Duration) -> bool {
        self.commit_frame();
        let now = now.max(self.now);

        match self.pending.pop_due(now) {
            Some((due_at, due)) => {
                self.now = due_at;
                match due {
                    Due::Chain(step) => self.run_chain_step(step),
                    Due::Settle => self.finish_settle(),
                }
                true
            }
            None => {
                self.now = now;
                false
            }
        }
    }

    /// Run every timer due up to `now`, committing after each one
    pub fn advance_to(&mut self, now: Duration) {
        while self.poll(now) {
            self.commit_frame();
        }
        self.commit_frame();
    }

    pub fn advance(&mut self, by: Duration) {
        self.advance_to(self.now + by);
    }

    fn run_chain_step(&mut self, step: ChainStep) {
        match step {
            ChainStep::Tick => self.tick(),
            ChainStep::ReleaseTrailing => self.release_trailing(),
            ChainStep::ResumeAfterLoopDelay => self.resume_after_loop_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn overflowing(config: MarqueeConfig, overflow: f64) -> Marquee {
        let mut marquee = Marquee::new(config);
        marquee.apply_widths(Widths::new(100.0, 100.0 + overflow));
        marquee
    }

    #[test]
    fn test_initial_state() {
        let marquee = Marquee::default();
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.overflow_width(), 0.0);
        assert_eq!(marquee.phase(), Phase::Idle);
        assert!(!marquee.is_running());
        assert!(!marquee.needs_update());
    }

    #[test]
    fn test_no_overflow_never_leaves_idle() {
        let mut marquee = Marquee::new(MarqueeConfig {
            hover_to_stop: true,
            ..Default::default()
        });
        marquee.apply_widths(Widths::new(100.0, 80.0));
        marquee.start();
        marquee.pointer_enter();
        marquee.advance(ms(1000));

        assert_eq!(marquee.phase(), Phase::Idle);
        assert!(!marquee.is_running());
        assert!(!marquee.is_hovered());
        assert_eq!(marquee.offset(), 0.0);
    }

    #[test]
    fn test_overflow_vanishing_stops_cycle() {
        let mut marquee = overflowing(MarqueeConfig::default(), 50.0);
        marquee.start();
        marquee.advance(ms(200));
        assert!(marquee.offset() > 0.0);

        marquee.apply_widths(Widths::new(100.0, 90.0));
        assert_eq!(marquee.phase(), Phase::Idle);
        assert_eq!(marquee.offset(), 0.0);
        assert!(!marquee.needs_update());
    }

    #[test]
    fn test_shrinking_overflow_clamps_offset() {
        let mut marquee = overflowing(MarqueeConfig::default(), 50.0);
        marquee.start();
        marquee.advance(ms(500));
        assert_eq!(marquee.offset(), 30.0);

        marquee.apply_widths(Widths::new(100.0, 110.0));
        assert_eq!(marquee.offset(), 10.0);
    }

    #[test]
    fn test_text_length_change_resets() {
        let mut marquee = overflowing(MarqueeConfig::with_text("abcdef"), 50.0);
        marquee.start();
        marquee.advance(ms(100));
        assert!(marquee.offset() > 0.0);

        marquee.reconfigure(MarqueeConfig::with_text("abc"));
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.phase(), Phase::Idle);
        assert!(!marquee.needs_update());

        let before = marquee.offset();
        marquee.advance(ms(1000));
        assert_eq!(marquee.offset(), before);
    }

    #[test]
    fn test_same_length_reconfigure_keeps_cycle() {
        let mut marquee = overflowing(MarqueeConfig::with_text("abcdef"), 50.0);
        marquee.start();
        marquee.advance(ms(100));
        let offset = marquee.offset();

        marquee.reconfigure(MarqueeConfig {
            looping: true,
            ..MarqueeConfig::with_text("ghijkl")
        });
        assert_eq!(marquee.offset(), offset);
        assert!(marquee.is_running());
        assert!(marquee.config().looping);
        assert_eq!(marquee.config().text, "ghijkl");

        // The running cycle was started without looping and still ends
        marquee.advance(ms(2000));
        assert_eq!(marquee.offset(), 50.0);
        assert_eq!(marquee.phase(), Phase::Idle);
        assert!(!marquee.is_running());

        // The next start loops
        marquee.reset();
        marquee.start();
        marquee.advance(ms(2000));
        assert!(marquee.is_running());
    }

    #[test]
    fn test_stale_commit_cancelled_by_stop() {
        let mut marquee = overflowing(MarqueeConfig::default(), 50.0);
        marquee.start();

        // The first tick queues a commit of offset 1 ...
        assert!(marquee.poll(Duration::ZERO));
        assert!(marquee.has_pending_commit());

        // ... which a stop before the frame boundary discards.
        marquee.stop();
        assert!(!marquee.commit_frame());
        assert_eq!(marquee.offset(), 0.0);
    }

    #[test]
    fn test_poll_commits_before_next_timer() {
        let mut marquee = overflowing(MarqueeConfig::default(), 50.0);
        marquee.start();
        let tick = marquee.config().tick_interval();

        assert!(marquee.poll(Duration::ZERO));
        assert!(marquee.poll(tick));
        marquee.commit_frame();
        assert_eq!(marquee.offset(), 2.0);
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let mut marquee = overflowing(MarqueeConfig::default(), 50.0);
        marquee.pointer_enter();
        marquee.advance(ms(100));
        marquee.pointer_leave();
        assert!(marquee.needs_update());

        marquee.teardown();
        assert!(!marquee.needs_update());
        assert_eq!(marquee.next_deadline(), None);
        assert!(!marquee.is_hovered());
    }

    #[test]
    fn test_measure_without_handles_is_noop() {
        struct Unattached;
        impl LayoutOracle for Unattached {
            type Container = ();
            type Content = ();
            fn container_width(&self, _: &()) -> Option<f64> {
                None
            }
            fn content_width(&self, _: &()) -> Option<f64> {
                Some(10.0)
            }
        }

        let mut marquee = Marquee::default();
        assert_eq!(marquee.measure(&Unattached, Some(&()), Some(&())), None);
        assert_eq!(marquee.measure(&Unattached, None, None), None);
        assert_eq!(marquee.overflow_width(), 0.0);
    }
}
