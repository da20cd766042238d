//! Scroll clock: advances the offset one step per tick and composes the
//! leading, trailing and loop delays at cycle boundaries.
//!
//! The chain is an explicit sequence of [`ChainStep`]s held in a single
//! pending slot. Each step schedules its successor, so cancelling the slot
//! cancels the whole chain.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use crate::config::MarqueeConfig;
use crate::machine::{Marquee, Phase};
use crate::pending::ChainStep;

/// Delays applied at cycle boundaries.
///
/// The tick cadence itself always comes from `frames_per_second`; a policy
/// only decides how long to wait before a fresh cycle, at the end of a
/// scroll, and after the loop reset.
pub trait DelayPolicy: fmt::Debug + Send {
    /// Delay before the first tick after `start()`
    fn initial_delay(&self, config: &MarqueeConfig, offset: f64) -> Duration {
        if offset == 0.0 {
            config.leading()
        } else {
            config.tick_interval()
        }
    }

    /// Time the fully scrolled position is held before looping
    fn trailing_pause(&self, config: &MarqueeConfig) -> Duration;

    /// Time between the loop reset and the next tick chain
    fn loop_delay(&self, config: &MarqueeConfig) -> Duration;
}

/// Delays read straight from the configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredDelays;

impl DelayPolicy for ConfiguredDelays {
    fn trailing_pause(&self, config: &MarqueeConfig) -> Duration {
        config.trailing()
    }

    fn loop_delay(&self, config: &MarqueeConfig) -> Duration {
        config.loop_delay()
    }
}

impl Marquee {
    /// Start (or restart) the scroll chain.
    ///
    /// Clears all pending work first and adopts any configuration received
    /// while the previous cycle ran. A cycle starting from offset 0 waits the
    /// leading delay, a resumed one waits a single tick interval.
    pub fn start(&mut self) {
        if !self.is_overflowing() {
            return;
        }
        self.clear_pending();
        self.promote_config();
        self.finished = false;

        let delay = self.policy.initial_delay(&self.config, self.offset);
        self.phase = if self.offset == 0.0 {
            Phase::Leading
        } else {
            Phase::Scrolling
        };
        debug!(offset = self.offset, delay_ms = delay.as_millis(), "Marquee started");
        self.pending.schedule_chain(self.now, delay, ChainStep::Tick);
    }

    /// Cancel every pending timer and commit; the offset stays where it is
    pub fn stop(&mut self) {
        self.clear_pending();
        self.phase = Phase::Idle;
        self.start_of_loop = false;
    }

    pub(crate) fn tick(&mut self) {
        let candidate = self.offset + self.config.step;

        if candidate > self.overflow_width {
            if !self.config.looping {
                debug!(offset = self.offset, "Marquee cycle finished");
                self.phase = Phase::Idle;
                self.finished = true;
                return;
            }

            let trailing = self.policy.trailing_pause(&self.config);
            if trailing.is_zero() {
                // No hold at the end: publish the reset and keep ticking
                debug!("Marquee looping");
                self.queue_commit(0.0, Phase::Scrolling, true);
                self.pending
                    .schedule_chain(self.now, self.config.tick_interval(), ChainStep::Tick);
            } else {
                self.phase = Phase::TrailingPause;
                self.pending
                    .schedule_chain(self.now, trailing, ChainStep::ReleaseTrailing);
            }
            return;
        }

        self.queue_commit(candidate, Phase::Scrolling, false);
        self.pending
            .schedule_chain(self.now, self.config.tick_interval(), ChainStep::Tick);
    }

    /// Trailing pause elapsed: publish the loop reset, then wait out the loop delay (if any)
    pub(crate) fn release_trailing(&mut self) {
        let loop_delay = self.policy.loop_delay(&self.config);
        debug!(loop_delay_ms = loop_delay.as_millis(), "Marquee looping");

        if loop_delay.is_zero() {
            self.queue_commit(0.0, Phase::Scrolling, true);
            self.pending
                .schedule_chain(self.now, self.config.tick_interval(), ChainStep::Tick);
        } else {
            self.queue_commit(0.0, Phase::LoopDelay, true);
            self.pending
                .schedule_chain(self.now, loop_delay, ChainStep::ResumeAfterLoopDelay);
        }
    }

    pub(crate) fn resume_after_loop_delay(&mut self) {
        self.phase = Phase::Scrolling;
        self.pending
            .schedule_chain(self.now, self.config.tick_interval(), ChainStep::Tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Widths;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn marquee(config: MarqueeConfig, overflow: f64) -> Marquee {
        let mut marquee = Marquee::new(config);
        marquee.apply_widths(Widths::new(200.0, 200.0 + overflow));
        marquee
    }

    fn fifty_fps() -> MarqueeConfig {
        MarqueeConfig {
            frames_per_second: 50.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_runs_to_end_without_loop() {
        let mut marquee = marquee(fifty_fps(), 100.0);
        marquee.start();

        // First tick fires at t=0, then every 20ms; the 101st would overshoot.
        marquee.advance(ms(2000));
        assert_eq!(marquee.offset(), 100.0);
        assert_eq!(marquee.phase(), Phase::Idle);
        assert!(!marquee.is_running());

        marquee.advance(ms(20));
        assert_eq!(marquee.offset(), 100.0);
        marquee.advance(ms(60_000));
        assert_eq!(marquee.offset(), 100.0);
        assert_eq!(marquee.phase(), Phase::Idle);
    }

    #[test]
    fn test_offset_never_exceeds_overflow() {
        let mut marquee = marquee(
            MarqueeConfig {
                step: 7.0,
                looping: true,
                ..fifty_fps()
            },
            100.0,
        );
        marquee.start();
        for _ in 0..500 {
            marquee.advance(ms(7));
            assert!(marquee.offset() >= 0.0);
            assert!(marquee.offset() <= marquee.overflow_width());
        }
    }

    #[test]
    fn test_double_start_keeps_single_chain() {
        let mut marquee = marquee(fifty_fps(), 100.0);
        marquee.start();
        marquee.start();

        // Leading is 0, so one tick fires immediately, then one per interval.
        marquee.advance(ms(200));
        assert_eq!(marquee.offset(), 11.0);
    }

    #[test]
    fn test_restart_mid_scroll_resumes_after_one_interval() {
        let mut marquee = marquee(fifty_fps(), 100.0);
        marquee.start();
        marquee.advance(ms(90));
        assert_eq!(marquee.offset(), 5.0);

        marquee.start();
        marquee.start();
        assert_eq!(marquee.phase(), Phase::Scrolling);
        marquee.advance(ms(19));
        assert_eq!(marquee.offset(), 5.0);
        marquee.advance(ms(1));
        assert_eq!(marquee.offset(), 6.0);
        marquee.advance(ms(200));
        assert_eq!(marquee.offset(), 16.0);
    }

    #[test]
    fn test_leading_delay() {
        let mut marquee = marquee(
            MarqueeConfig {
                leading_ms: 500,
                ..fifty_fps()
            },
            100.0,
        );
        marquee.start();
        assert_eq!(marquee.phase(), Phase::Leading);

        marquee.advance(ms(499));
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.phase(), Phase::Leading);

        marquee.advance(ms(1));
        assert_eq!(marquee.offset(), 1.0);
        assert_eq!(marquee.phase(), Phase::Scrolling);
    }

    #[test]
    fn test_stop_keeps_offset() {
        let mut marquee = marquee(fifty_fps(), 100.0);
        marquee.start();
        marquee.advance(ms(100));
        let offset = marquee.offset();

        marquee.stop();
        marquee.stop();
        marquee.advance(ms(1000));
        assert_eq!(marquee.offset(), offset);
        assert_eq!(marquee.phase(), Phase::Idle);
    }

    #[test]
    fn test_loop_with_trailing_and_loop_delay() {
        let mut marquee = marquee(
            MarqueeConfig {
                looping: true,
                trailing_ms: 300,
                loop_delay_ms: 400,
                ..fifty_fps()
            },
            10.0,
        );
        marquee.start();

        // Ticks at 0..=180ms reach 10, the tick at 200ms overshoots.
        marquee.advance(ms(200));
        assert_eq!(marquee.offset(), 10.0);
        assert_eq!(marquee.phase(), Phase::TrailingPause);

        marquee.advance(ms(299));
        assert_eq!(marquee.offset(), 10.0);
        assert_eq!(marquee.phase(), Phase::TrailingPause);

        marquee.advance(ms(1));
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.phase(), Phase::LoopDelay);
        assert!(marquee.render_hints().transition);

        // Loop delay, then one tick interval before the first step.
        marquee.advance(ms(419));
        assert_eq!(marquee.offset(), 0.0);
        marquee.advance(ms(1));
        assert_eq!(marquee.offset(), 1.0);
        assert_eq!(marquee.phase(), Phase::Scrolling);
        assert!(!marquee.render_hints().transition);
    }

    #[test]
    fn test_loop_without_trailing_resets_immediately() {
        let mut marquee = marquee(
            MarqueeConfig {
                looping: true,
                ..fifty_fps()
            },
            10.0,
        );
        marquee.start();
        marquee.advance(ms(200));
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.phase(), Phase::Scrolling);

        marquee.advance(ms(20));
        assert_eq!(marquee.offset(), 1.0);
    }

    #[test]
    fn test_loop_delay_only_follows_trailing_pause() {
        let mut marquee = marquee(
            MarqueeConfig {
                looping: true,
                loop_delay_ms: 1000,
                ..fifty_fps()
            },
            10.0,
        );
        marquee.start();

        marquee.advance(ms(200));
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.phase(), Phase::Scrolling);
        assert!(marquee.render_hints().transition);

        marquee.advance(ms(20));
        assert_eq!(marquee.offset(), 1.0);
        assert_eq!(marquee.phase(), Phase::Scrolling);
        assert!(!marquee.render_hints().transition);
    }

    #[test]
    fn test_reconfigure_waits_for_next_start() {
        let mut marquee = marquee(fifty_fps(), 100.0);
        marquee.start();
        marquee.advance(ms(100));
        assert_eq!(marquee.offset(), 6.0);

        marquee.reconfigure(MarqueeConfig {
            step: 5.0,
            ..fifty_fps()
        });
        assert_eq!(marquee.config().step, 5.0);

        // The running cycle keeps its step
        marquee.advance(ms(20));
        assert_eq!(marquee.offset(), 7.0);

        marquee.stop();
        marquee.start();
        marquee.advance(ms(20));
        assert_eq!(marquee.offset(), 12.0);
    }

    #[test]
    fn test_finished_cycle_stays_finished() {
        let mut marquee = marquee(fifty_fps(), 10.0);
        marquee.start();
        marquee.advance(ms(1000));
        assert_eq!(marquee.phase(), Phase::Idle);

        marquee.advance(ms(1000));
        assert_eq!(marquee.offset(), 10.0);
        assert_eq!(marquee.next_deadline(), None);

        // An explicit start still runs one more (terminating) tick
        marquee.start();
        assert!(marquee.is_running());
        marquee.advance(ms(20));
        assert_eq!(marquee.offset(), 10.0);
        assert_eq!(marquee.phase(), Phase::Idle);
    }

    #[derive(Debug)]
    struct DoubledTrailing;

    impl DelayPolicy for DoubledTrailing {
        fn trailing_pause(&self, config: &MarqueeConfig) -> Duration {
            config.trailing() * 2
        }

        fn loop_delay(&self, _config: &MarqueeConfig) -> Duration {
            Duration::ZERO
        }
    }

    #[test]
    fn test_custom_delay_policy() {
        let mut marquee = Marquee::new(MarqueeConfig {
            looping: true,
            trailing_ms: 100,
            loop_delay_ms: 5000,
            ..fifty_fps()
        })
        .with_delay_policy(DoubledTrailing);
        marquee.apply_widths(Widths::new(10.0, 12.0));
        marquee.start();

        // Ticks at 0 and 20ms reach 2; the overshoot at 40ms starts a 200ms hold.
        marquee.advance(ms(239));
        assert_eq!(marquee.offset(), 2.0);
        marquee.advance(ms(1));
        assert_eq!(marquee.offset(), 0.0);
        assert_eq!(marquee.phase(), Phase::Scrolling);
    }
}
