//! Every unit of deferred work an instance may have outstanding.
//!
//! Three slots, each holding at most one entry: the scroll chain (tick,
//! trailing release or loop-delay resume), the hover settle timer, and the
//! frame-synchronized commit. Scheduling into an occupied slot replaces its
//! entry, so two tick chains can never coexist. Cancelling an empty slot is
//! a no-op.

use std::time::Duration;

use crate::machine::Phase;

/// Next step of the scroll chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChainStep {
    /// Advance the offset by one step
    Tick,
    /// Trailing pause elapsed; publish the loop reset
    ReleaseTrailing,
    /// Loop delay elapsed; resume ticking
    ResumeAfterLoopDelay,
}

/// Timer that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Due {
    Chain(ChainStep),
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer<T> {
    due: Duration,
    /// Scheduling order, breaks ties between timers due at the same instant
    seq: u64,
    what: T,
}

/// State write deferred to the next frame boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PendingCommit {
    pub offset: f64,
    pub phase: Phase,
    pub start_of_loop: bool,
}

#[derive(Debug, Default)]
pub(crate) struct PendingWork {
    chain: Option<Timer<ChainStep>>,
    settle: Option<Timer<()>>,
    commit: Option<PendingCommit>,
    next_seq: u64,
}

impl PendingWork {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Schedule the next chain step, replacing any pending one
    pub fn schedule_chain(&mut self, now: Duration, delay: Duration, step: ChainStep) {
        let seq = self.next_seq();
        self.chain = Some(Timer {
            due: now + delay,
            seq,
            what: step,
        });
    }

    pub fn schedule_settle(&mut self, now: Duration, delay: Duration) {
        let seq = self.next_seq();
        self.settle = Some(Timer {
            due: now + delay,
            seq,
            what: (),
        });
    }

    /// Queue a commit; a newer commit supersedes an unapplied older one
    pub fn queue_commit(&mut self, commit: PendingCommit) {
        self.commit = Some(commit);
    }

    pub fn take_commit(&mut self) -> Option<PendingCommit> {
        self.commit.take()
    }

    pub fn cancel_settle(&mut self) {
        self.settle = None;
    }

    pub fn cancel_all(&mut self) {
        self.chain = None;
        self.settle = None;
        self.commit = None;
    }

    #[inline]
    pub fn has_chain(&self) -> bool {
        self.chain.is_some()
    }

    #[inline]
    pub fn has_commit(&self) -> bool {
        self.commit.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_none() && self.settle.is_none() && self.commit.is_none()
    }

    /// Earliest timer deadline, ignoring the commit slot
    pub fn next_deadline(&self) -> Option<Duration> {
        self.earliest().map(|(due, _, _)| due)
    }

    fn earliest(&self) -> Option<(Duration, u64, Due)> {
        let chain = self.chain.map(|t| (t.due, t.seq, Due::Chain(t.what)));
        let settle = self.settle.map(|t| (t.due, t.seq, Due::Settle));
        match (chain, settle) {
            (Some(a), Some(b)) => Some(if (b.0, b.1) < (a.0, a.1) { b } else { a }),
            (a, b) => a.or(b),
        }
    }

    /// Remove and return the earliest timer due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, Due)> {
        let (due_at, _, due) = self.earliest().filter(|(due, _, _)| *due <= now)?;
        match due {
            Due::Chain(_) => self.chain = None,
            Due::Settle => self.settle = None,
        }
        Some((due_at, due))
    }
}
