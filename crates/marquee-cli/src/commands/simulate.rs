use std::time::Duration;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use marquee_core::{AppConfig, HintsSnapshot, HoverMode, Marquee, MarqueeConfig, Widths};

use super::MarqueeArgs;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub marquee: MarqueeArgs,
    /// Virtual milliseconds to simulate
    #[arg(long, default_value_t = 2000)]
    pub ms: u64,
    /// Pointer enters at this time (hover-to-start defaults to 0)
    #[arg(long)]
    pub enter_at: Option<u64>,
    /// Pointer leaves at this time
    #[arg(long)]
    pub leave_at: Option<u64>,
    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Leave,
}

/// One published change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceEntry {
    pub t_ms: f64,
    #[serde(flatten)]
    pub hints: HintsSnapshot,
}

pub fn run(config: &AppConfig, args: &SimulateArgs) -> Result<()> {
    let marquee_config = args.marquee.to_config(&config.marquee);

    let mut events = Vec::new();
    let enter_at = match (args.enter_at, HoverMode::from(&marquee_config)) {
        (Some(ms), _) => Some(ms),
        (None, HoverMode::HoverToStart) => Some(0),
        (None, HoverMode::HoverToStop) => None,
    };
    if let Some(ms) = enter_at {
        events.push((Duration::from_millis(ms), PointerEvent::Enter));
    }
    if let Some(ms) = args.leave_at {
        events.push((Duration::from_millis(ms), PointerEvent::Leave));
    }

    info!(
        overflow = args.marquee.widths().overflow(),
        ms = args.ms,
        "Simulating marquee"
    );

    let entries = trace(
        marquee_config,
        args.marquee.widths(),
        events,
        Duration::from_millis(args.ms),
    );

    for entry in &entries {
        if args.json {
            println!("{}", serde_json::to_string(entry)?);
        } else {
            print_entry(entry);
        }
    }

    Ok(())
}

fn print_entry(entry: &TraceEntry) {
    let hints = &entry.hints;
    let mut flags = Vec::new();
    if hints.transition {
        flags.push("transition");
    }
    if hints.ellipsis {
        flags.push("ellipsis");
    }
    if hints.interactive {
        flags.push("interactive");
    }
    println!(
        "{:>9.3}ms  offset {:>7.1}  {:<14}  {}",
        entry.t_ms,
        hints.offset,
        format!("{:?}", hints.phase),
        flags.join(" ")
    );
}

/// Drive one marquee through virtual time up to `until`, recording every
/// change to its render hints.
///
/// Timers due at the same instant as a pointer event fire first.
pub fn trace(
    config: MarqueeConfig,
    widths: Widths,
    mut events: Vec<(Duration, PointerEvent)>,
    until: Duration,
) -> Vec<TraceEntry> {
    events.sort_by_key(|(at, _)| *at);
    let mut events = events.into_iter().peekable();

    let mut marquee = Marquee::new(config);
    marquee.apply_widths(widths);

    let mut entries = Vec::new();
    record(&marquee, &mut entries);

    loop {
        let next_event = events.peek().map(|(at, _)| *at);
        let target = [marquee.next_deadline(), next_event]
            .into_iter()
            .flatten()
            .min();

        let Some(target) = target.filter(|t| *t <= until) else {
            marquee.advance_to(until);
            record(&marquee, &mut entries);
            break;
        };

        marquee.advance_to(target);
        record(&marquee, &mut entries);

        while let Some((_, event)) = events.next_if(|(at, _)| *at <= target) {
            debug!(?event, at_ms = target.as_millis(), "Pointer event");
            match event {
                PointerEvent::Enter => marquee.pointer_enter(),
                PointerEvent::Leave => marquee.pointer_leave(),
            }
            marquee.commit_frame();
            record(&marquee, &mut entries);
        }
    }

    marquee.teardown();
    entries
}

fn record(marquee: &Marquee, entries: &mut Vec<TraceEntry>) {
    let hints = marquee.snapshot();
    if entries.last().is_some_and(|last| last.hints == hints) {
        return;
    }
    entries.push(TraceEntry {
        t_ms: marquee.now().as_nanos() as f64 / 1_000_000.0,
        hints,
    });
}
