//! Tokio host for a single marquee.
//!
//! The service owns the [`Marquee`], maps tokio time onto its virtual clock,
//! sleeps until the next pending deadline and publishes a [`HintsSnapshot`]
//! whenever the visible state changes.

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::config::MarqueeConfig;
use crate::hints::HintsSnapshot;
use crate::layout::Widths;
use crate::machine::Marquee;
use crate::{Error, Result};

/// Commands accepted by a running service
#[derive(Debug, Clone)]
pub enum MarqueeCommand {
    Start,
    Stop,
    Reset,
    PointerEnter,
    PointerLeave,
    /// Host sampled new widths
    Measure(Widths),
    Reconfigure(MarqueeConfig),
}

/// Cloneable sender side of a [`MarqueeService`]
#[derive(Debug, Clone)]
pub struct MarqueeHandle {
    tx: mpsc::UnboundedSender<MarqueeCommand>,
}

impl MarqueeHandle {
    pub fn send(&self, command: MarqueeCommand) -> Result<()> {
        self.tx.send(command).map_err(|_| Error::ServiceClosed)
    }

    pub fn start(&self) -> Result<()> {
        self.send(MarqueeCommand::Start)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(MarqueeCommand::Stop)
    }

    pub fn pointer_enter(&self) -> Result<()> {
        self.send(MarqueeCommand::PointerEnter)
    }

    pub fn pointer_leave(&self) -> Result<()> {
        self.send(MarqueeCommand::PointerLeave)
    }

    pub fn measure(&self, widths: Widths) -> Result<()> {
        self.send(MarqueeCommand::Measure(widths))
    }

    pub fn reconfigure(&self, config: MarqueeConfig) -> Result<()> {
        self.send(MarqueeCommand::Reconfigure(config))
    }
}

pub struct MarqueeService {
    marquee: Marquee,
    commands: mpsc::UnboundedReceiver<MarqueeCommand>,
    hints_tx: watch::Sender<HintsSnapshot>,
}

impl MarqueeService {
    /// Create a service plus its command handle and hints receiver
    pub fn new(marquee: Marquee) -> (Self, MarqueeHandle, watch::Receiver<HintsSnapshot>) {
        let (tx, commands) = mpsc::unbounded_channel();
        let (hints_tx, hints_rx) = watch::channel(marquee.snapshot());
        let service = Self {
            marquee,
            commands,
            hints_tx,
        };
        (service, MarqueeHandle { tx }, hints_rx)
    }

    fn apply(&mut self, command: MarqueeCommand) {
        debug!(?command, "Marquee command");
        match command {
            MarqueeCommand::Start => self.marquee.start(),
            MarqueeCommand::Stop => self.marquee.stop(),
            MarqueeCommand::Reset => self.marquee.reset(),
            MarqueeCommand::PointerEnter => self.marquee.pointer_enter(),
            MarqueeCommand::PointerLeave => self.marquee.pointer_leave(),
            MarqueeCommand::Measure(widths) => {
                self.marquee.apply_widths(widths);
            }
            MarqueeCommand::Reconfigure(config) => self.marquee.reconfigure(config),
        }
    }

    fn publish(&self) {
        let snapshot = self.marquee.snapshot();
        self.hints_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    /// Run until shutdown is signalled or every handle is dropped.
    ///
    /// Returns the torn-down marquee.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Marquee {
        let epoch = Instant::now();
        info!("Marquee service started");

        loop {
            let deadline = self.marquee.next_deadline().map(|d| epoch + d);

            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Marquee service received shutdown signal");
                        break;
                    }
                }

                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("All marquee handles dropped");
                        break;
                    };
                    self.marquee.advance_to(epoch.elapsed());
                    self.apply(command);
                }

                _ = sleep_until_deadline(deadline) => {
                    self.marquee.advance_to(epoch.elapsed());
                }
            }

            // Frame boundary: anything queued by this iteration lands now
            self.marquee.commit_frame();
            self.publish();
        }

        self.marquee.teardown();
        self.publish();
        self.marquee
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
