use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{info, warn};

use marquee_core::{AppConfig, HoverMode, Marquee, MarqueeService};

use super::MarqueeArgs;

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub marquee: MarqueeArgs,
    /// Seconds to run before shutting down
    #[arg(long, default_value_t = 5)]
    pub secs: u64,
}

pub async fn run(config: &AppConfig, args: &WatchArgs) -> Result<()> {
    let marquee_config = args.marquee.to_config(&config.marquee);
    let hover_mode = HoverMode::from(&marquee_config);

    let (service, handle, mut hints) = MarqueeService::new(Marquee::new(marquee_config));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(service.run(shutdown_rx));

    handle.measure(args.marquee.widths())?;
    if hover_mode == HoverMode::HoverToStart {
        // Nothing moves until hovered, so hover for the whole run
        handle.pointer_enter()?;
    }

    let started = Instant::now();
    let deadline = tokio::time::sleep(Duration::from_secs(args.secs));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            changed = hints.changed() => {
                if changed.is_err() {
                    warn!("Marquee service stopped early");
                    break;
                }
                let snapshot = hints.borrow_and_update().clone();
                let t_ms = started.elapsed().as_millis();
                println!(
                    "{t_ms:>7}ms  offset {:>7.1}  {:?}{}{}",
                    snapshot.offset,
                    snapshot.phase,
                    if snapshot.transition { "  transition" } else { "" },
                    if snapshot.ellipsis { "  ellipsis" } else { "" },
                );
            }

            _ = &mut deadline => {
                info!(secs = args.secs, "Watch finished");
                break;
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    let marquee = task.await?;
    info!(offset = marquee.offset(), "Marquee service stopped");

    Ok(())
}
