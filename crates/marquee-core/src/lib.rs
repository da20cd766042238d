//! Scrolling-text ("marquee") animation engine.
//!
//! # Layers
//!
//! - `layout` - overflow sampling through a host-provided [`LayoutOracle`]
//! - `clock` - the tick chain and the [`DelayPolicy`] applied at cycle boundaries
//! - `interaction` - hover-to-start and hover-to-stop pointer handling
//! - `machine` - the [`Marquee`] aggregate and its virtual-time scheduler
//! - `hints` - [`RenderHints`] derived for the renderer
//! - `service` - a tokio task hosting one marquee
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use marquee_core::{Marquee, MarqueeConfig, Widths};
//!
//! let mut marquee = Marquee::new(MarqueeConfig::with_text("a long headline"));
//! marquee.apply_widths(Widths::new(80.0, 200.0));
//! marquee.pointer_enter();
//!
//! // In the host loop
//! marquee.advance(Duration::from_millis(16));
//! let hints = marquee.render_hints();
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod hints;
pub mod interaction;
pub mod layout;
pub mod machine;
mod pending;
pub mod service;

pub use clock::{ConfiguredDelays, DelayPolicy};
pub use config::{AppConfig, KeymapConfig, MarqueeConfig, UiConfig};
pub use error::{Error, Result};
pub use hints::{HintsSnapshot, RenderHints};
pub use interaction::{HoverMode, SETTLE_DURATION};
pub use layout::{LayoutOracle, Widths};
pub use machine::{Marquee, Phase};
pub use service::{MarqueeCommand, MarqueeHandle, MarqueeService};
