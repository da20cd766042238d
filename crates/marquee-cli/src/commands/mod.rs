pub mod config;
pub mod run;
pub mod simulate;
pub mod watch;

use clap::Args;

use marquee_core::{MarqueeConfig, Widths};

pub use simulate::SimulateArgs;
pub use watch::WatchArgs;

/// Marquee options shared by `simulate` and `watch`; unset flags keep the config file value
#[derive(Args, Debug, Clone)]
pub struct MarqueeArgs {
    /// Content width in cells
    #[arg(long)]
    pub content: f64,
    /// Container width in cells
    #[arg(long)]
    pub container: f64,
    /// Text to carry (only used for the tooltip)
    #[arg(long)]
    pub text: Option<String>,
    /// Loop after reaching the end
    #[arg(long = "loop")]
    pub looping: bool,
    /// Scroll by default and freeze while hovered
    #[arg(long)]
    pub hover_to_stop: bool,
    #[arg(long)]
    pub leading_ms: Option<u64>,
    #[arg(long)]
    pub trailing_ms: Option<u64>,
    #[arg(long)]
    pub loop_delay_ms: Option<u64>,
    /// Ticks per second
    #[arg(long)]
    pub fps: Option<f64>,
    /// Cells advanced per tick
    #[arg(long)]
    pub step: Option<f64>,
    /// Expose the text as a tooltip
    #[arg(long)]
    pub tooltip: bool,
}

impl MarqueeArgs {
    /// Layer the flags over the `[marquee]` section of the config file
    pub fn to_config(&self, base: &MarqueeConfig) -> MarqueeConfig {
        let mut config = base.clone();
        if let Some(text) = &self.text {
            config.text = text.clone();
        }
        config.looping |= self.looping;
        config.hover_to_stop |= self.hover_to_stop;
        config.tooltip |= self.tooltip;
        if let Some(ms) = self.leading_ms {
            config.leading_ms = ms;
        }
        if let Some(ms) = self.trailing_ms {
            config.trailing_ms = ms;
        }
        if let Some(ms) = self.loop_delay_ms {
            config.loop_delay_ms = ms;
        }
        if let Some(fps) = self.fps {
            config.frames_per_second = fps;
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        config.sanitized()
    }

    pub fn widths(&self) -> Widths {
        Widths::new(self.container, self.content)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        marquee: MarqueeArgs,
    }

    #[test]
    fn test_flags_override_config() {
        let cli = TestCli::parse_from([
            "marquee",
            "--content",
            "200",
            "--container",
            "100",
            "--loop",
            "--fps",
            "50",
            "--trailing-ms",
            "300",
        ]);
        let base = MarqueeConfig {
            leading_ms: 250,
            ..Default::default()
        };

        let config = cli.marquee.to_config(&base);
        assert!(config.looping);
        assert_eq!(config.frames_per_second, 50.0);
        assert_eq!(config.trailing_ms, 300);
        assert_eq!(config.leading_ms, 250);
        assert_eq!(cli.marquee.widths().overflow(), 100.0);
    }

    #[test]
    fn test_invalid_fps_is_sanitized() {
        let cli = TestCli::parse_from(["marquee", "--content", "10", "--container", "5", "--fps", "0"]);
        let config = cli.marquee.to_config(&MarqueeConfig::default());
        assert_eq!(config.frames_per_second, 60.0);
    }
}
