use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Highest accepted frame rate; keeps the tick interval at or above 1ms.
pub const MAX_FRAMES_PER_SECOND: f64 = 1000.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub marquee: MarqueeConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Per-instance marquee configuration.
///
/// Immutable for the duration of one animation cycle. Changing any field other
/// than the text length only takes effect on the next start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarqueeConfig {
    /// Text content to scroll
    #[serde(default)]
    pub text: String,
    /// Scroll by default and freeze while hovered (instead of scrolling only while hovered)
    #[serde(default)]
    pub hover_to_stop: bool,
    /// Repeat the cycle after reaching the end
    #[serde(default, rename = "loop")]
    pub looping: bool,
    /// Delay before the first tick of a fresh cycle
    #[serde(default)]
    pub leading_ms: u64,
    /// Pause held at the fully scrolled position before looping
    #[serde(default)]
    pub trailing_ms: u64,
    /// Pause after the loop reset before stepping resumes
    #[serde(default)]
    pub loop_delay_ms: u64,
    /// Tick rate; tick interval is 1000/fps ms
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: f64,
    /// Pixels (cells) advanced per tick
    #[serde(default = "default_step")]
    pub step: f64,
    /// Expose the full text as a hover title
    #[serde(default)]
    pub tooltip: bool,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            text: String::new(),
            hover_to_stop: false,
            looping: false,
            leading_ms: 0,
            trailing_ms: 0,
            loop_delay_ms: 0,
            frames_per_second: default_frames_per_second(),
            step: default_step(),
            tooltip: false,
        }
    }
}

impl MarqueeConfig {
    /// Create a config for `text` with every other field at its default
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Replace malformed cadence values with safe positive defaults.
    ///
    /// A zero or negative tick interval would turn the clock into a runaway
    /// synchronous loop, so this runs on every config the engine accepts.
    pub fn sanitized(mut self) -> Self {
        if !(self.frames_per_second.is_finite() && self.frames_per_second > 0.0) {
            warn!(
                fps = self.frames_per_second,
                "Invalid frames_per_second, falling back to {}",
                default_frames_per_second()
            );
            self.frames_per_second = default_frames_per_second();
        } else if self.frames_per_second > MAX_FRAMES_PER_SECOND {
            warn!(fps = self.frames_per_second, "frames_per_second too high, clamping");
            self.frames_per_second = MAX_FRAMES_PER_SECOND;
        }

        if !(self.step.is_finite() && self.step > 0.0) {
            warn!(step = self.step, "Invalid step, falling back to {}", default_step());
            self.step = default_step();
        }

        self
    }

    /// Interval between two ticks
    pub fn tick_interval(&self) -> Duration {
        let fps = if self.frames_per_second.is_finite() && self.frames_per_second > 0.0 {
            self.frames_per_second.min(MAX_FRAMES_PER_SECOND)
        } else {
            default_frames_per_second()
        };
        Duration::from_nanos((1_000_000_000.0 / fps).round() as u64)
    }

    #[inline]
    pub fn leading(&self) -> Duration {
        Duration::from_millis(self.leading_ms)
    }

    #[inline]
    pub fn trailing(&self) -> Duration {
        Duration::from_millis(self.trailing_ms)
    }

    #[inline]
    pub fn loop_delay(&self) -> Duration {
        Duration::from_millis(self.loop_delay_ms)
    }

    /// Length of the text in characters, the identity used to detect content changes
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Maximum event poll timeout in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Width of the headline column in cells
    #[serde(default = "default_column_width")]
    pub column_width: u16,
    /// Texts shown by the demo, one marquee each
    #[serde(default = "default_headlines")]
    pub headlines: Vec<String>,
    /// Color overrides, hex strings such as "#d8a657"
    #[serde(default)]
    pub colors: ThemeColorOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            column_width: default_column_width(),
            headlines: default_headlines(),
            colors: ThemeColorOverrides::default(),
        }
    }
}

/// Optional color overrides for the terminal host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    pub bg: Option<String>,
    pub fg: Option<String>,
    pub dim: Option<String>,
    pub accent: Option<String>,
    pub highlight: Option<String>,
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-j>" (Ctrl+j), "<S-g>" (Shift+g), "<CR>" (Enter), "<Esc>", "<Tab>", "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    /// Quit the application
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Move the keyboard pointer to the next row
    #[serde(default = "default_key_move_down")]
    pub move_down: String,
    /// Move the keyboard pointer to the previous row
    #[serde(default = "default_key_move_up")]
    pub move_up: String,
    /// Move the keyboard pointer off every row
    #[serde(default = "default_key_leave")]
    pub leave: String,
    /// Toggle looping on every marquee
    #[serde(default = "default_key_toggle_loop")]
    pub toggle_loop: String,
    /// Toggle between hover-to-start and hover-to-stop
    #[serde(default = "default_key_toggle_hover_mode")]
    pub toggle_hover_mode: String,
    /// Toggle the tooltip
    #[serde(default = "default_key_toggle_tooltip")]
    pub toggle_tooltip: String,
    /// Reset every marquee to its first frame
    #[serde(default = "default_key_restart")]
    pub restart: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            move_down: default_key_move_down(),
            move_up: default_key_move_up(),
            leave: default_key_leave(),
            toggle_loop: default_key_toggle_loop(),
            toggle_hover_mode: default_key_toggle_hover_mode(),
            toggle_tooltip: default_key_toggle_tooltip(),
            restart: default_key_restart(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_move_down() -> String { "j".to_string() }
fn default_key_move_up() -> String { "k".to_string() }
fn default_key_leave() -> String { "<Esc>".to_string() }
fn default_key_toggle_loop() -> String { "l".to_string() }
fn default_key_toggle_hover_mode() -> String { "h".to_string() }
fn default_key_toggle_tooltip() -> String { "t".to_string() }
fn default_key_restart() -> String { "r".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("marquee")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frames_per_second() -> f64 {
    60.0
}

fn default_step() -> f64 {
    1.0
}

fn default_tick_rate() -> u64 {
    50
}

fn default_column_width() -> u16 {
    36
}

fn default_headlines() -> Vec<String> {
    vec![
        "Short headline".to_string(),
        "A considerably longer headline that will not fit inside the column".to_string(),
        "Rust 2024 edition stabilizes async closures and a handful of lints".to_string(),
        "Hover a row to scroll it, or press h to flip the hover mode".to_string(),
    ]
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.marquee = config.marquee.sanitized();
        Ok(config)
    }

    /// Render configuration as pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/marquee/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("marquee")
            .join("config.toml")
    }

    /// Get the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marquee_config() {
        let config = MarqueeConfig::default();
        assert!(!config.hover_to_stop);
        assert!(!config.looping);
        assert_eq!(config.frames_per_second, 60.0);
        assert_eq!(config.step, 1.0);
        assert_eq!(config.leading(), Duration::ZERO);
    }

    #[test]
    fn test_tick_interval() {
        let config = MarqueeConfig {
            frames_per_second: 50.0,
            ..Default::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(20));
    }

    #[test]
    fn test_sanitize_rejects_non_positive_cadence() {
        let config = MarqueeConfig {
            frames_per_second: 0.0,
            step: -3.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.frames_per_second, 60.0);
        assert_eq!(config.step, 1.0);

        let config = MarqueeConfig {
            frames_per_second: f64::NAN,
            step: f64::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.frames_per_second, 60.0);
        assert_eq!(config.step, 1.0);
    }

    #[test]
    fn test_tick_interval_never_below_one_millisecond() {
        let config = MarqueeConfig {
            frames_per_second: 1_000_000.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_parse_marquee_section() {
        let config = AppConfig::from_toml(
            r#"
            [marquee]
            text = "hello"
            loop = true
            trailing_ms = 500
            frames_per_second = -1
            "#,
        )
        .unwrap();
        assert!(config.marquee.looping);
        assert_eq!(config.marquee.trailing(), Duration::from_millis(500));
        assert_eq!(config.marquee.frames_per_second, 60.0);
        assert_eq!(config.ui.column_width, 36);
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[marquee\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_text_len_counts_chars() {
        assert_eq!(MarqueeConfig::with_text("héllo").text_len(), 5);
    }
}
