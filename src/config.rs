use crate::error::Error;
use crate::lighting::LightingParams;
use crate::render::{ColorMode, RenderMode};
use crate::timing::{EventTiming, EventType, TimingTable};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// User configuration loaded from the config file.
/// All fields are optional: CLI flags override config, config overrides defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default render mode
    pub render: Option<RenderModeConfig>,
    /// Default color mode
    pub color: Option<ColorModeConfig>,
    /// Target FPS (1-120)
    pub fps: Option<u32>,
    /// RNG seed; random when unset
    pub seed: Option<u64>,
    /// Start with audio muted
    pub mute: Option<bool>,
    /// Color quantization step (0 = off, 4/8/16 = coarser colors for less output)
    pub color_quant: Option<u8>,
    /// Directory holding the sound files
    pub audio_dir: Option<PathBuf>,
    /// Fewest windows kept lit
    pub min_lit: Option<usize>,
    /// Chance a toggle tick flips a window
    pub flip_probability: Option<f64>,
    /// Fade progress per second
    pub fade_rate: Option<f64>,
    /// Per-event overrides, keyed by event name (`[events.ufo]`)
    pub events: HashMap<String, EventConfig>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub enabled: Option<bool>,
    pub min_ms: Option<f64>,
    pub max_ms: Option<f64>,
    pub duration_ms: Option<f64>,
}

/// Render mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderModeConfig {
    HalfBlock,
    Ascii,
}

impl From<RenderModeConfig> for RenderMode {
    fn from(c: RenderModeConfig) -> Self {
        match c {
            RenderModeConfig::HalfBlock => RenderMode::HalfBlock,
            RenderModeConfig::Ascii => RenderMode::Ascii,
        }
    }
}

/// Color mode names for config file (kebab-case friendly)
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorModeConfig {
    Mono,
    Ansi16,
    Ansi256,
    TrueColor,
}

impl From<ColorModeConfig> for ColorMode {
    fn from(c: ColorModeConfig) -> Self {
        match c {
            ColorModeConfig::Mono => ColorMode::Mono,
            ColorModeConfig::Ansi16 => ColorMode::Ansi16,
            ColorModeConfig::Ansi256 => ColorMode::Ansi256,
            ColorModeConfig::TrueColor => ColorMode::TrueColor,
        }
    }
}

impl Config {
    pub fn parse(contents: &str, path: &Path) -> Result<Config, Error> {
        toml::from_str(contents).map_err(|source| Error::Config { path: path.to_path_buf(), source })
    }

    /// Shipped timings with this file's overrides applied.
    pub fn timing_table(&self) -> TimingTable {
        let mut table = TimingTable::default();
        for (name, ov) in &self.events {
            let Some(kind) = EventType::from_name(name) else {
                log::warn!("unknown event [events.{name}] ignored");
                continue;
            };
            for (key, value) in [("min_ms", ov.min_ms), ("max_ms", ov.max_ms), ("duration_ms", ov.duration_ms)] {
                if let Some(v) = value.filter(|v| !v.is_finite()) {
                    log::warn!("[events.{name}] {key} = {v} ignored, keeping the default");
                }
            }
            let base = table.timing(kind);
            table.set(kind, EventTiming::overriding(base, ov.min_ms, ov.max_ms, ov.duration_ms));
            if let Some(enabled) = ov.enabled {
                table.set_enabled(kind, enabled);
            }
        }
        table
    }

    pub fn lighting_params(&self) -> LightingParams {
        let d = LightingParams::default();
        LightingParams::new(
            self.min_lit.unwrap_or(d.min_lit),
            self.flip_probability.unwrap_or(d.flip_probability),
            self.fade_rate.unwrap_or(d.fade_rate),
        )
    }
}

/// Get the config file path: ~/.config/nightfacade/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nightfacade").join("config.toml"))
}

/// Where sounds are looked up when the config names no directory.
pub fn default_audio_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("nightfacade").join("audio"))
        .unwrap_or_else(|| PathBuf::from("audio"))
}

/// Load config from file. Returns default config if file doesn't exist.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let Ok(contents) = std::fs::read_to_string(&path) else {
        log::debug!("no config at {}", path.display());
        return Config::default();
    };
    match Config::parse(&contents, &path) {
        Ok(config) => {
            log::info!("loaded {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("{e}; using defaults");
            Config::default()
        }
    }
}

/// Generate a default config file with all options commented out
pub fn default_config_string() -> String {
    let mut out = String::from(
        r#"# nightfacade configuration
# Use --show-config to see the active config file path.
# CLI flags override these settings.

# Default render mode: half-block, ascii
# render = "half-block"

# Default color mode: mono, ansi16, ansi256, true-color
# color = "true-color"

# Target FPS (1-120)
# fps = 30

# Fixed RNG seed for a reproducible evening (random when unset)
# seed = 42

# Start with audio muted
# mute = false

# Color quantization step (0 = off, 4/8/16 = coarser colors, less output)
# Useful for slow terminals or tmux
# color_quant = 0

# Directory with ambient-city.mp3, police-siren.mp3, helicopter.mp3,
# thunder.mp3 and ufo-whoosh.mp3
# audio_dir = "/path/to/audio"

# Window lighting: fewest lit windows, flip chance per 15 s tick, fade speed
# min_lit = 15
# flip_probability = 0.2
# fade_rate = 2.0

# Rare events. Intervals and durations are in milliseconds.
"#,
    );
    for kind in EventType::ALL {
        let t = kind.default_timing();
        out.push_str(&format!(
            "\n# [events.{}]\n# enabled = true\n# min_ms = {}\n# max_ms = {}\n# duration_ms = {}\n",
            kind.name(),
            t.min_ms,
            t.max_ms,
            t.duration_ms
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Config {
        Config::parse(s, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let c = parse("");
        assert!(c.fps.is_none());
        assert_eq!(c.timing_table(), TimingTable::default());
        assert_eq!(c.lighting_params(), LightingParams::default());
    }

    #[test]
    fn test_event_tables_override_timings() {
        let c = parse(
            r#"
            seed = 7
            min_lit = 10

            [events.ufo]
            min_ms = 1000
            max_ms = 2000

            [events.shooting-star]
            enabled = false
            "#,
        );
        assert_eq!(c.seed, Some(7));
        let t = c.timing_table();
        assert_eq!(t.timing(EventType::Ufo), EventTiming::new(1000.0, 2000.0, 10_000.0));
        assert!(!t.is_enabled(EventType::ShootingStar));
        assert!(t.is_enabled(EventType::Police));
        assert_eq!(c.lighting_params().min_lit, 10);
    }

    #[test]
    fn test_non_finite_timings_keep_defaults() {
        let c = parse(
            r#"
            [events.ufo]
            min_ms = nan
            max_ms = inf

            [events.police]
            duration_ms = inf
            "#,
        );
        let t = c.timing_table();
        assert_eq!(t.timing(EventType::Ufo), EventType::Ufo.default_timing());
        assert_eq!(t.timing(EventType::Police), EventType::Police.default_timing());
        assert!(t.enabled().all(|(_, timing)| (timing.max_ms - timing.min_ms).is_finite()));
    }

    #[test]
    fn test_bad_file_reports_its_path() {
        let err = Config::parse("fps = \"fast\"", Path::new("/tmp/x.toml")).unwrap_err();
        assert!(err.to_string().contains("/tmp/x.toml"));
    }

    #[test]
    fn test_unknown_event_name_is_ignored() {
        let c = parse("[events.zeppelin]\nenabled = false");
        assert_eq!(c.timing_table(), TimingTable::default());
    }

    #[test]
    fn test_default_config_is_valid_toml() {
        let c = parse(&default_config_string());
        assert!(c.events.is_empty());
        assert!(default_config_string().contains("[events.shooting-star]"));
    }
}
