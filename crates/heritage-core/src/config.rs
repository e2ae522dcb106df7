use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Cadence of the synthetic progress ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Percent added on every tick.
    #[serde(default = "default_step_percent")]
    pub step_percent: f64,
    /// `[playback.site]`: separate cadence for site audio guides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<CadenceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceConfig {
    pub tick_interval_ms: u64,
    pub step_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_carousel_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_auto_advance")]
    pub auto_advance: bool,
}

/// Catalog source.  Without a path the bundled catalog is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// `.toml` or `.json` catalog file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            step_percent: default_step_percent(),
            site: None,
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_carousel_interval_ms(),
            auto_advance: default_auto_advance(),
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl CadenceConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl CarouselConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_step_percent() -> f64 {
    1.0
}

fn default_carousel_interval_ms() -> u64 {
    4000
}

fn default_auto_advance() -> bool {
    true
}

impl Config {
    /// Read `config.toml`, writing the defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.playback.tick_interval_ms > 0,
            "playback.tick_interval_ms must be greater than zero"
        );
        anyhow::ensure!(
            self.playback.step_percent > 0.0 && self.playback.step_percent <= 100.0,
            "playback.step_percent must be in (0, 100], got {}",
            self.playback.step_percent
        );
        if let Some(site) = &self.playback.site {
            anyhow::ensure!(
                site.tick_interval_ms > 0,
                "playback.site.tick_interval_ms must be greater than zero"
            );
            anyhow::ensure!(
                site.step_percent > 0.0 && site.step_percent <= 100.0,
                "playback.site.step_percent must be in (0, 100], got {}",
                site.step_percent
            );
        }
        anyhow::ensure!(
            self.carousel.interval_ms > 0,
            "carousel.interval_ms must be greater than zero"
        );
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
