/*!
Application configuration.

Values are layered with figment: built-in defaults, then an optional TOML file
(`connectflow.toml` or the path in `CONNECTFLOW_CONFIG`), then `CONNECTFLOW_*`
environment variables.
*/

use std::{
    ops::RangeInclusive,
    path::{Path, PathBuf},
    time::Duration,
};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topology::TopologySettings;

pub const DEFAULT_CONFIG_FILE: &str = "connectflow.toml";
pub const CONFIG_PATH_ENV: &str = "CONNECTFLOW_CONFIG";
pub const ENV_PREFIX: &str = "CONNECTFLOW_";

/// Router counts offered by the UI.
pub const ROUTER_RANGE: RangeInclusive<usize> = 5..=20;
/// Extra link counts offered by the UI.
pub const EXTRA_LINK_RANGE: RangeInclusive<usize> = 0..=10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
    #[error("{key} = {value} is outside of {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error("invalid frame_delay {0:?}: {1}")]
    FrameDelay(String, humantime::DurationError),
    #[error("frame_delay must be greater than zero")]
    ZeroFrameDelay,
    #[error("frame size must be non-zero, got {0}x{1}")]
    FrameSize(u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Router count of the first generated topology.
    pub routers: usize,
    /// Extra links of the first generated topology.
    pub extra_links: usize,
    /// Seed of the spring layout. Kept fixed so redraws of a topology look the same.
    pub layout_seed: u64,
    /// Pause between animation frames, in humantime notation (`500ms`, `1s`).
    pub frame_delay: String,
    pub export_dir: PathBuf,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            routers: 10,
            extra_links: 4,
            layout_seed: 42,
            frame_delay: "500ms".to_string(),
            export_dir: PathBuf::from("frames"),
            frame_width: 800,
            frame_height: 600,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(&path)
    }

    /// Loads the configuration using `path` as the TOML layer. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("routers", self.routers, &ROUTER_RANGE)?;
        check_range("extra_links", self.extra_links, &EXTRA_LINK_RANGE)?;
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(ConfigError::FrameSize(self.frame_width, self.frame_height));
        }
        self.frame_delay().map(|_| ())
    }

    pub fn frame_delay(&self) -> Result<Duration, ConfigError> {
        let delay = humantime::parse_duration(&self.frame_delay)
            .map_err(|e| ConfigError::FrameDelay(self.frame_delay.clone(), e))?;
        if delay.is_zero() {
            return Err(ConfigError::ZeroFrameDelay);
        }
        Ok(delay)
    }

    pub fn topology_settings(&self) -> TopologySettings {
        TopologySettings {
            routers: self.routers,
            extra_links: self.extra_links,
        }
    }
}

fn check_range(
    key: &'static str,
    value: usize,
    range: &RangeInclusive<usize>,
) -> Result<(), ConfigError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.frame_delay().unwrap(), Duration::from_millis(500));
        assert_eq!(
            config.topology_settings(),
            TopologySettings {
                routers: 10,
                extra_links: 4
            }
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config = AppConfig::load_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layers() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                    routers = 14
                    extra_links = 2
                    frame_delay = "250ms"
                "#,
            )?;
            jail.set_env("CONNECTFLOW_EXTRA_LINKS", 7);

            let config =
                AppConfig::load_from(Path::new(DEFAULT_CONFIG_FILE)).map_err(|e| e.to_string())?;
            assert_eq!(config.routers, 14);
            assert_eq!(config.extra_links, 7);
            assert_eq!(
                config.frame_delay().map_err(|e| e.to_string())?,
                Duration::from_millis(250)
            );
            assert_eq!(config.layout_seed, 42);
            Ok(())
        });
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let config = AppConfig {
            routers: 30,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { key: "routers", value: 30, .. })
        ));

        let config = AppConfig {
            extra_links: 11,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange { key: "extra_links", .. })
        ));
    }

    #[test]
    fn test_bad_frame_delay_is_rejected() {
        let config = AppConfig {
            frame_delay: "soon".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FrameDelay(..))));

        let config = AppConfig {
            frame_delay: "0s".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroFrameDelay)));
    }
}
