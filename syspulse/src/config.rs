//! Static client configuration: defaults, optional JSON file, then CLI/env overrides.
//! The file lives under the XDG config dir: $XDG_CONFIG_HOME/syspulse/config.json
//! (fallback ~/.config/syspulse/config.json).

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::history::DEFAULT_MAX_DATA_POINTS;

pub const DEFAULT_WS_URL: &str = "ws://localhost:8000/ws/metrics";
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub ws_url: String,
    pub max_data_points: usize,
    pub reconnect_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WS_URL.to_string(),
            max_data_points: DEFAULT_MAX_DATA_POINTS,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }
}

/// A partial configuration. Used both for the file on disk and for overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_data_points: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reconnect_delay_ms: Option<u64>,
}

impl Config {
    pub fn apply(&mut self, layer: &ConfigLayer) {
        if let Some(u) = &layer.ws_url {
            self.ws_url = u.clone();
        }
        if let Some(n) = layer.max_data_points {
            self.max_data_points = n;
        }
        if let Some(ms) = layer.reconnect_delay_ms {
            self.reconnect_delay = Duration::from_millis(ms);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.ws_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.ws_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ConfigError::InvalidUrl {
                url: self.ws_url.clone(),
                reason: format!("scheme must be ws or wss, got {}", url.scheme()),
            });
        }
        if self.max_data_points == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.reconnect_delay.is_zero() {
            return Err(ConfigError::ZeroReconnectDelay);
        }
        Ok(())
    }

    /// Merge layers in order (later wins) over the defaults, then validate.
    pub fn resolve<'a, I>(layers: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a ConfigLayer>,
    {
        let mut cfg = Config::default();
        for layer in layers {
            cfg.apply(layer);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("syspulse")
    } else {
        dirs_next::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("syspulse")
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Read a config file. A missing file is not an error.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&s)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.ws_url, "ws://localhost:8000/ws/metrics");
        assert_eq!(cfg.max_data_points, 60);
        assert_eq!(cfg.reconnect_delay, Duration::from_millis(3000));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn later_layers_win() {
        let file = ConfigLayer {
            ws_url: Some("ws://file:1/ws".into()),
            max_data_points: Some(10),
            reconnect_delay_ms: None,
        };
        let cli = ConfigLayer {
            max_data_points: Some(20),
            ..Default::default()
        };
        let cfg = Config::resolve([&file, &cli]).unwrap();
        assert_eq!(cfg.ws_url, "ws://file:1/ws");
        assert_eq!(cfg.max_data_points, 20);
        assert_eq!(cfg.reconnect_delay, DEFAULT_RECONNECT_DELAY);
    }

    #[test]
    fn rejects_bad_values() {
        let zero_points = ConfigLayer {
            max_data_points: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve([&zero_points]),
            Err(ConfigError::ZeroCapacity)
        ));
        let zero_delay = ConfigLayer {
            reconnect_delay_ms: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve([&zero_delay]),
            Err(ConfigError::ZeroReconnectDelay)
        ));
        let http = ConfigLayer {
            ws_url: Some("http://host/ws".into()),
            ..Default::default()
        };
        assert!(matches!(
            Config::resolve([&http]),
            Err(ConfigError::InvalidUrl { .. })
        ));
        let junk = ConfigLayer {
            ws_url: Some("not a url".into()),
            ..Default::default()
        };
        assert!(Config::resolve([&junk]).is_err());
    }

    #[test]
    fn config_file_round_trip() {
        let td = tempfile::tempdir().unwrap();
        let path = td.path().join("config.json");
        assert_eq!(load_config_file(&path).unwrap(), None);

        fs::write(&path, r#"{"ws_url":"wss://box/ws","reconnect_delay_ms":250}"#).unwrap();
        let layer = load_config_file(&path).unwrap().unwrap();
        assert_eq!(layer.reconnect_delay_ms, Some(250));
        assert_eq!(layer.max_data_points, None);

        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
