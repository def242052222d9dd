//! Persisted UI preference (dark/light theme), stored next to config.json as prefs.json.

use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, path::PathBuf};

use crate::config::config_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    #[serde(default)]
    pub theme: ThemeMode,
}

pub fn prefs_path() -> PathBuf {
    config_dir().join("prefs.json")
}

// Unreadable or corrupt prefs fall back to defaults.
pub fn load_prefs(path: &Path) -> Prefs {
    match fs::read_to_string(path) {
        Ok(s) => serde_json::from_str(&s).unwrap_or_default(),
        Err(_) => Prefs::default(),
    }
}

pub fn save_prefs(path: &Path, p: &Prefs) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(p)?;
    fs::write(path, data)
}
