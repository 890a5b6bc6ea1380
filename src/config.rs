use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::notification::Durations;
use crate::provider::{Error, ErrorKind, Platform, Result};

const CONFIG_PATH_ENV_VAR: &str = "MAGPIE_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let config_env: Option<PathBuf> = env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from);

    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "Unable to find home directory")
    })?;

    let home_config = PathBuf::from_iter([&home, &PathBuf::from(".magpie.toml")].iter());

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from_iter([dir, "magpie".to_string(), "config.toml".to_string()].iter())
    } else {
        let base = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
        PathBuf::from_iter([base.as_path(), Path::new("magpie"), Path::new("config.toml")].iter())
    };

    let mut locations = vec![config_xdg, home_config];

    if let Some(path) = config_env {
        locations.insert(0, path);
    }

    Ok(locations)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationBackend {
    Toast,
    Desktop,
    Log,
}

impl Default for NotificationBackend {
    fn default() -> Self {
        NotificationBackend::Toast
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    tick_rate_ms: u64,
    pub schedule_file: Option<PathBuf>,
    pub sample_data: bool,
    pub notification_backend: NotificationBackend,
    pub default_platform: Platform,
    pub durations: Durations,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate_ms: 500,
            schedule_file: None,
            sample_data: true,
            notification_backend: NotificationBackend::default(),
            default_platform: Platform::default(),
            durations: Durations::default(),
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(content: &str) -> Result<Config> {
        let mut config: Config = toml::from_str(content)
            .map_err(|e| Error::new(ErrorKind::ConfigParse, &e.to_string()))?;

        if config.tick_rate_ms == 0 {
            return Err(Error::new(ErrorKind::ConfigParse, "tick_rate_ms must be positive"));
        }

        if let Some(path) = config.schedule_file.take() {
            config.schedule_file = Some(expand_home(path));
        }

        Ok(config)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Config::from_str(&content).map_err(|e| {
            let msg = format!("{}: {}", path.display(), e.message.as_deref().unwrap_or(""));
            e.with_msg(&msg)
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

fn expand_home(path: PathBuf) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}

/// Loads `path` if given, otherwise the first existing default location, or the
/// built-in defaults if there is none.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    let locations = find_configfile_locations().unwrap_or_else(|e| {
        log::warn!("{}", e);
        Vec::new()
    });

    match locations.iter().find(|p| p.is_file()) {
        Some(found) => {
            log::info!("Using config file '{}'", found.display());
            Config::load(found)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
