// Copyright 2023 Remi Bernotavicius

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Settings read from `config.toml`. Every key is optional.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server_url: Option<String>,
    /// A `name=value` cookie identifying an existing session, e.g. `token=...`.
    pub session_cookie: Option<String>,
    pub log_level: Option<log::LevelFilter>,
}

impl Config {
    pub fn parse(contents: &str) -> crate::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads the file at `path`. A missing file is the same as an empty one.
    pub fn load(path: &Path) -> crate::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config file at {}", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.unwrap_or(log::LevelFilter::Info)
    }
}

/// This is where the configuration lives on-disk. On Linux it should be like:
/// `~/.config/food_catalog/config.toml`
pub fn config_path() -> crate::Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    Ok(dirs.config_dir().join("food_catalog").join("config.toml"))
}

#[test]
fn parse_full_config() {
    let config = Config::parse(
        r#"
        server_url = "https://food.example.com"
        session_cookie = "token=abc123"
        log_level = "debug"
        "#,
    )
    .unwrap();
    assert_eq!(config.server_url(), "https://food.example.com");
    assert_eq!(config.session_cookie.as_deref(), Some("token=abc123"));
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
}

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
    assert_eq!(config.log_level(), log::LevelFilter::Info);

    assert!(Config::parse("port = 80").is_err());
}

#[test]
fn missing_file_is_empty_config() {
    let path = std::env::temp_dir().join("food_catalog_missing_config.toml");
    let _ = std::fs::remove_file(&path);
    assert_eq!(Config::load(&path).unwrap(), Config::default());
}
