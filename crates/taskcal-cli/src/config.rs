// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use taskcal_app::{FilterSelector, SyncSettings};
use taskcal_client::DEFAULT_CSRF_COOKIE;

pub const APP_NAME: &str = "taskcal";
const CONFIG_VERSION: i64 = 1;
const CONFIG_PATH_ENV: &str = "TASKCAL_CONFIG_PATH";
const COOKIE_ENV: &str = "TASKCAL_COOKIE";
const DEFAULT_BASE_URL: &str = "http://localhost:8000/calendar";
const DEFAULT_TIMEOUT: &str = "5s";
const DEFAULT_REFRESH_DELAY: &str = "300ms";
const DEFAULT_DAY_REFRESH_DELAY: &str = "500ms";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub sync: SyncOptions,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            backend: Backend::default(),
            sync: SyncOptions::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
    pub base_url: Option<String>,
    pub timeout: Option<String>,
    pub cookie: Option<String>,
    pub csrf_cookie: Option<String>,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            cookie: None,
            csrf_cookie: Some(DEFAULT_CSRF_COOKIE.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncOptions {
    pub refresh_delay: Option<String>,
    pub day_refresh_delay: Option<String>,
    pub default_filter: Option<String>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            refresh_delay: Some(DEFAULT_REFRESH_DELAY.to_owned()),
            day_refresh_delay: Some(DEFAULT_DAY_REFRESH_DELAY.to_owned()),
            default_filter: Some(FilterSelector::All.as_str().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set {CONFIG_PATH_ENV} to the config file")
        })?;

        let app_dir = config_root.join(APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version. Add `version = 1` at the top and keep values under [backend], [sync], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let base_url = self.base_url();
        if base_url.is_empty() {
            bail!("backend.base_url in {} must not be empty", path.display());
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!(
                "backend.base_url in {} must start with http:// or https://, got {:?}",
                path.display(),
                base_url
            );
        }

        if let Some(timeout) = &self.backend.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "backend.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(name) = &self.backend.csrf_cookie
            && name.trim().is_empty()
        {
            bail!(
                "backend.csrf_cookie in {} must not be empty; the usual value is {:?}",
                path.display(),
                DEFAULT_CSRF_COOKIE
            );
        }

        for (key, value) in [
            ("sync.refresh_delay", &self.sync.refresh_delay),
            ("sync.day_refresh_delay", &self.sync.day_refresh_delay),
        ] {
            if let Some(value) = value {
                parse_duration(value).with_context(|| format!("{key} in {}", path.display()))?;
            }
        }

        if let Some(filter) = &self.sync.default_filter
            && FilterSelector::parse(filter).is_none()
        {
            bail!(
                "sync.default_filter in {} must be one of {}, got {:?}",
                path.display(),
                filter_names(),
                filter
            );
        }

        if let Some(level) = &self.log.level
            && level.trim().is_empty()
        {
            bail!(
                "log.level in {} must not be empty; use a level such as \"warn\" or \"debug\"",
                path.display()
            );
        }

        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.backend
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim()
            .trim_end_matches('/')
    }

    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(self.backend.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    /// The config value wins over `TASKCAL_COOKIE`.
    pub fn cookie(&self) -> Option<String> {
        self.backend
            .cookie
            .clone()
            .or_else(|| env::var(COOKIE_ENV).ok())
            .filter(|cookie| !cookie.trim().is_empty())
    }

    pub fn csrf_cookie(&self) -> &str {
        self.backend
            .csrf_cookie
            .as_deref()
            .unwrap_or(DEFAULT_CSRF_COOKIE)
    }

    pub fn sync_settings(&self) -> Result<SyncSettings> {
        Ok(SyncSettings {
            refresh_delay: parse_duration(
                self.sync
                    .refresh_delay
                    .as_deref()
                    .unwrap_or(DEFAULT_REFRESH_DELAY),
            )?,
            day_refresh_delay: parse_duration(
                self.sync
                    .day_refresh_delay
                    .as_deref()
                    .unwrap_or(DEFAULT_DAY_REFRESH_DELAY),
            )?,
        })
    }

    pub fn default_filter(&self) -> FilterSelector {
        self.sync
            .default_filter
            .as_deref()
            .and_then(FilterSelector::parse)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# taskcal config\n# Place this file at: {}\n\nversion = 1\n\n[backend]\nbase_url = \"{}\"\ntimeout = \"{}\"\n# Raw Cookie header copied from a logged-in browser session.\n# TASKCAL_COOKIE is used when this is unset.\n# cookie = \"sessionid=...; csrftoken=...\"\ncsrf_cookie = \"{}\"\n\n[sync]\nrefresh_delay = \"{}\"\nday_refresh_delay = \"{}\"\n# One of: {}\ndefault_filter = \"all\"\n\n[log]\n# RUST_LOG overrides this.\nlevel = \"{}\"\n",
            path.display(),
            DEFAULT_BASE_URL,
            DEFAULT_TIMEOUT,
            DEFAULT_CSRF_COOKIE,
            DEFAULT_REFRESH_DELAY,
            DEFAULT_DAY_REFRESH_DELAY,
            filter_names(),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn filter_names() -> String {
    FilterSelector::ALL
        .iter()
        .map(|selector| selector.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 300ms or 5s)")
}
