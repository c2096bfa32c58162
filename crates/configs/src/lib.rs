use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const MAX_WORKERS: usize = 1024;

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DriverConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_key_base")]
    pub key_base: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { workers: default_workers(), key_base: default_key_base() }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_workers() -> usize { 5 }
fn default_key_base() -> u64 { 1 }
fn default_log_format() -> String { "compact".to_string() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.driver.normalize_from_env()?;
        self.driver.validate()?;
        self.logging.normalize_from_env();
        self.logging.validate()?;
        Ok(())
    }
}

impl DriverConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var("STORE_WORKERS") {
            self.workers = raw
                .trim()
                .parse()
                .map_err(|e| anyhow!("STORE_WORKERS must be a positive integer: {e}"))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(anyhow!("driver.workers must be in 1..={MAX_WORKERS}"));
        }
        if self.key_base.checked_add(self.workers as u64 - 1).is_none() {
            return Err(anyhow!("driver.key_base too large for {} workers", self.workers));
        }
        Ok(())
    }
}

impl LoggingConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.format = format;
        }
        self.format = self.format.trim().to_lowercase();
        if self.format.is_empty() {
            self.format = default_log_format();
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.format.as_str() {
            "compact" | "json" => Ok(()),
            other => Err(anyhow!("logging.format must be \"compact\" or \"json\", got {other:?}")),
        }
    }
}
