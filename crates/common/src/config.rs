use anyhow::Result;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub gateway: Gateway,
    pub reader: Reader,
    pub observability: Observability,
    pub web: Option<Web>,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: String,
}

/// Read-gateway endpoint and the factory this deployment reads from.
/// The factory address is fixed here and never changes at runtime.
#[derive(Debug, Deserialize)]
pub struct Gateway {
    pub base_url: String,
    pub factory_address: String,
    pub request_timeout_secs: u64,
}

/// Default roster caps for callers (CLI, web) that don't pass their own.
/// These bound how many distinct addresses a single query may admit; they
/// are a cost control, not a correctness knob.
#[derive(Debug, Deserialize)]
pub struct Reader {
    pub max_authors: usize,
    pub max_participants: usize,
}

#[derive(Debug, Deserialize)]
pub struct Observability {
    pub prometheus_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Web {
    pub port: u16,
    pub host: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let content = std::fs::read_to_string("config/default.toml")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_toml_str(s)
    }
}
