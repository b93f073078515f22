//! Run configuration: API endpoint, input/output documents and the transport
//! base capacity. Defaults first, then environment, then CLI flags.

use crate::error::{EchoError, Result};
use crate::evacuation::TRANSPORT_BASE_CAPACITY;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://swapi.co/api";

pub const INPUT_PLANETS: &str = "swapi_planets-v1p0.json";
pub const OUTPUT_PLANETS: &str = "swapi_planets_uninhabited-v1p1.json";
pub const INPUT_ECHO: &str = "swapi_echo_base-v1p0.json";
pub const OUTPUT_ECHO: &str = "swapi_echo_base-v1p1.json";

#[derive(Debug, Clone, PartialEq)]
pub struct EchoConfig {
    pub endpoint: String,
    pub planets_input: PathBuf,
    pub planets_output: PathBuf,
    pub echo_input: PathBuf,
    pub echo_output: PathBuf,
    pub base_capacity: i64,
}

impl EchoConfig {
    /// Default file names resolved against `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            planets_input: data_dir.join(INPUT_PLANETS),
            planets_output: data_dir.join(OUTPUT_PLANETS),
            echo_input: data_dir.join(INPUT_ECHO),
            echo_output: data_dir.join(OUTPUT_ECHO),
            base_capacity: TRANSPORT_BASE_CAPACITY,
        }
    }

    /// Read `SWAPI_ENDPOINT`, `ECHO_DATA_DIR` and `ECHO_BASE_CAPACITY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("ECHO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = Self::in_dir(&data_dir);

        if let Some(endpoint) = lookup("SWAPI_ENDPOINT") {
            config.endpoint = endpoint;
        }

        if let Some(capacity) = lookup("ECHO_BASE_CAPACITY") {
            config.base_capacity = capacity.trim().parse().map_err(|e| {
                EchoError::Config(format!("ECHO_BASE_CAPACITY '{}' is not an integer: {}", capacity, e))
            })?;
        }

        Ok(config)
    }
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}
