//! Settings for the demonstration binary, read with the `config` crate from an
//! optional `adornment.toml` (or `.json`, `.yaml`, ...) next to the working
//! directory and from `ADORNMENT_*` environment variables, in that order.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::Result;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Text,
    Json,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub query_predicate: String,
    pub query_pattern: String,
    pub deduplicate: bool,
    pub log_filter: String,
    pub format: Format,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_file("adornment")
    }
    pub fn from_file(name: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("query_predicate", "Q")?
            .set_default("query_pattern", "f")?
            .set_default("deduplicate", false)?
            .set_default("log_filter", "warn")?
            .set_default("format", "text")?
            .add_source(File::with_name(name).required(false))
            .add_source(Environment::with_prefix("ADORNMENT").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
