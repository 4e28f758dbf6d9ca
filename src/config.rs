// src/config.rs

use std::{env, path::PathBuf};

use anyhow::Context;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: Option<PathBuf>,    // JSON snapshot; memory-only when unset
    pub catalog_path: Option<PathBuf>, // defaults to the built-in catalog
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match get("PORT") {
            Some(raw) => raw.parse().with_context(|| format!("parse PORT={raw}"))?,
            None => DEFAULT_PORT,
        };
        let path = |key: &str| get(key).filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        Ok(Self {
            port,
            data_path: path("TECHFLOW_DATA_PATH"),
            catalog_path: path("TECHFLOW_CATALOG_PATH"),
        })
    }
}
