//! Runtime configuration utilities for bioedge.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

use crate::tagger::tmvar::TMVAR_URL_TEMPLATE;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// tmVar endpoint template with an `{id}` placeholder.
    pub tmvar_url: String,
    /// Flat JSON cache of raw tmVar responses.
    pub cache_path: PathBuf,
    /// Contact address advertised in the HTTP user agent.
    pub contact_email: String,
    /// Root folder for corpus artefacts.
    pub data_dir: PathBuf,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let tmvar_url = env::var("TMVAR_URL").unwrap_or_else(|_| TMVAR_URL_TEMPLATE.to_string());
        let cache_path = env::var("TAGGER_CACHE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cache.json"));
        let contact_email =
            env::var("CONTACT_EMAIL").unwrap_or_else(|_| "research@example.com".to_string());
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;

        Ok(Self {
            tmvar_url,
            cache_path,
            contact_email,
            data_dir,
        })
    }

    /// Resolve a corpus path: relative paths land under `data_dir`.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }
}
