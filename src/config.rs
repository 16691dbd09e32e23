// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assistant::ChatOptions;
use crate::assistant::prompt::DEFAULT_MODEL;
use crate::db::{default_data_dir, project_dirs};
use crate::engine::{GoalFunding, SeedMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub default_model: String,
    pub probe_timeout_secs: u64,
    pub chat_timeout_secs: u64,
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
    /// Prior transcript entries sent along with each new message.
    pub history_window: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            probe_timeout_secs: 3,
            chat_timeout_secs: 120,
            temperature: 0.7,
            top_p: 0.95,
            num_predict: 1024,
            history_window: 10,
        }
    }
}

impl AssistantConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }

    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            top_p: self.top_p,
            num_predict: self.num_predict,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub seed: SeedMode,
    pub goal_funding: GoalFunding,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: Option<PathBuf>,
    pub assistant: AssistantConfig,
    pub ledger: LedgerConfig,
}

impl Config {
    /// Defaults, then `config.toml` from the platform config dir, then
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let path = project_dirs()?.config_dir().join("config.toml");
        let mut cfg = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Read config {}", path.display()))?;
            Self::from_toml_str(&raw).with_context(|| format!("Parse config {}", path.display()))?
        } else {
            Self::default()
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(dir) = non_empty("COPPERONE_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = non_empty("COPPERONE_OLLAMA_URL").or_else(|| non_empty("OLLAMA_BASE_URL")) {
            self.assistant.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty("COPPERONE_MODEL") {
            self.assistant.default_model = model.trim().to_string();
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}
