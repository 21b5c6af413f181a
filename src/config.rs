// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::matching::{AlignmentMode, WordAligner, ACCEPTANCE_THRESHOLD, LOOKAHEAD_WINDOW};

/// Application directory under the platform config dir
const APP_DIR: &str = "DictationTrainer";
const CONFIG_FILE: &str = "config.json";

/// Lookahead bounds accepted from a config file
const MIN_LOOKAHEAD: usize = 1;
const MAX_LOOKAHEAD: usize = 20;

/// Key written by the old web client
const LEGACY_CAPITALIZATION_KEY: &str = "checkCapitalization";

fn default_lookahead_window() -> usize {
    LOOKAHEAD_WINDOW
}

fn default_acceptance_threshold() -> f64 {
    ACCEPTANCE_THRESHOLD
}

fn default_live_alignment_mode() -> AlignmentMode {
    AlignmentMode::Greedy
}

fn default_report_alignment_mode() -> AlignmentMode {
    AlignmentMode::Optimal
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Treat case differences as errors
    #[serde(default)]
    pub check_capitalization: bool,
    /// Greedy aligner: user words examined per reference word
    #[serde(default = "default_lookahead_window")]
    pub lookahead_window: usize,
    /// Greedy aligner: minimum penalized score to accept a pairing
    #[serde(default = "default_acceptance_threshold")]
    pub acceptance_threshold: f64,
    /// Alignment used for feedback while typing
    #[serde(default = "default_live_alignment_mode")]
    pub live_alignment_mode: AlignmentMode,
    /// Alignment used for submitted sentences and the report
    #[serde(default = "default_report_alignment_mode")]
    pub report_alignment_mode: AlignmentMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            check_capitalization: false,
            lookahead_window: default_lookahead_window(),
            acceptance_threshold: default_acceptance_threshold(),
            live_alignment_mode: default_live_alignment_mode(),
            report_alignment_mode: default_report_alignment_mode(),
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("cannot resolve config directory"))?;
        let app_dir = config_dir.join(APP_DIR);
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join(CONFIG_FILE))
    }

    /// Load from the default location
    ///
    /// The flag is true when a legacy layout was migrated; the caller decides
    /// whether to save.
    pub fn load() -> Result<(Self, bool)> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<(Self, bool)> {
        tracing::info!("Loading config from {:?}", path);

        if !path.exists() {
            tracing::warn!("Config file not found, using defaults");
            return Ok((Self::new(), false));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let v: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("config file is not valid JSON: {}", path.display()))?;

        let mut migrated = false;
        let mut config: EngineConfig = match serde_json::from_value(v.clone()) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Config did not parse as a whole, recovering field by field: {}", e);
                Self::recover_fields(&v)
            }
        };

        // Legacy camelCase switch
        if v.get("check_capitalization").is_none() {
            if let Some(flag) = v.get(LEGACY_CAPITALIZATION_KEY).and_then(|f| f.as_bool()) {
                tracing::info!("Migrating {} -> check_capitalization", LEGACY_CAPITALIZATION_KEY);
                config.check_capitalization = flag;
                migrated = true;
            }
        }

        let sanitized = config.clone().sanitized();
        if sanitized != config {
            tracing::warn!("Config values out of range, clamped");
        }

        if migrated {
            tracing::info!("Config loaded (migrated, save recommended)");
        } else {
            tracing::info!("Config loaded");
        }
        Ok((sanitized, migrated))
    }

    /// Keep every field that still parses, default the rest
    fn recover_fields(v: &serde_json::Value) -> Self {
        let mut cfg = Self::new();

        if let Some(flag) = v.get("check_capitalization").and_then(|f| f.as_bool()) {
            cfg.check_capitalization = flag;
        }
        if let Some(window) = v.get("lookahead_window").and_then(|w| w.as_u64()) {
            cfg.lookahead_window = window as usize;
        }
        if let Some(threshold) = v.get("acceptance_threshold").and_then(|t| t.as_f64()) {
            cfg.acceptance_threshold = threshold;
        }
        if let Some(mode) = v
            .get("live_alignment_mode")
            .and_then(|m| serde_json::from_value(m.clone()).ok())
        {
            cfg.live_alignment_mode = mode;
        }
        if let Some(mode) = v
            .get("report_alignment_mode")
            .and_then(|m| serde_json::from_value(m.clone()).ok())
        {
            cfg.report_alignment_mode = mode;
        }

        cfg
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Write via a temp file and rename
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tracing::info!("Saving config to {:?}", path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content).map_err(|e| {
            tracing::error!("Failed to write temp file: {}", e);
            e
        })?;
        std::fs::rename(&temp_path, path)
            .with_context(|| format!("failed to replace config file {}", path.display()))?;

        Ok(())
    }

    /// Clamp values into their usable ranges
    pub fn sanitized(mut self) -> Self {
        self.lookahead_window = self.lookahead_window.clamp(MIN_LOOKAHEAD, MAX_LOOKAHEAD);
        if !self.acceptance_threshold.is_finite() {
            self.acceptance_threshold = default_acceptance_threshold();
        }
        self.acceptance_threshold = self.acceptance_threshold.clamp(0.0, 1.0);
        self
    }

    /// Aligner configured from these settings
    pub fn aligner(&self) -> WordAligner {
        WordAligner::new(self.check_capitalization)
            .with_lookahead(self.lookahead_window)
            .with_acceptance_threshold(self.acceptance_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(!config.check_capitalization);
        assert_eq!(config.lookahead_window, 5);
        assert_eq!(config.acceptance_threshold, 0.38);
        assert_eq!(config.live_alignment_mode, AlignmentMode::Greedy);
        assert_eq!(config.report_alignment_mode, AlignmentMode::Optimal);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"check_capitalization": true}"#).unwrap();
        assert!(config.check_capitalization);
        assert_eq!(config.lookahead_window, 5);
        assert_eq!(config.live_alignment_mode, AlignmentMode::Greedy);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (config, migrated) = EngineConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, EngineConfig::new());
        assert!(!migrated);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = EngineConfig {
            check_capitalization: true,
            lookahead_window: 3,
            acceptance_threshold: 0.5,
            live_alignment_mode: AlignmentMode::Optimal,
            report_alignment_mode: AlignmentMode::Greedy,
        };
        config.save_to(&path).unwrap();

        let (loaded, migrated) = EngineConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!migrated);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_legacy_key_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"checkCapitalization": true}"#).unwrap();

        let (config, migrated) = EngineConfig::load_from(&path).unwrap();
        assert!(config.check_capitalization);
        assert!(migrated);
    }

    #[test]
    fn test_bad_field_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"check_capitalization": true, "live_alignment_mode": "sideways", "lookahead_window": 50}"#,
        )
        .unwrap();

        let (config, _) = EngineConfig::load_from(&path).unwrap();
        assert!(config.check_capitalization);
        assert_eq!(config.live_alignment_mode, AlignmentMode::Greedy);
        assert_eq!(config.lookahead_window, 20);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(EngineConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_sanitized() {
        let config = EngineConfig {
            lookahead_window: 0,
            acceptance_threshold: f64::NAN,
            ..EngineConfig::new()
        }
        .sanitized();
        assert_eq!(config.lookahead_window, 1);
        assert_eq!(config.acceptance_threshold, 0.38);

        let config = EngineConfig {
            acceptance_threshold: 3.0,
            ..EngineConfig::new()
        }
        .sanitized();
        assert_eq!(config.acceptance_threshold, 1.0);
    }
}
