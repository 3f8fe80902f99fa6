//! Gandalf configuration stored in `.gandalf.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = ".gandalf.toml";

/// Gandalf configuration (TOML).
///
/// Missing fields default to values suitable for a local `ollama` install.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GandalfConfig {
    /// Reject diffs whose normalized text exceeds this many bytes.
    pub max_input_bytes: usize,

    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable and leading arguments (e.g. `["ollama","run"]`).
    pub command: Vec<String>,

    /// Model identifier, appended as the last argument.
    pub model: String,

    /// Wall-clock budget for one inference call, measured from launch.
    pub timeout_ms: u64,

    /// Keep at most this many bytes of engine stdout/stderr.
    pub output_limit_bytes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: vec!["ollama".to_string(), "run".to_string()],
            model: "qwen2.5-coder:7b".to_string(),
            timeout_ms: 60_000,
            output_limit_bytes: 1_048_576,
        }
    }
}

impl Default for GandalfConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: 1_048_576,
            engine: EngineConfig::default(),
        }
    }
}

impl GandalfConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_input_bytes == 0 {
            return Err(anyhow!("max_input_bytes must be > 0"));
        }
        if self.engine.timeout_ms == 0 {
            return Err(anyhow!("engine.timeout_ms must be > 0"));
        }
        if self.engine.output_limit_bytes == 0 {
            return Err(anyhow!("engine.output_limit_bytes must be > 0"));
        }
        if self.engine.command.is_empty() || self.engine.command[0].trim().is_empty() {
            return Err(anyhow!("engine.command must be a non-empty array"));
        }
        if self.engine.model.trim().is_empty() {
            return Err(anyhow!("engine.model must not be empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `GandalfConfig::default()`.
pub fn load_config(path: &Path) -> Result<GandalfConfig> {
    if !path.exists() {
        let cfg = GandalfConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GandalfConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &GandalfConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
