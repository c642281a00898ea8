// Configuration loading and parsing (config/gridedge.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the single configuration file inside `config/`.
pub const CONFIG_FILE: &str = "gridedge.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub model: ModelConfig,
    pub backtest: BacktestConfig,
    pub data_paths: DataPaths,
    pub ledger_path: String,
}

// ---------------------------------------------------------------------------
// gridedge.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire gridedge.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    model: ModelConfig,
    #[serde(default)]
    backtest: BacktestConfig,
    data: DataPaths,
    ledger: LedgerSection,
}

#[derive(Debug, Clone, Deserialize)]
struct LedgerSection {
    path: String,
}

/// Score-distribution settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ModelConfig {
    /// Base widening applied to both scoring rates before the Poisson table
    /// is built. Adjusted per game for weather, division and playoff
    /// stakes; a game context may override it outright.
    pub variance: f64,
    /// Highest score (inclusive) enumerated for each team.
    pub max_score: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            variance: 0.15,
            max_score: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BacktestConfig {
    /// Units risked per graded bet.
    pub stake: f64,
    /// Number of picks listed in the top-edge section of a report.
    pub top_picks: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            stake: 1.0,
            top_picks: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub games: String,
    pub team_stats: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/gridedge.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Parse and validate the contents of a gridedge.toml file. `path` is only
/// used for error reporting.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config {
        model: file.model,
        backtest: file.backtest,
        data_paths: file.data,
        ledger_path: file.ledger.path,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/gridedge.toml` into `config/` unless a config file is
/// already there. Returns the path written, if any.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }
    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "no {} in config/ or defaults/ under {}",
                CONFIG_FILE,
                base_dir.display()
            ),
        });
    }

    let copy_err = |e: std::io::Error| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    };
    std::fs::create_dir_all(base_dir.join("config")).map_err(copy_err)?;
    std::fs::copy(&source, &target).map_err(copy_err)?;
    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let variance = config.model.variance;
    if !(0.10..=0.25).contains(&variance) {
        return Err(ConfigError::ValidationError {
            field: "model.variance".into(),
            message: format!("must be between 0.10 and 0.25 inclusive, got {variance}"),
        });
    }

    let max_score = config.model.max_score;
    if !(20..=120).contains(&max_score) {
        return Err(ConfigError::ValidationError {
            field: "model.max_score".into(),
            message: format!("must be between 20 and 120 inclusive, got {max_score}"),
        });
    }

    let stake = config.backtest.stake;
    if !stake.is_finite() || stake <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "backtest.stake".into(),
            message: format!("must be > 0, got {stake}"),
        });
    }

    if config.backtest.top_picks == 0 {
        return Err(ConfigError::ValidationError {
            field: "backtest.top_picks".into(),
            message: "must be > 0".into(),
        });
    }

    let path_fields: &[(&str, &str)] = &[
        ("data.games", &config.data_paths.games),
        ("data.team_stats", &config.data_paths.team_stats),
        ("ledger.path", &config.ledger_path),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
