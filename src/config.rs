use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::prompt::DEFAULT_MAX_EXAMPLES;

const CONFIG_DIR_NAME: &str = "personakit";
const CONFIG_FILE_NAME: &str = "config.toml";

const ENV_PERSONA: &str = "PERSONAKIT_PERSONA";
const ENV_MAX_EXAMPLES: &str = "PERSONAKIT_MAX_EXAMPLES";
const ENV_LANGUAGE: &str = "PERSONAKIT_LANGUAGE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub config_is_explicit: bool,
    /// Persona document to use instead of the built-in one.
    pub persona_path: Option<PathBuf>,
    pub max_examples: usize,
    pub default_language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    persona_path: Option<String>,
    max_examples: Option<i64>,
    default_language: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Loads from `explicit_path` when given, otherwise from the discovered
    /// default location. Only an explicit path is required to exist.
    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let (config_path, config_is_explicit) = match explicit_path {
            Some(path) => {
                if !path.is_file() {
                    bail!(
                        "Failed to load config {}: file does not exist",
                        path.display()
                    );
                }
                (path.to_path_buf(), true)
            }
            None => (discover_config_path()?, false),
        };
        let file_config = load_file_config(&config_path)?;

        dotenvy::dotenv().ok();

        let file_persona = file_config
            .as_ref()
            .and_then(|cfg| cfg.persona_path.as_deref())
            .and_then(non_empty)
            .map(|value| resolve_relative(&config_path, value));
        let file_max_examples = file_config
            .as_ref()
            .and_then(|cfg| cfg.max_examples)
            .map(validate_max_examples)
            .transpose()
            .map_err(|reason| config_error(&config_path, "max_examples", &reason))?;
        let file_language = file_config
            .as_ref()
            .and_then(|cfg| cfg.default_language.as_deref())
            .and_then(non_empty)
            .map(ToOwned::to_owned);

        let env_max_examples = env_non_empty(ENV_MAX_EXAMPLES)
            .as_deref()
            .map(parse_env_max_examples)
            .transpose()?;

        let config = Self {
            persona_path: env_non_empty(ENV_PERSONA)
                .map(PathBuf::from)
                .or(file_persona),
            max_examples: env_max_examples
                .or(file_max_examples)
                .unwrap_or(DEFAULT_MAX_EXAMPLES),
            default_language: env_non_empty(ENV_LANGUAGE).or(file_language),
            config_path,
            config_is_explicit,
        };
        debug!(
            config_path = %config.config_path.display(),
            explicit = config.config_is_explicit,
            persona_path = ?config.persona_path,
            max_examples = config.max_examples,
            "resolved config"
        );
        Ok(config)
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let Some(home) = dirs::home_dir() else {
        bail!("Failed to resolve config path: HOME directory is unavailable");
    };

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    match toml::from_str(&config_text) {
        Ok(config) => Ok(Some(config)),
        Err(err) => bail!("Failed to load config {}: {err}", config_path.display()),
    }
}

fn resolve_relative(config_path: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        return path;
    }

    match config_path.parent() {
        Some(dir) => dir.join(path),
        None => path,
    }
}

fn parse_env_max_examples(value: &str) -> Result<usize> {
    value
        .parse::<i64>()
        .map_err(|_| "expected a positive integer".to_string())
        .and_then(validate_max_examples)
        .map_err(|reason| anyhow!("Invalid {ENV_MAX_EXAMPLES} value '{value}': {reason}"))
}

fn validate_max_examples(value: i64) -> std::result::Result<usize, String> {
    if value < 1 {
        return Err("must be >= 1".to_string());
    }
    usize::try_from(value).map_err(|_| "value is too large".to_string())
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn config_error(config_path: &Path, key_path: &str, reason: &str) -> anyhow::Error {
    anyhow!(
        "Failed to load config {}: {key_path}: {reason}",
        config_path.display()
    )
}
