use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Environment, File, FileFormat};
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::config_manager::main::Config;

/// Prefix for environment overrides, e.g. `LINGUA_DEBOUNCE_CONFIG__DELAY_MS=300`.
pub const ENV_PREFIX: &str = "LINGUA";

/// Locate and load the configuration file. Without one, defaults are used
/// with `LINGUA_*` overrides still applied.
///
/// Search order: `$LINGUA_CONFIG`, then `conf.yaml`, `conf.yml` and `conf.json`
/// in the working directory, then `conf.yaml` beside the executable.
pub fn load_or_default() -> Result<(Config, Option<PathBuf>)> {
    load_first_existing(&candidate_paths(), ENV_PREFIX)
}

fn load_first_existing(paths: &[PathBuf], env_prefix: &str) -> Result<(Config, Option<PathBuf>)> {
    for path in paths {
        if path.is_file() {
            let config = load_config_with_env_prefix(path, env_prefix)?;
            return Ok((config, Some(path.clone())));
        }
        debug!("No config at {}", path.display());
    }
    Ok((load_env_only(env_prefix)?, None))
}

fn candidate_paths() -> Vec<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));

    vec![
        std::env::var_os("LINGUA_CONFIG").map(PathBuf::from),
        Some(PathBuf::from("conf.yaml")),
        Some(PathBuf::from("conf.yml")),
        Some(PathBuf::from("conf.json")),
        exe_dir.map(|dir| dir.join("conf.yaml")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn load_config_with_env_prefix(path: &Path, env_prefix: &str) -> Result<Config> {
    let content = load_text_file_with_guess_encoding(path)?;
    let content = substitute_env_vars(&content)?;
    let format = file_format(path)?;

    let settings = config::Config::builder()
        .add_source(File::from_str(&content, format))
        .add_source(environment(env_prefix))
        .build()
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    let config: Config = settings
        .try_deserialize()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

fn load_env_only(env_prefix: &str) -> Result<Config> {
    let settings = config::Config::builder()
        .add_source(environment(env_prefix))
        .build()
        .context("Failed to read configuration from the environment")?;

    let config: Config = settings
        .try_deserialize()
        .with_context(|| format!("Invalid {}_* configuration override", env_prefix))?;
    Ok(config)
}

fn environment(env_prefix: &str) -> Environment {
    Environment::with_prefix(env_prefix)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn file_format(path: &Path) -> Result<FileFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => Ok(FileFormat::Yaml),
        "json" | "jsonld" => Ok(FileFormat::Json),
        _ => anyhow::bail!(
            "Unsupported configuration format: {} (expected .yaml, .yml or .json)",
            path.display()
        ),
    }
}

/// Decode a text file, honouring a BOM if present and assuming UTF-8 otherwise.
pub fn load_text_file_with_guess_encoding(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Configuration file not readable: {}", path.display()))?;
    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        warn!(
            "{} is not valid {}; undecodable bytes were replaced",
            path.display(),
            encoding.name()
        );
    }
    Ok(text.into_owned())
}

/// Replace `${VAR_NAME}` with the variable's value. Unset variables are left untouched.
pub fn substitute_env_vars(content: &str) -> Result<Cow<'_, str>> {
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    Ok(pattern.replace_all(content, |caps: &Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    }))
}
