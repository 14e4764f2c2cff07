//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying command-line overrides on top.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use pathview::{
    PathviewError,
    config::{AppConfig, ProfileSection},
    profile::BUILTIN_PROFILES,
};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for PathviewError {
    fn from(err: ConfigError) -> Self {
        PathviewError::Io(std::io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (pathview/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, PathviewError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("pathview/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("org", "pathview", "pathview") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Applies `--profile` and `--scale` to a loaded configuration.
///
/// A profile argument naming a built-in profile selects it; anything else
/// is read as a path to a profile document.
pub fn apply_overrides(
    config: AppConfig,
    profile: Option<&str>,
    scale: Option<f32>,
) -> Result<AppConfig, PathviewError> {
    let mut render = config.render().clone();
    if let Some(scale) = scale {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::Validation(format!("scale must be positive, got {scale}")).into());
        }
        render = render.with_scale(scale);
    }

    let profile = match profile {
        Some(name) if BUILTIN_PROFILES.contains(&name) => ProfileSection::builtin(name),
        Some(path) => ProfileSection::from_path(path),
        None => config.profile().clone(),
    };
    debug!(scale = render.scale(), profile:? = profile; "Configuration overrides applied");
    Ok(AppConfig::new(render, profile))
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, PathviewError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let scale = config.render().scale();
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::Validation(format!("render.scale must be positive, got {scale}")).into());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("does/not/exist.toml")).unwrap_err();
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_overrides() {
        let config = apply_overrides(AppConfig::default(), Some("standard"), Some(2.0)).unwrap();
        assert_eq!(config.render().scale(), 2.0);
        assert_eq!(config.profile().load().unwrap().name(), "standard");
    }

    #[test]
    fn test_profile_path_override() {
        let config = apply_overrides(AppConfig::default(), Some("my/profile.toml"), None).unwrap();
        assert!(config.profile().load().is_err());
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = apply_overrides(AppConfig::default(), None, Some(0.0)).unwrap_err();
        assert!(err.to_string().contains("scale must be positive"));
    }
}
