//! Configuration file support for the `testmore` command.
//!
//! Configuration is read from a TOML file. All settings are optional and unknown fields are
//! ignored. Settings are layered: defaults < config file < command-line arguments.

use etcetera::BaseStrategy;
use std::path::{Path, PathBuf};
use testmore_core::{Options, diagnostics::DEFAULT_LABEL_WIDTH};

use crate::{args::CommandLineArgs, events::TraceEvent};

/// Root configuration structure.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Failure diagnostic settings.
    pub diagnostics: DiagnosticsConfig,

    /// Glob pattern settings.
    pub patterns: PatternsConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Failure diagnostic settings.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Width that diagnostic labels are right-aligned to.
    #[serde(rename = "label-width")]
    pub label_width: Option<usize>,

    /// Colorize TAP result lines.
    pub color: Option<bool>,
}

/// Glob pattern settings.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Accept extended glob syntax (`@(a|b)`, `!(x)`, ...).
    #[serde(rename = "extended-globbing")]
    pub extended_globbing: Option<bool>,
}

/// Logging settings.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Events to trace at debug level, in addition to any named with `--debug`.
    #[serde(rename = "debug-events")]
    pub debug_events: Vec<TraceEvent>,
}

impl Config {
    /// Converts the configuration to run [`Options`], merging with command-line arguments.
    ///
    /// # Arguments
    ///
    /// * `args` - The parsed command-line arguments.
    pub fn to_options(&self, args: &CommandLineArgs) -> Options {
        Options::builder()
            .label_width(
                self.diagnostics
                    .label_width
                    .unwrap_or(DEFAULT_LABEL_WIDTH),
            )
            .extended_globbing(merge_bool_setting(
                args.extended_globbing,
                false,
                self.patterns.extended_globbing,
            ))
            .color(merge_bool_setting(args.color, false, self.diagnostics.color))
            .build()
    }
}

/// Merges a boolean setting from CLI args, config file, and defaults.
///
/// A boolean flag can't distinguish "explicitly false" from "not provided", so a CLI value
/// that differs from the default is taken as explicit.
const fn merge_bool_setting(
    cli_value: bool,
    cli_default: bool,
    config_value: Option<bool>,
) -> bool {
    if cli_value != cli_default {
        cli_value
    } else if let Some(config) = config_value {
        config
    } else {
        cli_default
    }
}

/// Result of attempting to load a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration, or default if loading failed.
    pub config: Config,

    /// The path that was used (or attempted) for loading.
    pub path: Option<PathBuf>,

    /// Any error that occurred during loading.
    pub error: Option<ConfigLoadError>,

    /// Whether the path was explicitly provided by the user (via `--config`).
    /// If true and there's an error, the command should fail rather than continue.
    pub explicit_path: bool,
}

/// Errors that can occur when loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the TOML content.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Returns the default configuration file path for the current platform, or `None` if the
/// platform's config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("testmore").join("config.toml"))
}

/// Loads configuration from the specified path.
pub fn load_from_path(path: &Path) -> ConfigLoadResult {
    let loaded = std::fs::read_to_string(path)
        .map_err(ConfigLoadError::from)
        .and_then(|content| toml::from_str::<Config>(&content).map_err(ConfigLoadError::from));

    let (config, error) = match loaded {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    ConfigLoadResult {
        config,
        path: Some(path.to_path_buf()),
        error,
        explicit_path: false,
    }
}

/// Loads configuration based on the provided options.
///
/// # Arguments
///
/// * `disabled` - If true, skip loading and return defaults.
/// * `explicit_path` - If provided, use this path instead of the default.
pub fn load_config(disabled: bool, explicit_path: Option<&Path>) -> ConfigLoadResult {
    let defaults = |path| ConfigLoadResult {
        config: Config::default(),
        path,
        error: None,
        explicit_path: false,
    };

    if disabled {
        return defaults(None);
    }

    let is_explicit = explicit_path.is_some();

    let path = match explicit_path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return defaults(None),
        },
    };

    // A missing default file is not an error.
    if !is_explicit && !path.exists() {
        return defaults(Some(path));
    }

    let mut result = load_from_path(&path);
    result.explicit_path = is_explicit;
    result
}
