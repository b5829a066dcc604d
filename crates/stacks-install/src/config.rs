//! Configuration for stack installs

use serde::{Deserialize, Serialize};

/// Install pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Image that runs `stack unpack` inside the install job
    #[serde(default = "default_executor_image")]
    pub executor_image: String,

    /// Prefix of generated persona cluster role names
    #[serde(default = "default_role_prefix")]
    pub role_prefix: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            executor_image: default_executor_image(),
            role_prefix: default_role_prefix(),
            logging: LoggingConfig::default(),
        }
    }
}

impl InstallConfig {
    /// Load configuration from defaults, an optional file and `STACKS_` environment variables
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&InstallConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // e.g. STACKS_EXECUTOR_IMAGE, STACKS_LOGGING__LEVEL
        builder = builder.add_source(
            config::Environment::with_prefix("STACKS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn executor(&self) -> ExecutorInfo {
        ExecutorInfo {
            image: self.executor_image.clone(),
        }
    }
}

/// The executor the unpack job runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorInfo {
    pub image: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_executor_image() -> String {
    "crossplane/crossplane:latest".to_string()
}

fn default_role_prefix() -> String {
    crate::roles::DEFAULT_ROLE_PREFIX.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
