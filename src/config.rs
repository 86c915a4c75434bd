//! Runtime configuration read from the environment.
//!
//! A `.env` file in the working directory is loaded first (if present) so
//! local setups do not need to export credentials by hand.

use thiserror::Error;

/// Default REST root of the record backend.
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";
/// Default assistant model.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
/// Default assistant response budget.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Configuration problems detected at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Table names in the record base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    /// Projects table.
    pub projects: String,
    /// Task groups table.
    pub task_groups: String,
    /// Tasks table.
    pub tasks: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            projects: "Projects".to_string(),
            task_groups: "Task Groups".to_string(),
            tasks: "Tasks".to_string(),
        }
    }
}

/// Connection settings for the record backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSettings {
    /// REST root, without trailing slash.
    pub api_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Base id.
    pub base_id: String,
    /// Table names.
    pub tables: TableNames,
}

/// Settings for the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    /// Model identifier.
    pub model: String,
    /// Response budget.
    pub max_tokens: u32,
    /// API key. Only needed when a live completion is made.
    pub api_key: Option<String>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self { model: DEFAULT_MODEL.to_string(), max_tokens: DEFAULT_MAX_TOKENS, api_key: None }
    }
}

/// Full portal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Record backend settings.
    pub records: RecordSettings,
    /// Assistant settings.
    pub assistant: AssistantSettings,
}

impl PortalConfig {
    /// Loads `.env` and reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`PortalConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let defaults = TableNames::default();
        let records = RecordSettings {
            api_url: get("AIRTABLE_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key: required("AIRTABLE_API_KEY")?,
            base_id: required("AIRTABLE_BASE_ID")?,
            tables: TableNames {
                projects: get("PORTAL_PROJECTS_TABLE").unwrap_or(defaults.projects),
                task_groups: get("PORTAL_TASK_GROUPS_TABLE").unwrap_or(defaults.task_groups),
                tasks: get("PORTAL_TASKS_TABLE").unwrap_or(defaults.tasks),
            },
        };

        Ok(Self { records, assistant: AssistantSettings::from_lookup(lookup)? })
    }
}

impl AssistantSettings {
    /// Loads `.env` and reads assistant settings only. Never requires record
    /// backend credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `PORTAL_MAX_TOKENS` is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds assistant settings from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`AssistantSettings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let max_tokens = match get("PORTAL_MAX_TOKENS") {
            None => DEFAULT_MAX_TOKENS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "PORTAL_MAX_TOKENS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "PORTAL_MAX_TOKENS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };
        Ok(Self {
            model: get("PORTAL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens,
            api_key: get("ANTHROPIC_API_KEY"),
        })
    }
}

fn load_dotenv() {
    if let Some(err) = read_dotenv() {
        tracing::warn!(error = %err, "failed to load .env file");
    }
}

/// Loads `.env` into the process environment. A missing file is not an
/// error.
pub(crate) fn read_dotenv() -> Option<dotenvy::Error> {
    dotenvy::dotenv().err().filter(|err| !err.not_found())
}
