//! Configuration loading with layered lookup
//!
//! The config file is TOML. It is looked up in this order, first hit wins:
//! 1. an explicit path (`--config` / `KROZEK_CONFIG`)
//! 2. `./.env.toml`, then `./.env` in the working directory
//! 3. the global user config (`~/.config/krozek/config.toml` on Linux)
//!
//! The access token can always be overridden with `KROZEK_TOKEN`.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the configured access token
pub const TOKEN_ENV: &str = "KROZEK_TOKEN";

/// File names searched in the working directory
pub const LOCAL_CONFIG_FILES: &[&str] = &[".env.toml", ".env"];

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "main";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration file found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required config value: {0}")]
    MissingField(&'static str),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classroom configuration
#[derive(Clone, Deserialize)]
pub struct Config {
    /// Organization that holds the student repositories
    #[serde(alias = "OrgName", alias = "orgname", alias = "orgName")]
    pub org_name: String,

    /// Personal access token with `admin:org` and `repo` scopes
    #[serde(alias = "Token")]
    pub token: String,

    /// Directory holding course content, one folder per pushable unit
    #[serde(alias = "ContentDir", alias = "contentdir", alias = "contentDir")]
    pub content_dir: PathBuf,

    /// README committed to every freshly created repository
    #[serde(alias = "InitReadme", alias = "initreadme", alias = "initReadme")]
    pub init_readme: PathBuf,

    /// Org members that are not students (teachers, assistants, bots)
    #[serde(
        alias = "WhiteListedMembers",
        alias = "whitelistedmembers",
        alias = "whiteListedMembers"
    )]
    pub whitelisted_members: Vec<String>,

    /// Logins to invite with `invite-students`
    #[serde(alias = "InviteTo", alias = "inviteto", alias = "inviteTo")]
    pub invite_to: Vec<String>,

    /// Branch that content pushes update
    #[serde(default = "default_branch", alias = "Branch")]
    pub branch: String,

    /// REST API root, override for GitHub Enterprise
    #[serde(default = "default_api_url", alias = "ApiUrl", alias = "apiurl")]
    pub api_url: String,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("org_name", &self.org_name)
            .field("token", &redact(&self.token))
            .field("content_dir", &self.content_dir)
            .field("init_readme", &self.init_readme)
            .field("whitelisted_members", &self.whitelisted_members)
            .field("invite_to", &self.invite_to)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Mask all but the last four characters of a secret
pub fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

impl Config {
    /// Load configuration, resolving the file location as described in the module docs
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::locate(explicit)?;
        tracing::debug!(path = %path.display(), "loading config");
        let mut config = Self::from_file(&path)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }

        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                tracing::debug!("token overridden from {}", TOKEN_ENV);
                config.token = token;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolve which config file to read
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            if path.is_file() {
                return Ok(path.to_path_buf());
            }
            return Err(ConfigError::NotFound {
                searched: vec![path.to_path_buf()],
            });
        }

        let mut searched = Vec::new();
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        for name in LOCAL_CONFIG_FILES {
            let candidate = cwd.join(name);
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(candidate);
        }

        if let Some(global) = Self::global_config_path() {
            if global.is_file() {
                return Ok(global);
            }
            searched.push(global);
        }

        Err(ConfigError::NotFound { searched })
    }

    /// Path to the global user config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "krozek")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a config file without validation or environment overrides
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Anchor relative `content_dir` and `init_readme` at `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.content_dir, &mut self.init_readme] {
            if path.is_relative() && !path.as_os_str().is_empty() {
                *path = base.join(&*path);
            }
        }
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Check that every required string value is non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, bool); 6] = [
            ("org_name", self.org_name.trim().is_empty()),
            ("token", self.token.trim().is_empty()),
            ("content_dir", self.content_dir.as_os_str().is_empty()),
            ("init_readme", self.init_readme.as_os_str().is_empty()),
            ("branch", self.branch.trim().is_empty()),
            ("api_url", self.api_url.trim().is_empty()),
        ];

        match required.iter().find(|(_, missing)| *missing) {
            Some((name, _)) => Err(ConfigError::MissingField(*name)),
            None => Ok(()),
        }
    }

    /// Commented starter config written by `krozek init`
    pub fn template() -> &'static str {
        r#"# Krozek classroom configuration

# Organization that holds the student repositories
org_name = "my-classroom"

# Personal access token (scopes: admin:org, repo, delete_repo).
# Can be overridden with the KROZEK_TOKEN environment variable.
token = ""

# Relative paths below are resolved against the directory of this file.

# Directory with course content; each sub-directory can be pushed
content_dir = "content"

# README committed to each newly created student repository
init_readme = "README.md"

# Org members that are not students
whitelisted_members = []

# Logins invited by `krozek invite-students`
invite_to = []

# Branch updated by `krozek push` (default: main)
# branch = "main"

# REST API root, change for GitHub Enterprise
# api_url = "https://api.github.com"
"#
    }
}
