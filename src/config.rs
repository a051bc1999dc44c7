use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::version::Version;

/// Represents the complete configuration for aero-release.
///
/// Contains the manifest/lockfile paths, the external commands the driver
/// invokes, and git naming conventions.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub git: GitConfig,
}

/// Files the release touches, relative to the repository root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_lockfile")]
    pub lockfile: PathBuf,

    #[serde(default = "default_requirements")]
    pub requirements: PathBuf,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_lockfile() -> PathBuf {
    PathBuf::from("uv.lock")
}

fn default_requirements() -> PathBuf {
    PathBuf::from("requirements.txt")
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            manifest: default_manifest(),
            lockfile: default_lockfile(),
            requirements: default_requirements(),
        }
    }
}

/// External commands, each as an argv list (program first).
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommandsConfig {
    #[serde(default = "default_lock_command")]
    pub lock: Vec<String>,

    #[serde(default = "default_compile_command")]
    pub compile: Vec<String>,

    #[serde(default = "default_deploy_command")]
    pub deploy: Vec<String>,
}

fn default_lock_command() -> Vec<String> {
    vec!["uv".to_string(), "lock".to_string()]
}

fn default_compile_command() -> Vec<String> {
    vec![
        "uv".to_string(),
        "pip".to_string(),
        "compile".to_string(),
        "pyproject.toml".to_string(),
        "-o".to_string(),
        "requirements.txt".to_string(),
    ]
}

fn default_deploy_command() -> Vec<String> {
    vec![
        "reflex".to_string(),
        "deploy".to_string(),
        "--no-interactive".to_string(),
    ]
}

impl Default for CommandsConfig {
    fn default() -> Self {
        CommandsConfig {
            lock: default_lock_command(),
            compile: default_compile_command(),
            deploy: default_deploy_command(),
        }
    }
}

/// Git naming conventions for the release commit, tag, and push target.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_commit_message() -> String {
    "release: {tag}".to_string()
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
            tag_prefix: default_tag_prefix(),
            commit_message: default_commit_message(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig::default(),
            commands: CommandsConfig::default(),
            git: GitConfig::default(),
        }
    }
}

impl Config {
    /// Tag name for a version (e.g., "v1.2.3")
    pub fn tag_name(&self, version: &Version) -> String {
        format!("{}{}", self.git.tag_prefix, version)
    }

    /// Commit message for a release tag
    pub fn commit_message(&self, tag: &str) -> String {
        self.git.commit_message.replace("{tag}", tag)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. `.aero-release.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./release.toml").exists() {
        fs::read_to_string("./release.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".aero-release.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
