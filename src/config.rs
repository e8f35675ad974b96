use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::cli::CliArgs;

const DEFAULT_DELAY_MS: u64 = 1000;

/// Fully resolved settings; construction fails before any network activity
/// if a required setting is missing.
#[derive(Debug, PartialEq)]
pub struct MigrationConfig {
    pub owner: String,
    pub repository: String,
    pub username: String,
    pub password: String,
    pub trello_file: PathBuf,
    pub delay: Duration,
    pub resume: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub github: Option<GitHubCredentials>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GitHubCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trello2github")
        .join("config.toml")
}

pub fn load_file_config() -> Result<FileConfig> {
    let path = config_path();
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: FileConfig =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(config)
}

/// Merge CLI flags with the config file (flags win) and validate.
pub fn resolve(args: CliArgs) -> Result<MigrationConfig> {
    resolve_with(args, load_file_config()?)
}

pub fn resolve_with(args: CliArgs, file: FileConfig) -> Result<MigrationConfig> {
    let credentials = file.github.unwrap_or_default();

    let Some(owner) = args.owner else {
        bail!("Need an owner (--owner) to be specified");
    };
    let Some(repository) = args.repository else {
        bail!("Need a repository (--repository) to be specified");
    };
    let Some(username) = args.username.or(credentials.username) else {
        bail!("Need a GitHub username (--username) specified");
    };
    let Some(password) = args.password.or(credentials.password) else {
        bail!("Need a password (--password) for GitHub user specified");
    };
    let Some(trello_file) = args.trello else {
        bail!("Need an exported trello json (--trello) file specified");
    };

    Ok(MigrationConfig {
        owner,
        repository,
        username,
        password,
        trello_file,
        delay: Duration::from_millis(args.delay_ms.unwrap_or(DEFAULT_DELAY_MS)),
        resume: args.resume,
    })
}
