use crate::error::{Result, TrackError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".trackpm.yml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackConfig {
    #[serde(default)]
    pub github: GitHubSettings,

    #[serde(default)]
    pub fields: FieldNames,

    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default = "default_project_number")]
    pub project_number: u32,

    /// GraphQL endpoint.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base for issue links in reports.
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// File holding a personal access token, relative to the project root.
    #[serde(default = "default_token_file")]
    pub token_file: String,

    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_organization() -> String {
    "llvm".to_string()
}

fn default_project_number() -> u32 {
    4
}

fn default_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_web_url() -> String {
    "https://github.com".to_string()
}

fn default_token_file() -> String {
    "pat.txt".to_string()
}

fn default_chunk_size() -> usize {
    50
}

fn default_page_size() -> usize {
    100
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            project_number: default_project_number(),
            api_url: default_api_url(),
            web_url: default_web_url(),
            token_file: default_token_file(),
            chunk_size: default_chunk_size(),
            page_size: default_page_size(),
        }
    }
}

/// Names of the project fields read from each item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_category_field")]
    pub category: String,

    #[serde(default = "default_workstream_field")]
    pub workstream: String,

    #[serde(default = "default_project_milestone_field")]
    pub project_milestone: String,

    #[serde(default = "default_target_date_field")]
    pub target_date: String,
}

fn default_category_field() -> String {
    "Category".to_string()
}

fn default_workstream_field() -> String {
    "Workstream".to_string()
}

fn default_project_milestone_field() -> String {
    "Project Milestone".to_string()
}

fn default_target_date_field() -> String {
    "Target Date".to_string()
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            category: default_category_field(),
            workstream: default_workstream_field(),
            project_milestone: default_project_milestone_field(),
            target_date: default_target_date_field(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_path")]
    pub path: String,
}

fn default_output_path() -> String {
    "output".to_string()
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl TrackConfig {
    /// Load the nearest `.trackpm.yml` at or above `start_path`.
    ///
    /// Without a config file the defaults apply and `start_path` is the
    /// project root.
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        match Self::find_config_file(start_path) {
            Some(config_path) => Self::load_from(&config_path),
            None => {
                tracing::debug!(start = %start_path.display(), "No config file found, using defaults");
                Ok((Self::default(), start_path.to_path_buf()))
            }
        }
    }

    /// Load an explicit config file; its directory becomes the project root.
    pub fn load_from(config_path: &Path) -> Result<(Self, PathBuf)> {
        let content = std::fs::read_to_string(config_path)?;
        let config: TrackConfig = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content)?
        };
        config.validate()?;

        let project_root = config_path
            .parent()
            .map(|p| {
                if p.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    p
                }
            })
            .ok_or_else(|| TrackError::Config("Config file has no parent directory".to_string()))?
            .to_path_buf();
        tracing::debug!(path = %config_path.display(), "Loaded config");
        Ok((config, project_root))
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.github.chunk_size == 0 {
            return Err(TrackError::Config("github.chunk_size must be at least 1".to_string()));
        }
        if self.github.page_size == 0 || self.github.page_size > 100 {
            return Err(TrackError::Config(
                "github.page_size must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }

    pub fn output_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.output.path)
    }

    /// The access token: an explicit value wins, then the token file.
    pub fn resolve_token(&self, project_root: &Path, explicit: Option<String>) -> Result<String> {
        if let Some(token) = explicit.filter(|t| !t.trim().is_empty()) {
            return Ok(token.trim().to_string());
        }

        let token_path = project_root.join(&self.github.token_file);
        let token = std::fs::read_to_string(&token_path).map_err(|_| {
            TrackError::Config(format!(
                "No GitHub token: pass --token, set GITHUB_TOKEN or store one in {}",
                token_path.display()
            ))
        })?;
        Ok(token.trim().to_string())
    }
}
