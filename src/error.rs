use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Issue not found: {0}")]
    NotFound(String),

    #[error("Unable to parse issue resourcePath '{0}'")]
    MalformedPath(String),

    #[error("{resource_path} - body contains '{found}', but expected '{expected}'")]
    UnexpectedSectionType {
        resource_path: String,
        expected: String,
        found: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
