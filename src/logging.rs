//! Log setup: a compact stderr layer plus an optional daily JSON file.
//!
//! Logs go to stderr; command output owns stdout.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_FILE_NAME: &str = "trackpm.log";

/// Directives used when `RUST_LOG` is not set.
/// Verbose mode also enables the HTTP client's logs.
pub fn default_filter(verbose: bool) -> String {
    if verbose {
        "trackpm=debug,reqwest=debug".to_string()
    } else {
        "trackpm=info".to_string()
    }
}

/// Directory and file name prefix for the rolling log file.
///
/// A path naming an existing directory, or ending in a separator, gets the
/// default file name inside it.
pub fn log_file_location(path: &Path) -> (PathBuf, OsString) {
    let names_directory = path.is_dir() || path.as_os_str().to_string_lossy().ends_with('/');
    match path.file_name() {
        Some(name) if !names_directory => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            (directory.to_path_buf(), name.to_os_string())
        }
        _ => (path.to_path_buf(), OsString::from(DEFAULT_LOG_FILE_NAME)),
    }
}

/// Install the global subscriber. A second call is ignored.
pub fn init(verbose: bool, log_file: Option<PathBuf>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    let Some(log_path) = log_file else {
        let _ = subscriber.try_init();
        return;
    };

    let (directory, file_name) = log_file_location(&log_path);
    if let Err(e) = std::fs::create_dir_all(&directory) {
        let _ = subscriber.try_init();
        tracing::warn!(path = %directory.display(), error = %e, "Cannot create log directory; logging to stderr only");
        return;
    }

    let file_layer = fmt::layer()
        .with_writer(tracing_appender::rolling::daily(&directory, &file_name))
        .with_ansi(false)
        .json();

    let _ = subscriber.with(file_layer).try_init();
    tracing::debug!(path = %directory.join(&file_name).display(), "Logging to file");
}
