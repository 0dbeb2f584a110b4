use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a `tracing` filter directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to `log_file` when given (appending, parent directories created),
/// otherwise to stderr so stdout only carries the report.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// Open `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

// ── Archive discovery ──────────────────────────────────────────────────────────

/// Attempt to locate an archive when none was given on the command line.
///
/// Checks, in order, and returns the first that exists:
/// 1. `./tweets.js`
/// 2. `./data/tweets.js`
/// 3. `~/twitter-archive/data/tweets.js`
pub fn discover_archive_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    discover_archive_path_in(cwd.as_deref(), dirs::home_dir().as_deref())
}

/// [`discover_archive_path`] with explicit working and home directories.
pub fn discover_archive_path_in(cwd: Option<&Path>, home: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(cwd) = cwd {
        candidates.push(cwd.join("tweets.js"));
        candidates.push(cwd.join("data").join("tweets.js"));
    }
    if let Some(home) = home {
        candidates.push(home.join("twitter-archive").join("data").join("tweets.js"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── level_directive ───────────────────────────────────────────────────────

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("INFO"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("error"), "error");
        assert_eq!(level_directive("verbose"), "info");
    }

    // ── open_log_file ─────────────────────────────────────────────────────────

    #[test]
    fn test_open_log_file_creates_parents() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("logs").join("nested").join("sense.log");

        let file = open_log_file(&path);
        assert!(file.is_ok());
        assert!(path.is_file(), "log file must exist");
    }

    // ── discover_archive_path_in ──────────────────────────────────────────────

    #[test]
    fn test_discover_returns_none_when_absent() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        assert!(discover_archive_path_in(Some(cwd.path()), Some(home.path())).is_none());
    }

    #[test]
    fn test_discover_prefers_working_directory() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        std::fs::write(cwd.path().join("tweets.js"), "x = []").unwrap();
        let home_data = home.path().join("twitter-archive").join("data");
        std::fs::create_dir_all(&home_data).unwrap();
        std::fs::write(home_data.join("tweets.js"), "x = []").unwrap();

        let found = discover_archive_path_in(Some(cwd.path()), Some(home.path()));
        assert_eq!(found, Some(cwd.path().join("tweets.js")));
    }

    #[test]
    fn test_discover_finds_data_subdirectory() {
        let cwd = TempDir::new().expect("tempdir");
        let data = cwd.path().join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("tweets.js"), "x = []").unwrap();

        let found = discover_archive_path_in(Some(cwd.path()), None);
        assert_eq!(found, Some(data.join("tweets.js")));
    }

    #[test]
    fn test_discover_falls_back_to_home() {
        let home = TempDir::new().expect("tempdir");
        let data = home.path().join("twitter-archive").join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("tweets.js"), "x = []").unwrap();

        let found = discover_archive_path_in(None, Some(home.path()));
        assert_eq!(found, Some(data.join("tweets.js")));
    }
}
