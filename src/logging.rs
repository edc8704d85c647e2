//! File logging. The terminal belongs to the renderer, so nothing goes to stderr.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "termglobe=info";

fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber writing to `path`.
///
/// Returns false, leaving logging off, when there is no path or the file
/// cannot be opened.
pub fn init(path: Option<&Path>) -> bool {
    let Some(file) = path.and_then(|p| open_log(p).ok()) else {
        return false;
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("termglobe.log");
        open_log(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn no_path_means_no_logging() {
        assert!(!init(None));
    }
}
