//! Logging setup.

use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `level` when set. With `file`, events are also
/// written (without ANSI colors) to that path; keep the returned guard
/// alive until exit so buffered lines are flushed. A second call leaves
/// the first subscriber in place.
pub fn setup_logging(level: &str, json: bool, file: Option<&str>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (writer, guard) = match file.map(file_writer) {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };
    let file_layer = writer.map(|w| fmt::layer().with_writer(w).with_ansi(false));

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    let result = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().pretty()).try_init()
    };
    if let Err(e) = result {
        tracing::debug!(error = %e, "Logging already initialized");
    }

    guard
}

fn file_writer(path: &str) -> (NonBlocking, WorkerGuard) {
    let path = Path::new(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chartctl.log".to_string());

    tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_twice_does_not_panic() {
        let dir = std::env::temp_dir().join("chart-monitor-test");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("test.log");
        let guard = setup_logging("debug", false, file.to_str());
        assert!(guard.is_some());

        assert!(setup_logging("info", true, None).is_none());
        tracing::info!("logging works");
    }
}
