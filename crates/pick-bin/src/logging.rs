//! File logging and the panic hook.
//!
//! stdout carries the result and the tty carries the UI, so logs only ever go to a file,
//! and only when one was asked for.

use std::path::Path;
use std::sync::Once;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info";

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .with_context(|| format!("log path {} has no file name", path.display()))?;
    let appender = tracing_appender::rolling::never(dir, name);
    Ok(tracing_appender::non_blocking(appender))
}

fn subscriber(writer: NonBlocking, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .finish()
}

/// Install the global subscriber writing to `path`. The guard must outlive every log
/// call; dropping it flushes the writer thread.
pub fn init(path: &Path) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = file_writer(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    match tracing::subscriber::set_global_default(subscriber(writer, filter)) {
        Ok(()) => Ok(Some(guard)),
        // Already installed; drop the guard so its writer shuts down.
        Err(_) => Ok(None),
    }
}

pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}
