use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "furrow.log";

/// Directive used when `RUST_LOG` is unset. Quiet by default so command output stays readable.
fn default_directive(verbose: bool) -> String {
    format!("furrow={}", if verbose { "debug" } else { "warn" })
}

/// Split a `--log-file` path into the directory and file name prefix for the daily roller.
fn rolling_target(log_path: &Path) -> (&Path, &OsStr) {
    let directory = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| OsStr::new(LOG_FILE_NAME));
    (directory, file_name)
}

/// Install the global subscriber: compact logs on stderr, plus JSON lines in a daily
/// rotated file when `log_file` is given. Calling it again is a no-op.
pub fn init(verbose: bool, log_file: Option<PathBuf>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact(),
    );

    let Some(log_path) = log_file else {
        let _ = registry.try_init();
        return;
    };

    let (directory, file_name) = rolling_target(&log_path);
    if let Err(e) = std::fs::create_dir_all(directory) {
        eprintln!("Cannot create log directory {}: {}", directory.display(), e);
    }
    let file_layer = fmt::layer()
        .with_writer(rolling::daily(directory, file_name))
        .with_ansi(false)
        .json();
    let _ = registry.with(file_layer).try_init();
}
