/// Tracing setup: console output plus a plain-text error log.
///
/// Respects `RUST_LOG` if set. Otherwise the console shows `info` (or
/// `debug` with `--verbose`). Error-level events are always copied to the
/// error log file, whatever the console filter says.
use anyhow::{Context, Result};
use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init(verbose: bool, no_color: bool, log_file: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    let file = File::create(log_file)
        .with_context(|| format!("cannot create log file {}", log_file.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .with(error_file_layer(file))
        .try_init()
        .context("a global tracing subscriber is already installed")?;
    Ok(())
}

/// Layer writing ERROR events to `file` without colour codes.
pub fn error_file_layer<S>(file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_subscriber::Registry;

    #[test]
    fn only_errors_reach_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("error_log.txt");
        let file = File::create(&path).unwrap();

        let subscriber = Registry::default().with(error_file_layer(file));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("scan started");
            tracing::error!(path = "/x/gone.txt", kind = "NotFound", "file inspection failed");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1, "log file:\n{contents}");
        assert!(contents.contains("file inspection failed"));
        assert!(contents.contains("NotFound"));
        assert!(!contents.contains("scan started"));
        assert!(!contents.contains('\u{1b}'));
    }
}
