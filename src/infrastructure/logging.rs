use std::io;

use anyhow::Result;
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{config::AppConfig, infrastructure::directories::ResolvedPaths};

const LOG_FILE_PREFIX: &str = "site-sentinel.log";

/// Targets emitted by the request pipeline; they follow `LOG_LEVEL`.
const SERVICE_TARGETS: &[&str] = &["api", "web", "model", "notify", "actix_web"];

/// HTTP/TLS internals stay at `warn` unless `RUST_LOG` asks otherwise.
const QUIET_TARGETS: &[&str] = &["h2", "hyper", "hyper_util", "rustls", "reqwest", "html5ever", "selectors"];

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Filter used when `RUST_LOG` is unset: `level` for the service's own targets,
/// `warn` for the HTTP, TLS and HTML-parsing stacks underneath them.
fn default_directives(level: &str) -> String {
    let mut directives = vec![level.to_string(), "actix_server=info".to_string()];
    directives.extend(QUIET_TARGETS.iter().map(|target| format!("{target}=warn")));
    directives.extend(SERVICE_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .unwrap_or_else(|_| EnvFilter::new(default_directives("info")))
}

pub fn init_tracing(config: &AppConfig, paths: &ResolvedPaths) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let file_appender = tracing_appender::rolling::daily(&paths.logs_dir, LOG_FILE_PREFIX);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        let _ = GUARD.set(guard);

        let console_layer = fmt::layer()
            .with_writer(io::stdout)
            .with_target(true)
            .with_thread_names(true)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_writer(file_writer)
            .with_target(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(build_filter(&config.logging.level))
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        tracing::info!(
            logs = %paths.logs_dir.display(),
            level = %config.logging.level,
            "tracing initialized"
        );
        Ok(())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_directives_parse_for_every_level() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let directives = default_directives(level);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{directives}");
        }
    }

    #[test]
    fn default_directives_quiet_transport_and_follow_level_for_service() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("hyper_util=warn"));
        assert!(directives.contains("rustls=warn"));
        assert!(directives.contains("web=debug"));
        assert!(directives.contains("notify=debug"));
    }
}
