use std::{path::Path, sync::OnceLock};
use tracing_subscriber::{EnvFilter, fmt};

const FALLBACK_FILTER: &str = "info";

static GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
static INIT: OnceLock<()> = OnceLock::new();

/// `RUST_LOG` wins when set; otherwise falls back to `filter`, then to
/// [`FALLBACK_FILTER`] if `filter` itself doesn't parse.
fn resolve_filter(filter: &str) -> EnvFilter {
    if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER))
    }
}

/// Initialize logging once for the whole process.
/// - `path`: e.g., "logs/search.log"
/// - `filter`: e.g., "corvid::search=trace,corvid::moves::execute=debug"
pub fn init_logging<P: AsRef<Path>>(path: P, filter: &str) {
    INIT.get_or_init(|| {
        let path = path.as_ref();

        if let Some(dir) = path.parent() {
            let _ = std::fs::create_dir_all(dir);
        }

        // Non-blocking writer to a single file (simple & fast for tests).
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("open log file");

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        // Keep the guard alive for the program lifetime.
        let _ = GUARD.set(guard);

        let subscriber = fmt()
            .with_env_filter(resolve_filter(filter))
            .with_ansi(false) // plain text in files
            .with_target(true) // show module, e.g. moves::execute
            .with_file(true)
            .with_line_number(true)
            .with_writer(non_blocking)
            .finish();

        // Ignore error if someone already set a global subscriber (idempotent for tests).
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}
