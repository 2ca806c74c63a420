use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER_DEBUG: &str = "debug,hyper_util=info,reqwest::connect=info";
const DEFAULT_FILTER_RELEASE: &str = "info";

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise debug builds log at debug and release builds at info.
/// Logs go to stderr so that stdout only carries command output.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cfg!(debug_assertions) {
            DEFAULT_FILTER_DEBUG
        } else {
            DEFAULT_FILTER_RELEASE
        })
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}
