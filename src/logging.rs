//! Tracing subscriber setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Sets up the logging/tracing subscriber based on verbosity level
pub fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("manual_downloader=info,warn"),
        1 => EnvFilter::new("manual_downloader=debug,info"),
        2 => EnvFilter::new("manual_downloader=trace,debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
