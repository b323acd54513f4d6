use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// Install the global `tracing` subscriber.
pub fn init_tracing(cfg: &LogConfig) {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(&cfg.filter));
    match cfg.format {
        LogFormat::Json => builder.with_target(false).json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
