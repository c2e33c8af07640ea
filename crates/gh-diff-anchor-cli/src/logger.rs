//! Logging setup using env_logger
//!
//! `RUST_LOG` wins when set. Otherwise the configured filter is used, raised
//! by each `-v` on the command line.

/// Filter used when `RUST_LOG` is not set
fn default_filter(configured: &str, verbosity: u8) -> &str {
    match verbosity {
        0 => configured,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize stderr logging
pub fn init(configured: &str, verbosity: u8) {
    let env = env_logger::Env::default().default_filter_or(default_filter(configured, verbosity));
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .init();
}
