//! Logger initialisation

use log::LevelFilter;

/// Map a `-v` count to a level filter
pub fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initialise `env_logger`
///
/// `RUST_LOG` is honoured when no `-v` flag was given; an explicit
/// verbosity overrides it. HTTP client internals stay at info or quieter.
/// Calling this more than once is harmless.
pub fn init_logger(verbosity: u8) {
    let mut builder = env_logger::Builder::from_default_env();

    if verbosity > 0 || std::env::var_os("RUST_LOG").is_none() {
        let level = level_for_verbosity(verbosity);
        let capped = level.min(LevelFilter::Info);
        builder.filter_level(level);
        builder.filter_module("reqwest", capped);
        builder.filter_module("hyper", capped);
    }
    builder.format_timestamp_millis();

    // Ignore the error when a logger is already installed
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Warn);
        assert_eq!(level_for_verbosity(1), LevelFilter::Info);
        assert_eq!(level_for_verbosity(2), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(9), LevelFilter::Debug);
    }

    #[test]
    fn test_init_twice() {
        init_logger(0);
        init_logger(2);
    }
}
