//! Logger setup

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialise `env_logger` once; `RUST_LOG` still overrides `level`
pub fn init_logging(level: &str) {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or(level);
        let _ = env_logger::Builder::from_env(env).format_timestamp_millis().try_init();
        log::debug!("Logging initialised at {}", level);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("debug");
        init_logging("trace");
        log::info!("still logging");
    }
}
