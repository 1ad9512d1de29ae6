use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the stderr subscriber once per process. `RUST_LOG` wins; otherwise
/// the crate logs at warn, info with `-v` and debug with `-vv`.
pub fn init_logging(verbosity: u8) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if env::var("RUST_LOG").is_err() {
            if let Ok(directive) = format!("stackprobe={}", level_for(verbosity)).parse() {
                filter = filter.add_directive(directive);
            }
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init();
    });
}

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(5), Level::DEBUG);
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging(2);
        init_logging(0);
    }
}
