// offense-norm/src/logger.rs
//! Logging setup for the `offense-norm` binary.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Installs the global `env_logger`.
///
/// With `level` set, that level applies to every module and `RUST_LOG` is
/// ignored. Otherwise `RUST_LOG` is honoured, defaulting to `warn`. Logs go to
/// stderr so stdout only ever carries normalized records.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_level(level);
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("warn")),
    };
    builder
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init()
        .ok();
}
