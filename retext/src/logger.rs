// retext/src/logger.rs
//! Logger setup for the retext binary.
//!
//! `RUST_LOG` is honored as usual; `level_override` (from `--quiet` or
//! `--debug`) replaces the default level. Log lines go to stderr so they never
//! mix with the rewritten output on stdout.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

pub fn init_logger(level_override: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level_override {
        builder.filter_level(level);
    }
    builder.format_timestamp(None).target(Target::Stderr);
    // A second initialization (as in tests) is harmless.
    let _ = builder.try_init();
}
