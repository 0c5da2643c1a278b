//! Logging initialization

/// Initializes the logger with the `env_logger` crate.
///
/// Verbosity is controlled through `RUST_LOG`, e.g.
/// `RUST_LOG=doorbell_rs=debug`.
pub fn init_logger() {
    env_logger::init();
}
