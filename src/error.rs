//! # Application Error Handling
//!
//! This module defines the DoorbellError enum, the application-layer error
//! type wrapping driver and collaborator failures.

use thiserror::Error;

use crate::radio::driver::Rfm69Error;

/// Represents the different error types that can occur in the doorbell
/// application.
#[derive(Debug, Error)]
pub enum DoorbellError {
    /// A radio driver operation failed.
    #[error("radio error: {0}")]
    Radio(#[from] Rfm69Error),

    /// Battery voltage could not be sampled.
    #[error("battery measurement error: {0}")]
    Battery(String),

    /// Configuration file was malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure (config file, sysfs ADC channel).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A compile-time feature required for this operation is not enabled.
    #[error("feature not enabled: {0}")]
    FeatureNotEnabled(&'static str),
}
