//! Error types for the resonance collective

use thiserror::Error;

/// Result type alias using resonance's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the resonance collective
#[derive(Debug, Error)]
pub enum Error {
    // ============ Core Errors ============
    /// Request was well-formed but not acceptable (e.g. a session with one artist)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Addressed an artist, engine or artwork that is not registered
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was looked up ("artist", "artwork", ...)
        kind: &'static str,
        /// The id that failed to resolve
        id: String,
    },

    // ============ Access Errors ============
    /// The access gate refused the action until payment is made
    #[error("Payment required: {tier} tier ({price} USDC)")]
    PaymentRequired {
        /// Tier that would unlock the action
        tier: String,
        /// Price of that tier
        price: String,
    },

    // ============ Storage Errors ============
    /// Record store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization of a record failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ============ Configuration Errors ============
    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    // ============ System Errors ============
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new not found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a new payment required error
    pub fn payment_required(tier: impl Into<String>, price: impl Into<String>) -> Self {
        Self::PaymentRequired {
            tier: tier.into(),
            price: price.into(),
        }
    }

    /// HTTP-style status code a boundary layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::Config(_) => 400,
            Self::PaymentRequired { .. } => 402,
            Self::NotFound { .. } => 404,
            _ => 500,
        }
    }

    /// Check if this error was caused by the caller rather than the system
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
