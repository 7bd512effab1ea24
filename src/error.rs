//! Error types for gateway operations

use crate::transport::TransportError;
use crate::validate::FieldErrors;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gateway operation errors
#[derive(Debug, Error)]
pub enum CieloError {
    /// The payload failed client-side validation; nothing was sent
    #[error("request validation failed")]
    Validation(FieldErrors),

    /// A locally-rejected argument (e.g. a malformed payment id); nothing was sent
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The gateway answered with an error status and a structured error list
    #[error("gateway returned status {status}")]
    Gateway {
        kind: StatusKind,
        status: u16,
        errors: Vec<GatewayError>,
    },

    /// The request never produced a usable response
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl CieloError {
    /// Field error tree, if this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type for gateway operations
pub type CieloResult<T> = Result<T, CieloError>;

/// Coarse class of an HTTP error status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 4xx
    ClientError,
    /// 5xx
    ServerError,
}

impl StatusKind {
    /// Classify an error status; `None` for anything outside 4xx/5xx
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400..=499 => Some(Self::ClientError),
            500..=599 => Some(Self::ServerError),
            _ => None,
        }
    }
}

/// One element of the gateway's error list, e.g. `{"Code": 126, "Message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GatewayError {
    pub code: i64,
    pub message: String,
}
