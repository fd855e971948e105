use thiserror::Error;

use crate::enums::ResultReason;

/// Typed failure produced by an operation handler.
///
/// Carries the protocol reason code the dispatcher copies into the batch
/// item result; the display text becomes the result message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    pub reason: ResultReason,
    pub message: String,
}

impl OperationError {
    pub fn new(reason: ResultReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn item_not_found(message: impl Into<String>) -> Self {
        Self::new(ResultReason::ItemNotFound, message)
    }

    pub fn operation_not_supported(message: impl Into<String>) -> Self {
        Self::new(ResultReason::OperationNotSupported, message)
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self::new(ResultReason::GeneralFailure, message)
    }
}
