//! Decoded request and response messages.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::{Operation, ResultReason, ResultStatus};
use crate::error::OperationError;
use crate::payloads::{RequestPayload, ResponsePayload};

/// One `major.minor` protocol version pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub major: i32,
    pub minor: i32,
}

impl ProtocolVersion {
    pub const V1_0: Self = Self::new(1, 0);
    pub const V1_1: Self = Self::new(1, 1);
    pub const V1_2: Self = Self::new(1, 2);
    pub const V1_3: Self = Self::new(1, 3);
    pub const V1_4: Self = Self::new(1, 4);

    pub const fn new(major: i32, minor: i32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Versions the server speaks, newest first. DiscoverVersions returns this
/// list verbatim.
pub const SUPPORTED_VERSIONS: [ProtocolVersion; 5] = [
    ProtocolVersion::V1_4,
    ProtocolVersion::V1_3,
    ProtocolVersion::V1_2,
    ProtocolVersion::V1_1,
    ProtocolVersion::V1_0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub protocol_version: ProtocolVersion,
    pub batch_count: i32,
}

/// One already-decoded operation request within a batch.
///
/// `payload` is `None` when the transport layer recognized the operation tag
/// but carries no typed payload for it; the dispatcher turns that into an
/// `OperationNotSupported` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBatchItem {
    pub operation: Operation,
    pub unique_batch_item_id: Option<Vec<u8>>,
    pub payload: Option<RequestPayload>,
}

impl RequestBatchItem {
    /// Builds an item whose operation tag matches its payload.
    pub fn new(payload: RequestPayload) -> Self {
        Self {
            operation: payload.operation(),
            unique_batch_item_id: None,
            payload: Some(payload),
        }
    }

    /// Attaches a caller-supplied correlation id.
    pub fn with_id(mut self, id: impl Into<Vec<u8>>) -> Self {
        self.unique_batch_item_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub header: RequestHeader,
    pub batch_items: Vec<RequestBatchItem>,
}

impl RequestMessage {
    /// Builds a message with the batch count filled in from the item list.
    pub fn new(protocol_version: ProtocolVersion, batch_items: Vec<RequestBatchItem>) -> Self {
        Self {
            header: RequestHeader {
                protocol_version,
                batch_count: batch_items.len() as i32,
            },
            batch_items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub protocol_version: ProtocolVersion,
    pub batch_count: i32,
}

/// Result for one batch item. Operation tag and correlation id are echoed
/// even on failure so clients can always match results back to requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBatchItem {
    pub operation: Operation,
    pub unique_batch_item_id: Option<Vec<u8>>,
    pub result_status: ResultStatus,
    pub result_reason: Option<ResultReason>,
    pub result_message: Option<String>,
    pub payload: Option<ResponsePayload>,
}

impl ResponseBatchItem {
    pub fn success(item: &RequestBatchItem, payload: ResponsePayload) -> Self {
        Self {
            operation: item.operation,
            unique_batch_item_id: item.unique_batch_item_id.clone(),
            result_status: ResultStatus::Success,
            result_reason: None,
            result_message: None,
            payload: Some(payload),
        }
    }

    pub fn failure(item: &RequestBatchItem, error: &OperationError) -> Self {
        Self {
            operation: item.operation,
            unique_batch_item_id: item.unique_batch_item_id.clone(),
            result_status: ResultStatus::OperationFailed,
            result_reason: Some(error.reason),
            result_message: Some(error.message.clone()),
            payload: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result_status == ResultStatus::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub header: ResponseHeader,
    pub batch_items: Vec<ResponseBatchItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_versions_are_descending() {
        for pair in SUPPORTED_VERSIONS.windows(2) {
            assert!(pair[0].minor > pair[1].minor);
        }
        assert_eq!(SUPPORTED_VERSIONS[0], ProtocolVersion::V1_4);
        assert_eq!(SUPPORTED_VERSIONS[4], ProtocolVersion::V1_0);
    }

    #[test]
    fn test_request_message_counts_items() {
        let message = RequestMessage::new(
            ProtocolVersion::V1_2,
            vec![RequestBatchItem::new(RequestPayload::DiscoverVersions(
                Default::default(),
            ))],
        );
        assert_eq!(message.header.batch_count, 1);
        assert_eq!(message.header.protocol_version.to_string(), "1.2");
    }
}
