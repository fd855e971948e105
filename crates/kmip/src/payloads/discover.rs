use serde::{Deserialize, Serialize};

use crate::message::ProtocolVersion;

/// The client may offer the versions it prefers; the server ignores the
/// offer and always answers with its full supported list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverVersionsRequestPayload {
    pub protocol_versions: Vec<ProtocolVersion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverVersionsResponsePayload {
    pub protocol_versions: Vec<ProtocolVersion>,
}
