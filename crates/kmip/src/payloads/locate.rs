use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;

/// Locate filters on the first `Name` attribute, if any. Without a filter
/// the match list is empty; there is no wildcard behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateRequestPayload {
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocateResponsePayload {
    pub unique_identifiers: Vec<String>,
}
