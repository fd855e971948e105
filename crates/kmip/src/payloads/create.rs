use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::enums::ObjectType;

/// Template attributes may carry the algorithm, length and any names;
/// whatever is omitted falls back to the server defaults (AES, 256).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequestPayload {
    pub object_type: ObjectType,
    pub template_attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateResponsePayload {
    pub object_type: ObjectType,
    pub unique_identifier: String,
}
