use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::enums::ObjectType;
use crate::key_block::CryptographicObject;

/// The object is stored verbatim; template attributes are accepted on the
/// wire but not applied to the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequestPayload {
    pub object_type: ObjectType,
    pub template_attributes: Vec<Attribute>,
    pub object: CryptographicObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponsePayload {
    pub unique_identifier: String,
}
