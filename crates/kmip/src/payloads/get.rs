use serde::{Deserialize, Serialize};

use crate::enums::ObjectType;
use crate::key_block::CryptographicObject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRequestPayload {
    pub unique_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponsePayload {
    pub object_type: ObjectType,
    pub unique_identifier: String,
    pub object: CryptographicObject,
}
