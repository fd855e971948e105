//! GetAttributes and GetAttributeList payloads.

use serde::{Deserialize, Serialize};

use crate::attributes::Attribute;
use crate::enums::AttributeName;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAttributesRequestPayload {
    pub unique_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAttributesResponsePayload {
    pub unique_identifier: String,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAttributeListRequestPayload {
    pub unique_identifier: String,
}

/// Only the identifiers of the attributes GetAttributes would return, with
/// `Name` listed once however many names the object carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAttributeListResponsePayload {
    pub unique_identifier: String,
    pub attribute_names: Vec<AttributeName>,
}
