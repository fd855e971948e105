//! Attributes as exchanged via Create, Locate, GetAttributes and
//! GetAttributeList.

use serde::{Deserialize, Serialize};

use crate::enums::{AttributeName, CryptographicAlgorithm, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NameType {
    #[default]
    UninterpretedTextString,
    Uri,
}

/// A human-assigned object name. Not unique across objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub value: String,
    pub name_type: NameType,
}

impl Name {
    /// A name of the plain-text kind, which is all current clients send.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name_type: NameType::UninterpretedTextString,
        }
    }
}

/// One typed attribute value.
///
/// On the wire this is a name/value pair with a dynamically typed value;
/// decoded it becomes a closed union, so handlers match on it instead of
/// downcasting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    Name(Name),
    CryptographicAlgorithm(CryptographicAlgorithm),
    CryptographicLength(i32),
    State(State),
}

impl Attribute {
    /// The identifier this attribute is listed under in GetAttributeList.
    pub const fn attribute_name(&self) -> AttributeName {
        match self {
            Self::Name(_) => AttributeName::Name,
            Self::CryptographicAlgorithm(_) => AttributeName::CryptographicAlgorithm,
            Self::CryptographicLength(_) => AttributeName::CryptographicLength,
            Self::State(_) => AttributeName::State,
        }
    }
}
