//! Typed operation payloads, one module per operation group.

mod activate;
mod attribute_ops;
mod create;
mod destroy;
mod discover;
mod get;
mod locate;
mod register;

pub use activate::*;
pub use attribute_ops::*;
pub use create::*;
pub use destroy::*;
pub use discover::*;
pub use get::*;
pub use locate::*;
pub use register::*;

use serde::{Deserialize, Serialize};

use crate::enums::Operation;

/// Decoded request payload for one batch item.
///
/// A closed sum keyed by operation, so handler dispatch is an exhaustive
/// match rather than a runtime type assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPayload {
    DiscoverVersions(DiscoverVersionsRequestPayload),
    Create(CreateRequestPayload),
    Register(RegisterRequestPayload),
    Activate(ActivateRequestPayload),
    Get(GetRequestPayload),
    GetAttributes(GetAttributesRequestPayload),
    GetAttributeList(GetAttributeListRequestPayload),
    Destroy(DestroyRequestPayload),
    Locate(LocateRequestPayload),
}

impl RequestPayload {
    /// The operation tag this payload belongs to.
    pub const fn operation(&self) -> Operation {
        match self {
            Self::DiscoverVersions(_) => Operation::DiscoverVersions,
            Self::Create(_) => Operation::Create,
            Self::Register(_) => Operation::Register,
            Self::Activate(_) => Operation::Activate,
            Self::Get(_) => Operation::Get,
            Self::GetAttributes(_) => Operation::GetAttributes,
            Self::GetAttributeList(_) => Operation::GetAttributeList,
            Self::Destroy(_) => Operation::Destroy,
            Self::Locate(_) => Operation::Locate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsePayload {
    DiscoverVersions(DiscoverVersionsResponsePayload),
    Create(CreateResponsePayload),
    Register(RegisterResponsePayload),
    Activate(ActivateResponsePayload),
    Get(GetResponsePayload),
    GetAttributes(GetAttributesResponsePayload),
    GetAttributeList(GetAttributeListResponsePayload),
    Destroy(DestroyResponsePayload),
    Locate(LocateResponsePayload),
}

impl ResponsePayload {
    pub const fn operation(&self) -> Operation {
        match self {
            Self::DiscoverVersions(_) => Operation::DiscoverVersions,
            Self::Create(_) => Operation::Create,
            Self::Register(_) => Operation::Register,
            Self::Activate(_) => Operation::Activate,
            Self::Get(_) => Operation::Get,
            Self::GetAttributes(_) => Operation::GetAttributes,
            Self::GetAttributeList(_) => Operation::GetAttributeList,
            Self::Destroy(_) => Operation::Destroy,
            Self::Locate(_) => Operation::Locate,
        }
    }
}
