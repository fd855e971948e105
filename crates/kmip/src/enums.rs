//! Protocol enumerations shared by requests, responses and attributes.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Operation tags the transport layer may deliver.
///
/// Only a subset is implemented by the dispatcher; the remaining tags exist
/// so a decoded request can name an operation the server refuses with
/// `OperationNotSupported` instead of choking during decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Operation {
    DiscoverVersions,
    Create,
    Register,
    Activate,
    Get,
    GetAttributes,
    GetAttributeList,
    Destroy,
    Locate,
    Query,
    Revoke,
    Check,
}

/// Kinds of managed objects. Only `SymmetricKey` is produced by the current
/// operation set; the other variants keep the vocabulary open for decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ObjectType {
    Certificate,
    SymmetricKey,
    PublicKey,
    PrivateKey,
    SecretData,
}

/// Lifecycle state of a managed object.
///
/// Transitions are monotonic: `PreActive` to `Active` to `Destroyed`, never
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum State {
    PreActive,
    Active,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum CryptographicAlgorithm {
    Aes,
    TripleDes,
    Rsa,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyFormatType {
    Raw,
    TransparentSymmetricKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    Success,
    OperationFailed,
}

/// Failure classification carried in a failed batch item result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ResultReason {
    ItemNotFound,
    OperationNotSupported,
    GeneralFailure,
}

/// Attribute identifiers, displayed under their protocol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AttributeName {
    #[strum(serialize = "Name")]
    Name,
    #[strum(serialize = "Cryptographic Algorithm")]
    CryptographicAlgorithm,
    #[strum(serialize = "Cryptographic Length")]
    CryptographicLength,
    #[strum(serialize = "State")]
    State,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names_display_as_protocol_names() {
        assert_eq!(
            AttributeName::CryptographicAlgorithm.to_string(),
            "Cryptographic Algorithm"
        );
        assert_eq!(AttributeName::State.to_string(), "State");
    }
}
