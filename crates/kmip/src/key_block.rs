//! Key material and the objects that carry it.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::enums::{CryptographicAlgorithm, KeyFormatType, ObjectType};

/// Raw symmetric key bytes.
///
/// Zeroized on drop and redacted from `Debug` output; the bytes only leave
/// the process inside a Get response payload.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial(Vec<u8>);

impl KeyMaterial {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for KeyMaterial {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial([REDACTED; {}])", self.0.len())
    }
}

/// Key bytes plus the metadata the protocol carries alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBlock {
    pub key_format_type: KeyFormatType,
    pub cryptographic_algorithm: CryptographicAlgorithm,
    pub cryptographic_length: i32,
    pub key_material: KeyMaterial,
}

impl KeyBlock {
    pub fn transparent_symmetric(
        algorithm: CryptographicAlgorithm,
        length: i32,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            key_format_type: KeyFormatType::TransparentSymmetricKey,
            cryptographic_algorithm: algorithm,
            cryptographic_length: length,
            key_material: KeyMaterial::new(bytes),
        }
    }
}

/// A symmetric key as it appears in Register and Get payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymmetricKey {
    pub key_block: KeyBlock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretData {
    pub key_block: KeyBlock,
}

/// The cryptographic objects a client can submit or retrieve.
///
/// Register accepts only the `SymmetricKey` variant today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryptographicObject {
    SymmetricKey(SymmetricKey),
    SecretData(SecretData),
}

impl CryptographicObject {
    pub const fn object_type(&self) -> ObjectType {
        match self {
            Self::SymmetricKey(_) => ObjectType::SymmetricKey,
            Self::SecretData(_) => ObjectType::SecretData,
        }
    }
}
