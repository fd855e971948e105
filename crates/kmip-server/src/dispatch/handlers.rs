//! One function per supported operation.
//!
//! Handlers translate a typed payload into repository calls and either a
//! response payload or a typed failure. They are deliberately permissive
//! about lifecycle state: Activate on an already-active object succeeds,
//! and Get works in any state that still has key material.

use kmip::{
    ActivateRequestPayload, ActivateResponsePayload, Attribute, AttributeName,
    CreateRequestPayload, CreateResponsePayload, CryptographicAlgorithm, CryptographicObject,
    DestroyRequestPayload, DestroyResponsePayload, DiscoverVersionsRequestPayload,
    DiscoverVersionsResponsePayload, GetAttributeListRequestPayload,
    GetAttributeListResponsePayload, GetAttributesRequestPayload, GetAttributesResponsePayload,
    GetRequestPayload, GetResponsePayload, KeyBlock, LocateRequestPayload, LocateResponsePayload,
    ObjectType, OperationError, RegisterRequestPayload, RegisterResponsePayload, ResponsePayload,
    SymmetricKey, SUPPORTED_VERSIONS,
};
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::repository::{ManagedObject, Repository};

/// Stateless; always succeeds with the fixed descending version list.
pub fn discover_versions(_req: &DiscoverVersionsRequestPayload) -> ResponsePayload {
    ResponsePayload::DiscoverVersions(DiscoverVersionsResponsePayload {
        protocol_versions: SUPPORTED_VERSIONS.to_vec(),
    })
}

/// Generates a fresh AES key and stores it in `PreActive` state.
///
/// Nothing is inserted unless every check and the key generation succeed.
pub fn create(
    repository: &Repository,
    req: &CreateRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    if req.object_type != ObjectType::SymmetricKey {
        return Err(OperationError::operation_not_supported(
            "only SymmetricKey objects can be created",
        ));
    }

    let mut algorithm = CryptographicAlgorithm::Aes;
    let mut length: i32 = 256;
    let mut names = Vec::new();
    for attribute in &req.template_attributes {
        match attribute {
            Attribute::CryptographicAlgorithm(a) => algorithm = *a,
            Attribute::CryptographicLength(l) => length = *l,
            Attribute::Name(n) => names.push(n.clone()),
            // not client-settable; ignored like any other unexpected
            // template entry
            Attribute::State(_) => {}
        }
    }

    if algorithm != CryptographicAlgorithm::Aes {
        return Err(OperationError::operation_not_supported(
            "only AES is supported",
        ));
    }
    if !matches!(length, 128 | 192 | 256) {
        return Err(OperationError::general(format!(
            "invalid AES length: {length} (128/192/256)"
        )));
    }

    let mut key_bytes = vec![0u8; (length / 8) as usize];
    OsRng
        .try_fill_bytes(&mut key_bytes)
        .map_err(|e| OperationError::general(format!("key generation failed: {e}")))?;

    let object = ManagedObject::pre_active(
        ObjectType::SymmetricKey,
        names,
        KeyBlock::transparent_symmetric(algorithm, length, key_bytes),
    );
    let unique_identifier = object.id.clone();
    repository.insert(object);

    Ok(ResponsePayload::Create(CreateResponsePayload {
        object_type: ObjectType::SymmetricKey,
        unique_identifier,
    }))
}

/// Stores caller-supplied key material verbatim in `PreActive` state.
pub fn register(
    repository: &Repository,
    req: &RegisterRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    match &req.object {
        CryptographicObject::SymmetricKey(key) => {
            let object = ManagedObject::pre_active(
                ObjectType::SymmetricKey,
                Vec::new(),
                key.key_block.clone(),
            );
            let unique_identifier = object.id.clone();
            repository.insert(object);
            Ok(ResponsePayload::Register(RegisterResponsePayload {
                unique_identifier,
            }))
        }
        other => Err(OperationError::operation_not_supported(format!(
            "Register supports only SymmetricKey, got {}",
            other.object_type()
        ))),
    }
}

pub fn activate(
    repository: &Repository,
    req: &ActivateRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    if !repository.activate(&req.unique_identifier) {
        return Err(OperationError::item_not_found("object not found"));
    }
    Ok(ResponsePayload::Activate(ActivateResponsePayload {
        unique_identifier: req.unique_identifier.clone(),
    }))
}

/// Returns the key material wrapped as a symmetric key. A destroyed object
/// still resolves, but no longer has material to hand out.
pub fn get(
    repository: &Repository,
    req: &GetRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    let object = repository
        .get(&req.unique_identifier)
        .ok_or_else(|| OperationError::item_not_found("object not found"))?;

    let key_block = match (object.object_type, object.key_block) {
        (ObjectType::SymmetricKey, Some(key_block)) => key_block,
        _ => {
            return Err(OperationError::operation_not_supported(
                "only SymmetricKey with key material can be fetched",
            ));
        }
    };

    Ok(ResponsePayload::Get(GetResponsePayload {
        object_type: ObjectType::SymmetricKey,
        unique_identifier: object.id,
        object: CryptographicObject::SymmetricKey(SymmetricKey { key_block }),
    }))
}

pub fn get_attributes(
    repository: &Repository,
    req: &GetAttributesRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    let object = repository
        .get(&req.unique_identifier)
        .ok_or_else(|| OperationError::item_not_found("object not found"))?;

    let mut attributes = vec![Attribute::State(object.state)];
    if let Some(key_block) = &object.key_block {
        attributes.push(Attribute::CryptographicAlgorithm(
            key_block.cryptographic_algorithm,
        ));
        attributes.push(Attribute::CryptographicLength(
            key_block.cryptographic_length,
        ));
    }
    attributes.extend(object.names.iter().cloned().map(Attribute::Name));

    Ok(ResponsePayload::GetAttributes(GetAttributesResponsePayload {
        unique_identifier: object.id,
        attributes,
    }))
}

/// Names of the attributes [`get_attributes`] would return: state always,
/// algorithm and length while material is present, `Name` if any assigned.
pub fn get_attribute_list(
    repository: &Repository,
    req: &GetAttributeListRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    let object = repository
        .get(&req.unique_identifier)
        .ok_or_else(|| OperationError::item_not_found("object not found"))?;

    let mut attribute_names = vec![AttributeName::State];
    if object.key_block.is_some() {
        attribute_names.push(AttributeName::CryptographicAlgorithm);
        attribute_names.push(AttributeName::CryptographicLength);
    }
    if !object.names.is_empty() {
        attribute_names.push(AttributeName::Name);
    }

    Ok(ResponsePayload::GetAttributeList(
        GetAttributeListResponsePayload {
            unique_identifier: object.id,
            attribute_names,
        },
    ))
}

pub fn destroy(
    repository: &Repository,
    req: &DestroyRequestPayload,
) -> Result<ResponsePayload, OperationError> {
    if !repository.destroy(&req.unique_identifier) {
        return Err(OperationError::item_not_found("object not found"));
    }
    Ok(ResponsePayload::Destroy(DestroyResponsePayload {
        unique_identifier: req.unique_identifier.clone(),
    }))
}

/// Never fails: an absent name filter yields an empty match list rather
/// than matching everything.
pub fn locate(repository: &Repository, req: &LocateRequestPayload) -> ResponsePayload {
    let name = req.attributes.iter().find_map(|attribute| match attribute {
        Attribute::Name(name) => Some(name.value.as_str()),
        _ => None,
    });
    let unique_identifiers = match name {
        Some(name) => repository.locate_by_name(name),
        None => Vec::new(),
    };
    ResponsePayload::Locate(LocateResponsePayload { unique_identifiers })
}
