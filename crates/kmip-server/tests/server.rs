//! End-to-end tests: client -> framing -> session loop -> dispatcher ->
//! repository, over in-memory streams.

use std::collections::HashSet;
use std::sync::Arc;

use kmip::client::KmipClient;
use kmip::{
    ActivateRequestPayload, Attribute, AttributeName, CreateRequestPayload,
    CryptographicAlgorithm, CryptographicObject, DestroyRequestPayload,
    DiscoverVersionsRequestPayload, GetAttributeListRequestPayload, GetAttributesRequestPayload,
    GetRequestPayload, LocateRequestPayload, Name, ObjectType, Operation, ProtocolVersion,
    RequestBatchItem, RequestMessage, RequestPayload, ResponsePayload, ResultReason, ResultStatus,
    State, SUPPORTED_VERSIONS,
};
use kmip_server::dispatch::Dispatcher;
use kmip_server::repository::Repository;
use kmip_server::server::serve_session;
use tokio::io::DuplexStream;
use tokio_util::sync::CancellationToken;

fn new_dispatcher() -> Arc<Dispatcher> {
    Arc::new(Dispatcher::new(Arc::new(Repository::new())))
}

/// Opens one client session against a spawned session loop, the same loop a
/// TLS connection would be served by.
fn start_session(
    dispatcher: &Arc<Dispatcher>,
    cancel: &CancellationToken,
) -> KmipClient<DuplexStream> {
    let (client_side, server_side) = tokio::io::duplex(64 * 1024);
    let dispatcher = Arc::clone(dispatcher);
    let cancel = cancel.clone();
    tokio::spawn(async move {
        let _ = serve_session(server_side, &dispatcher, &cancel).await;
    });
    KmipClient::new(client_side)
}

async fn create_key(
    client: &mut KmipClient<DuplexStream>,
    length: i32,
    name: Option<&str>,
) -> String {
    let mut template_attributes = vec![
        Attribute::CryptographicAlgorithm(CryptographicAlgorithm::Aes),
        Attribute::CryptographicLength(length),
    ];
    if let Some(name) = name {
        template_attributes.push(Attribute::Name(Name::text(name)));
    }

    let response = client
        .request(vec![RequestPayload::Create(CreateRequestPayload {
            object_type: ObjectType::SymmetricKey,
            template_attributes,
        })])
        .await
        .unwrap();

    let item = &response.batch_items[0];
    assert!(item.is_success(), "create failed: {:?}", item.result_message);
    match item.payload.as_ref().unwrap() {
        ResponsePayload::Create(payload) => payload.unique_identifier.clone(),
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn test_discover_versions() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());

    let response = client
        .request(vec![RequestPayload::DiscoverVersions(
            DiscoverVersionsRequestPayload::default(),
        )])
        .await
        .unwrap();

    let item = &response.batch_items[0];
    assert!(item.is_success());
    match item.payload.as_ref().unwrap() {
        ResponsePayload::DiscoverVersions(payload) => {
            assert_eq!(payload.protocol_versions, SUPPORTED_VERSIONS.to_vec());
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn test_create_then_get_for_every_key_length() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());

    for length in [128, 192, 256] {
        let id = create_key(&mut client, length, None).await;
        let response = client
            .request(vec![RequestPayload::Get(GetRequestPayload {
                unique_identifier: id,
            })])
            .await
            .unwrap();

        match response.batch_items[0].payload.as_ref().unwrap() {
            ResponsePayload::Get(payload) => match &payload.object {
                CryptographicObject::SymmetricKey(key) => {
                    assert_eq!(key.key_block.key_material.len(), (length / 8) as usize);
                }
                other => panic!("unexpected object: {other:?}"),
            },
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_attribute_list_after_create() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());
    let id = create_key(&mut client, 256, Some("k1")).await;

    let response = client
        .request(vec![RequestPayload::GetAttributeList(
            GetAttributeListRequestPayload {
                unique_identifier: id,
            },
        )])
        .await
        .unwrap();

    match response.batch_items[0].payload.as_ref().unwrap() {
        ResponsePayload::GetAttributeList(payload) => {
            assert_eq!(
                payload.attribute_names,
                vec![
                    AttributeName::State,
                    AttributeName::CryptographicAlgorithm,
                    AttributeName::CryptographicLength,
                    AttributeName::Name,
                ]
            );
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn test_destroyed_key_resolves_but_has_no_material() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());
    let id = create_key(&mut client, 256, Some("k1")).await;

    let response = client
        .request(vec![RequestPayload::Destroy(DestroyRequestPayload {
            unique_identifier: id.clone(),
        })])
        .await
        .unwrap();
    assert!(response.batch_items[0].is_success());

    // a second destroy also succeeds
    let response = client
        .request(vec![RequestPayload::Destroy(DestroyRequestPayload {
            unique_identifier: id.clone(),
        })])
        .await
        .unwrap();
    assert!(response.batch_items[0].is_success());

    let response = client
        .request(vec![RequestPayload::Get(GetRequestPayload {
            unique_identifier: id.clone(),
        })])
        .await
        .unwrap();
    let item = &response.batch_items[0];
    assert_eq!(item.result_status, ResultStatus::OperationFailed);
    assert_eq!(item.result_reason, Some(ResultReason::OperationNotSupported));

    let response = client
        .request(vec![RequestPayload::GetAttributes(
            GetAttributesRequestPayload {
                unique_identifier: id,
            },
        )])
        .await
        .unwrap();
    match response.batch_items[0].payload.as_ref().unwrap() {
        ResponsePayload::GetAttributes(payload) => {
            assert!(payload
                .attributes
                .contains(&Attribute::State(State::Destroyed)));
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn test_locate_unknown_name_is_empty_not_an_error() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());
    create_key(&mut client, 256, Some("k1")).await;

    let response = client
        .request(vec![RequestPayload::Locate(LocateRequestPayload {
            attributes: vec![Attribute::Name(Name::text("nonexistent"))],
        })])
        .await
        .unwrap();

    let item = &response.batch_items[0];
    assert!(item.is_success());
    match item.payload.as_ref().unwrap() {
        ResponsePayload::Locate(payload) => assert!(payload.unique_identifiers.is_empty()),
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn test_activate_flow() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());

    let response = client
        .request(vec![RequestPayload::Activate(ActivateRequestPayload {
            unique_identifier: "unknown-id".to_string(),
        })])
        .await
        .unwrap();
    assert_eq!(
        response.batch_items[0].result_reason,
        Some(ResultReason::ItemNotFound)
    );

    let id = create_key(&mut client, 256, Some("k1")).await;
    let response = client
        .request(vec![
            RequestPayload::Activate(ActivateRequestPayload {
                unique_identifier: id.clone(),
            }),
            RequestPayload::GetAttributes(GetAttributesRequestPayload {
                unique_identifier: id,
            }),
        ])
        .await
        .unwrap();

    assert!(response.batch_items[0].is_success());
    match response.batch_items[1].payload.as_ref().unwrap() {
        ResponsePayload::GetAttributes(payload) => {
            assert!(payload.attributes.contains(&Attribute::State(State::Active)));
        }
        other => panic!("unexpected payload: {other:?}"),
    }
}

#[tokio::test]
async fn test_batch_results_keep_request_order() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());

    let response = client
        .request(vec![
            RequestPayload::Get(GetRequestPayload {
                unique_identifier: "missing".to_string(),
            }),
            RequestPayload::DiscoverVersions(DiscoverVersionsRequestPayload::default()),
            RequestPayload::Locate(LocateRequestPayload::default()),
        ])
        .await
        .unwrap();

    assert_eq!(response.header.batch_count, 3);
    let operations: Vec<_> = response
        .batch_items
        .iter()
        .map(|item| item.operation)
        .collect();
    assert_eq!(
        operations,
        vec![Operation::Get, Operation::DiscoverVersions, Operation::Locate]
    );
    assert!(!response.batch_items[0].is_success());
    assert!(response.batch_items[1].is_success());
    assert!(response.batch_items[2].is_success());
}

#[tokio::test]
async fn test_unsupported_operation_tag_is_classified() {
    let dispatcher = new_dispatcher();
    let mut client = start_session(&dispatcher, &CancellationToken::new());

    let response = client
        .send(RequestMessage::new(
            ProtocolVersion::V1_0,
            vec![RequestBatchItem {
                operation: Operation::Query,
                unique_batch_item_id: Some(vec![42]),
                payload: None,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.header.protocol_version, ProtocolVersion::V1_0);
    let item = &response.batch_items[0];
    assert_eq!(item.operation, Operation::Query);
    assert_eq!(item.unique_batch_item_id.as_deref(), Some(&[42u8][..]));
    assert_eq!(item.result_reason, Some(ResultReason::OperationNotSupported));
}

#[tokio::test]
async fn test_cancelled_session_fails_items_explicitly() {
    let dispatcher = new_dispatcher();
    let cancel = CancellationToken::new();
    let mut client = start_session(&dispatcher, &cancel);
    cancel.cancel();

    let response = client
        .request(vec![
            RequestPayload::DiscoverVersions(DiscoverVersionsRequestPayload::default()),
            RequestPayload::Locate(LocateRequestPayload::default()),
        ])
        .await
        .unwrap();

    assert_eq!(response.batch_items.len(), 2);
    for item in &response.batch_items {
        assert_eq!(item.result_status, ResultStatus::OperationFailed);
        assert_eq!(item.result_reason, Some(ResultReason::GeneralFailure));
    }
}

#[tokio::test]
async fn test_concurrent_sessions_create_isolated_keys() {
    let dispatcher = new_dispatcher();
    let cancel = CancellationToken::new();

    let mut handles = Vec::new();
    for session in 0..8 {
        let mut client = start_session(&dispatcher, &cancel);
        handles.push(tokio::spawn(async move {
            let mut ids = Vec::new();
            for i in 0..8 {
                let name = format!("session-{session}-key-{i}");
                ids.push(create_key(&mut client, 256, Some(&name)).await);
            }
            ids
        }));
    }

    let mut all_ids = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(all_ids.insert(id), "identifier collision across sessions");
        }
    }
    assert_eq!(all_ids.len(), 64);

    // every object is independently retrievable afterwards
    let mut client = start_session(&dispatcher, &cancel);
    for id in all_ids {
        let response = client
            .request(vec![RequestPayload::Get(GetRequestPayload {
                unique_identifier: id,
            })])
            .await
            .unwrap();
        assert!(response.batch_items[0].is_success());
    }
}
