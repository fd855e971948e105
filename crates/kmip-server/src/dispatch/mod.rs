//! Batch dispatch: one decoded request in, one response out.

pub mod handlers;

use std::sync::Arc;

use kmip::{
    OperationError, RequestBatchItem, RequestMessage, RequestPayload, ResponseBatchItem,
    ResponseHeader, ResponseMessage, ResponsePayload,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::repository::Repository;

/// Executes operation batches against the repository.
///
/// Items are processed strictly in arrival order; each yields exactly one
/// result and a failure never spills over to its siblings.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    repository: Arc<Repository>,
}

impl Dispatcher {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }

    /// Processes one batch, echoing the protocol version and batch count.
    pub fn dispatch(
        &self,
        cancel: &CancellationToken,
        request: RequestMessage,
    ) -> ResponseMessage {
        let header = ResponseHeader {
            protocol_version: request.header.protocol_version,
            batch_count: request.header.batch_count,
        };

        let mut batch_items = Vec::with_capacity(request.batch_items.len());
        for item in &request.batch_items {
            // A cancelled session still gets an explicit result per item.
            if cancel.is_cancelled() {
                let error = OperationError::general("request processing canceled");
                batch_items.push(ResponseBatchItem::failure(item, &error));
                continue;
            }

            batch_items.push(match self.process_item(item) {
                Ok(payload) => ResponseBatchItem::success(item, payload),
                Err(error) => {
                    debug!(
                        target: "kmip::dispatch",
                        operation = %item.operation,
                        item_id = ?item.unique_batch_item_id.as_deref().map(hex::encode),
                        reason = %error.reason,
                        error = %error,
                        "batch item failed"
                    );
                    ResponseBatchItem::failure(item, &error)
                }
            });
        }

        ResponseMessage {
            header,
            batch_items,
        }
    }

    fn process_item(&self, item: &RequestBatchItem) -> Result<ResponsePayload, OperationError> {
        let payload = match &item.payload {
            Some(payload) if payload.operation() == item.operation => payload,
            Some(payload) => {
                return Err(OperationError::general(format!(
                    "payload for {} does not match operation {}",
                    payload.operation(),
                    item.operation
                )));
            }
            None => {
                return Err(OperationError::operation_not_supported(format!(
                    "operation {} is not supported",
                    item.operation
                )));
            }
        };

        let repository = self.repository.as_ref();
        match payload {
            RequestPayload::DiscoverVersions(req) => Ok(handlers::discover_versions(req)),
            RequestPayload::Create(req) => handlers::create(repository, req),
            RequestPayload::Register(req) => handlers::register(repository, req),
            RequestPayload::Activate(req) => handlers::activate(repository, req),
            RequestPayload::Get(req) => handlers::get(repository, req),
            RequestPayload::GetAttributes(req) => handlers::get_attributes(repository, req),
            RequestPayload::GetAttributeList(req) => {
                handlers::get_attribute_list(repository, req)
            }
            RequestPayload::Destroy(req) => handlers::destroy(repository, req),
            RequestPayload::Locate(req) => Ok(handlers::locate(repository, req)),
        }
    }
}
