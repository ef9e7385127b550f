//! Request list reconciliation
//!
//! Replaces a client's whole request list in one atomic step. The owner of every written row
//! is the [`ClientIdentity`] produced by the identity gate; [`RequestItem`] has no owner field,
//! so nothing in a request body can redirect the write to another client.

use crate::db::{RequestStore, StoreError};
use crate::models::{Ack, RequestItem, RequestView};
use actix_middleware::ClientIdentity;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Body rejected before any storage access
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid data. \"requests\" must be an array.")]
    ShapeMismatch,

    /// An entry that is not a JSON object
    #[error("Invalid data. Request at position {index} is malformed.")]
    InvalidItem { index: usize, reason: String },
}

/// The atomic replacement failed and was rolled back; the previous list is intact
#[derive(Debug, Error)]
#[error("request list replacement for client {client_id} was rolled back")]
pub struct ReconciliationError {
    pub client_id: i32,
    #[source]
    pub source: StoreError,
}

#[derive(Clone)]
pub struct ReconciliationService {
    store: Arc<dyn RequestStore>,
}

impl ReconciliationService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }

    /// Check that `requests` is an array and decode its entries.
    ///
    /// Field values are not checked here: missing fields decode as `None`, scalars keep their
    /// text, and storage accepts or rejects them.
    pub fn parse_items(requests: &Value) -> Result<Vec<RequestItem>, ValidationError> {
        let entries = requests.as_array().ok_or(ValidationError::ShapeMismatch)?;

        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<RequestItem>(entry.clone()).map_err(|e| {
                    ValidationError::InvalidItem {
                        index,
                        reason: e.to_string(),
                    }
                })
            })
            .collect()
    }

    /// Replace every request owned by `owner` with `items`
    pub async fn reconcile(
        &self,
        owner: &ClientIdentity,
        items: Vec<RequestItem>,
    ) -> Result<Ack, ReconciliationError> {
        debug!(client_id = owner.id, item_count = items.len(), "Replacing request list");

        let removed = self
            .store
            .replace_all_for_owner(owner.id, &items)
            .await
            .map_err(|source| ReconciliationError {
                client_id: owner.id,
                source,
            })?;

        info!(
            client_id = owner.id,
            removed,
            inserted = items.len(),
            "Request list replaced"
        );

        Ok(Ack {
            client_id: owner.id,
            removed,
            inserted: items.len(),
        })
    }

    pub async fn list(&self, owner: &ClientIdentity) -> Result<Vec<RequestView>, StoreError> {
        self.store.list_by_owner(owner.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<(i32, usize)>>,
        fail: bool,
    }

    #[async_trait]
    impl RequestStore for RecordingStore {
        async fn list_by_owner(&self, _client_id: i32) -> Result<Vec<RequestView>, StoreError> {
            Ok(Vec::new())
        }

        async fn replace_all_for_owner(
            &self,
            client_id: i32,
            items: &[RequestItem],
        ) -> Result<u64, StoreError> {
            if self.fail {
                return Err(StoreError::ConstraintViolation("fk".into()));
            }
            self.calls.lock().unwrap().push((client_id, items.len()));
            Ok(1)
        }
    }

    fn owner(id: i32) -> ClientIdentity {
        ClientIdentity {
            id,
            email: format!("client{}@example.com", id),
        }
    }

    #[test]
    fn test_parse_items_rejects_non_arrays() {
        for value in [json!("not-an-array"), json!(null), json!({}), json!(3)] {
            assert_eq!(
                ReconciliationService::parse_items(&value),
                Err(ValidationError::ShapeMismatch)
            );
        }
    }

    #[test]
    fn test_parse_items_accepts_empty_and_partial_entries() {
        assert!(ReconciliationService::parse_items(&json!([]))
            .unwrap()
            .is_empty());

        let items = ReconciliationService::parse_items(&json!([
            { "servico_id": 2, "numero_solicitacao": "SRV-002" }
        ]))
        .unwrap();
        assert_eq!(items[0].servico_id.as_deref(), Some("2"));
        assert_eq!(items[0].data_pedido, None);
    }

    #[test]
    fn test_parse_items_ignores_owner_fields_in_body() {
        let items = ReconciliationService::parse_items(&json!([
            { "servico_id": 1, "cliente_id": 99, "id": 99 }
        ]))
        .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_parse_items_reports_non_object_entry() {
        let err = ReconciliationService::parse_items(&json!([
            { "servico_id": 1 },
            "SRV-002"
        ]))
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidItem { index: 1, .. }));
    }

    #[test]
    fn test_parse_items_leaves_field_types_to_storage() {
        let items = ReconciliationService::parse_items(&json!([
            { "servico_id": "2", "preco_cobrado": "150.00", "numero_solicitacao": 3 },
            { "servico_id": "two" }
        ]))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].preco_cobrado.as_deref(), Some("150.00"));
        assert_eq!(items[1].servico_id.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_reconcile_uses_authenticated_owner() {
        let store = Arc::new(RecordingStore::default());
        let service = ReconciliationService::new(store.clone());

        let ack = service
            .reconcile(&owner(7), vec![RequestItem::default(); 3])
            .await
            .unwrap();

        assert_eq!(ack.client_id, 7);
        assert_eq!(ack.inserted, 3);
        assert_eq!(*store.calls.lock().unwrap(), vec![(7, 3)]);
    }

    #[tokio::test]
    async fn test_reconcile_failure_is_single_error() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let service = ReconciliationService::new(store);

        let err = service
            .reconcile(&owner(7), vec![RequestItem::default()])
            .await
            .unwrap_err();
        assert_eq!(err.client_id, 7);
        assert!(matches!(err.source, StoreError::ConstraintViolation(_)));
    }
}
