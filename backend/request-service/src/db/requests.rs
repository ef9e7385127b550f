use super::StoreError;
use crate::models::{RequestItem, RequestView};
use async_trait::async_trait;
use db_pool::run_in_transaction;
use sqlx::PgPool;
use tracing::debug;

/// Persisted per-client service requests
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Requests owned by `client_id`, joined with the catalog, oldest order date first
    async fn list_by_owner(&self, client_id: i32) -> Result<Vec<RequestView>, StoreError>;

    /// Atomically replace every request owned by `client_id` with `items`.
    ///
    /// Returns the number of rows removed. On error nothing is changed.
    async fn replace_all_for_owner(
        &self,
        client_id: i32,
        items: &[RequestItem],
    ) -> Result<u64, StoreError>;
}

pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const LIST_BY_OWNER: &str = r#"
    SELECT
        sr.id AS solicitacao_id,
        sr.data_pedido,
        sr.numero_solicitacao,
        sr.status,
        sr.data_prevista,
        st.nome AS servico_nome,
        st.preco::FLOAT8 AS servico_preco
    FROM solicitacao_servico sr
    JOIN servico_ti st ON sr.servico_id = st.id
    WHERE sr.cliente_id = $1
    ORDER BY sr.data_pedido ASC, sr.id ASC
"#;

const DELETE_BY_OWNER: &str = "DELETE FROM solicitacao_servico WHERE cliente_id = $1";

// Serializes replacements of the same owner's list until commit or rollback
const LOCK_OWNER: &str = "SELECT pg_advisory_xact_lock($1, $2)";

/// Advisory lock class for request-list replacements; the owner id is the second key
const REQUEST_LIST_LOCK_CLASS: i32 = 0x5245_5153;

// Item fields arrive as text and are cast here so malformed values fail inside the transaction.
const INSERT_FOR_OWNER: &str = r#"
    INSERT INTO solicitacao_servico (
        cliente_id, servico_id, data_pedido, numero_solicitacao, status, preco_cobrado, data_prevista
    ) VALUES ($1, $2::INTEGER, $3::DATE, $4, $5, $6::NUMERIC, $7::DATE)
"#;

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn list_by_owner(&self, client_id: i32) -> Result<Vec<RequestView>, StoreError> {
        let rows = sqlx::query_as::<_, RequestView>(LIST_BY_OWNER)
            .bind(client_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn replace_all_for_owner(
        &self,
        client_id: i32,
        items: &[RequestItem],
    ) -> Result<u64, StoreError> {
        let items = items.to_vec();

        run_in_transaction(&self.pool, move |conn| {
            Box::pin(async move {
                sqlx::query(LOCK_OWNER)
                    .bind(REQUEST_LIST_LOCK_CLASS)
                    .bind(client_id)
                    .execute(&mut *conn)
                    .await?;

                let removed = sqlx::query(DELETE_BY_OWNER)
                    .bind(client_id)
                    .execute(&mut *conn)
                    .await?
                    .rows_affected();

                for item in items {
                    sqlx::query(INSERT_FOR_OWNER)
                        .bind(client_id)
                        .bind(item.servico_id)
                        .bind(item.data_pedido)
                        .bind(item.numero_solicitacao)
                        .bind(item.status)
                        .bind(item.preco_cobrado)
                        .bind(item.data_prevista)
                        .execute(&mut *conn)
                        .await?;
                }

                debug!(client_id, removed, "Request list replaced inside transaction");
                Ok::<_, StoreError>(removed)
            })
        })
        .await
    }
}
