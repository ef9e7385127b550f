use super::StoreError;
use crate::models::{Client, ClientSummary, NewClient};
use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, StoreError>;

    async fn create(&self, client: NewClient) -> Result<ClientSummary, StoreError>;

    /// Returns false when no client has this email
    async fn update_password_hash(&self, email: &str, senha_hash: &str)
        -> Result<bool, StoreError>;
}

pub struct PgClientStore {
    pool: PgPool,
}

impl PgClientStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClientStore for PgClientStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, StoreError> {
        let client = sqlx::query_as::<_, Client>(
            "SELECT id, email, senha_hash, nome, cpf FROM cliente WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(client)
    }

    async fn create(&self, client: NewClient) -> Result<ClientSummary, StoreError> {
        let created = sqlx::query_as::<_, ClientSummary>(
            r#"
            INSERT INTO cliente (
                email, senha_hash, nome, cpf, data_nascimento, telefone, estado_civil, escolaridade
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, email, nome
            "#,
        )
        .bind(&client.email)
        .bind(&client.senha_hash)
        .bind(&client.nome)
        .bind(&client.cpf)
        .bind(client.data_nascimento)
        .bind(&client.telefone)
        .bind(&client.estado_civil)
        .bind(&client.escolaridade)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_password_hash(
        &self,
        email: &str,
        senha_hash: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE cliente SET senha_hash = $1 WHERE email = $2")
            .bind(senha_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
