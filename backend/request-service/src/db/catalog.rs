use super::StoreError;
use crate::models::{CatalogService, NewCatalogService};
use async_trait::async_trait;
use sqlx::PgPool;

/// IT service catalog
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// All services ordered by name
    async fn list(&self) -> Result<Vec<CatalogService>, StoreError>;

    async fn create(&self, service: NewCatalogService) -> Result<CatalogService, StoreError>;
}

pub struct PgServiceCatalog {
    pool: PgPool,
}

impl PgServiceCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceCatalog for PgServiceCatalog {
    async fn list(&self) -> Result<Vec<CatalogService>, StoreError> {
        let services = sqlx::query_as::<_, CatalogService>(
            "SELECT id, nome, preco::FLOAT8 AS preco, prazo_dias FROM servico_ti ORDER BY nome",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    async fn create(&self, service: NewCatalogService) -> Result<CatalogService, StoreError> {
        let created = sqlx::query_as::<_, CatalogService>(
            r#"
            INSERT INTO servico_ti (nome, preco, prazo_dias)
            VALUES ($1, $2::NUMERIC, $3)
            RETURNING id, nome, preco::FLOAT8 AS preco, prazo_dias
            "#,
        )
        .bind(&service.nome)
        .bind(service.preco)
        .bind(service.prazo_dias)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
