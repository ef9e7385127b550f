use crate::db::ServiceCatalog;
use crate::error::{AppError, Result};
use crate::models::{CatalogService, NewCatalogService};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub preco: Option<f64>,
    #[serde(default)]
    pub prazo_dias: Option<i32>,
}

impl CreateServiceRequest {
    pub fn validate(self) -> Result<NewCatalogService> {
        let (nome, preco, prazo_dias) = match (self.nome, self.preco, self.prazo_dias) {
            (Some(nome), Some(preco), Some(prazo_dias)) if !nome.trim().is_empty() => {
                (nome.trim().to_string(), preco, prazo_dias)
            }
            _ => return Err(AppError::BadRequest("All fields are required.".to_string())),
        };

        if !preco.is_finite() || preco <= 0.0 {
            return Err(AppError::BadRequest(
                "Price must be greater than zero.".to_string(),
            ));
        }
        if prazo_dias <= 0 {
            return Err(AppError::BadRequest(
                "Lead time must be at least one day.".to_string(),
            ));
        }

        Ok(NewCatalogService {
            nome,
            preco,
            prazo_dias,
        })
    }
}

pub async fn list_services(catalog: &dyn ServiceCatalog) -> Result<Vec<CatalogService>> {
    Ok(catalog.list().await?)
}

pub async fn create_service(
    catalog: &dyn ServiceCatalog,
    req: CreateServiceRequest,
    created_by: i32,
) -> Result<CatalogService> {
    let service = catalog.create(req.validate()?).await?;
    info!(service_id = service.id, created_by, "Catalog service created");
    Ok(service)
}
