use serde::{Deserialize, Serialize};

/// IT service catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CatalogService {
    pub id: i32,
    pub nome: String,
    pub preco: f64,
    pub prazo_dias: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogService {
    pub nome: String,
    pub preco: f64,
    pub prazo_dias: i32,
}
