use chrono::NaiveDate;
use serde::Serialize;

/// Stored client row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Client {
    pub id: i32,
    pub email: String,
    pub senha_hash: String,
    pub nome: String,
    pub cpf: String,
}

/// Public part of a client returned after registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ClientSummary {
    pub id: i32,
    pub email: String,
    pub nome: String,
}

/// Validated registration data, password already hashed
#[derive(Debug, Clone)]
pub struct NewClient {
    pub email: String,
    pub senha_hash: String,
    pub nome: String,
    pub cpf: String,
    pub data_nascimento: NaiveDate,
    pub telefone: Option<String>,
    pub estado_civil: Option<String>,
    pub escolaridade: Option<String>,
}
