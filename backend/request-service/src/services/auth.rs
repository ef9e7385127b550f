//! Client registration, login and password change

use crate::db::{ClientStore, CLIENT_CPF_CONSTRAINT, CLIENT_EMAIL_CONSTRAINT};
use crate::error::{AppError, Result, INTERNAL_ERROR_MESSAGE};
use crate::models::{ClientSummary, NewClient};
use crate::validators;
use chrono::{NaiveDate, Utc};
use crypto_core::{hash_password, verify_password, JwtCodec, PasswordError};
use error_types::summarize_validation_errors;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const CHANGE_PASSWORD_AUTH_FAILED: &str = "Authentication failed. Check login or current password.";
const EMAIL_TAKEN: &str = "This email is already registered.";
const CPF_TAKEN: &str = "This CPF is already registered.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub senha: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub login: String,
    pub senha_atual: String,
    pub nova_senha: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub senha: String,
    #[validate(length(min = 1))]
    pub nome: String,
    #[validate(length(min = 1))]
    pub cpf: String,
    #[validate(length(min = 1))]
    pub data_nascimento: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub estado_civil: Option<String>,
    #[serde(default)]
    pub escolaridade: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    clients: Arc<dyn ClientStore>,
    codec: Arc<JwtCodec>,
}

impl AuthService {
    pub fn new(clients: Arc<dyn ClientStore>, codec: Arc<JwtCodec>) -> Self {
        Self { clients, codec }
    }

    /// Verify credentials and issue a session token
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse> {
        let client = self
            .clients
            .find_by_email(req.login.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login attempt for unknown email");
                AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
            })?;

        if let Err(e) = check_password(req.senha, client.senha_hash.clone()).await? {
            warn!(client_id = client.id, error = %e, "Login rejected");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.codec.issue(client.id, &client.email).map_err(|e| {
            tracing::error!(client_id = client.id, error = %e, "Failed to issue token");
            AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
        })?;

        info!(client_id = client.id, "Client logged in");

        Ok(LoginResponse {
            id: client.id,
            nome: client.nome,
            email: client.email,
            token,
        })
    }

    /// Replace a client's password after re-checking the current one
    pub async fn change_password(&self, req: ChangePasswordRequest) -> Result<()> {
        let auth_failed = || AppError::Unauthorized(CHANGE_PASSWORD_AUTH_FAILED.to_string());

        let client = self
            .clients
            .find_by_email(req.login.trim())
            .await?
            .ok_or_else(auth_failed)?;

        if let Err(e) = check_password(req.senha_atual, client.senha_hash.clone()).await? {
            warn!(client_id = client.id, error = %e, "Password change rejected");
            return Err(auth_failed());
        }

        validators::validate_password(&req.nova_senha).map_err(AppError::BadRequest)?;

        let senha_hash = hash(req.nova_senha).await?;
        if !self
            .clients
            .update_password_hash(&client.email, &senha_hash)
            .await?
        {
            tracing::error!(client_id = client.id, "Password update matched no rows");
            return Err(AppError::Internal("Password update failed.".to_string()));
        }

        info!(client_id = client.id, "Password changed");
        Ok(())
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<ClientSummary> {
        self.register_on(req, Utc::now().date_naive()).await
    }

    /// Register a client, checking the age requirement against `today`
    pub async fn register_on(
        &self,
        req: RegisterRequest,
        today: NaiveDate,
    ) -> Result<ClientSummary> {
        let new_client = validate_registration(req, today)?;

        if self.clients.find_by_email(&new_client.email).await?.is_some() {
            return Err(AppError::BadRequest(EMAIL_TAKEN.to_string()));
        }

        let new_client = NewClient {
            senha_hash: hash(new_client.senha_hash).await?,
            ..new_client
        };

        match self.clients.create(new_client).await {
            Ok(created) => {
                info!(client_id = created.id, "Client registered");
                Ok(created)
            }
            Err(e) if e.is_unique_violation_of(CLIENT_CPF_CONSTRAINT) => {
                Err(AppError::BadRequest(CPF_TAKEN.to_string()))
            }
            Err(e) if e.is_unique_violation_of(CLIENT_EMAIL_CONSTRAINT) => {
                Err(AppError::BadRequest(EMAIL_TAKEN.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Validate a registration form. The returned `senha_hash` still holds the plain password.
fn validate_registration(req: RegisterRequest, today: NaiveDate) -> Result<NewClient> {
    req.validate().map_err(|e| {
        tracing::debug!(error = %e, "Registration rejected by field validation");
        AppError::BadRequest(summarize_validation_errors(&e))
    })?;

    validators::validate_password(&req.senha).map_err(AppError::BadRequest)?;
    validators::validate_full_name(&req.nome).map_err(|m| AppError::BadRequest(m.to_string()))?;

    let cpf = validators::normalize_cpf(&req.cpf)
        .ok_or_else(|| AppError::BadRequest("Invalid CPF.".to_string()))?;

    let data_nascimento = validators::parse_birth_date(&req.data_nascimento).ok_or_else(|| {
        AppError::BadRequest("Invalid date format. Please use DD/MM/YYYY.".to_string())
    })?;

    if validators::age_on(data_nascimento, today) < validators::MIN_CLIENT_AGE {
        return Err(AppError::BadRequest(
            "You must be at least 18 years old.".to_string(),
        ));
    }

    Ok(NewClient {
        email: req.email.trim().to_string(),
        senha_hash: req.senha,
        nome: req.nome.trim().to_string(),
        cpf,
        data_nascimento,
        telefone: req.telefone,
        estado_civil: req.estado_civil,
        escolaridade: req.escolaridade,
    })
}

// Argon2 is CPU-bound; keep it off the async workers.
async fn hash(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing failed");
            AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
        })
}

async fn check_password(
    password: String,
    senha_hash: String,
) -> Result<std::result::Result<(), PasswordError>> {
    tokio::task::spawn_blocking(move || verify_password(&password, &senha_hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
        })
}
