use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::AUTHORIZATION, StatusCode},
    web, Error, HttpMessage, HttpResponse, ResponseError,
};
use crypto_core::jwt::{JwtCodec, TokenError};
use error_types::ErrorResponse;
use futures::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified identity of the calling client, taken only from a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub id: i32,
    pub email: String,
}

/// Identity gate failures. Both render as HTTP 401 with the standard error envelope.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header, or one not of the form `Bearer <token>`
    #[error("Not authorized, no token")]
    Missing,

    /// Signature, expiry or structure check failed
    #[error("Not authorized, token failed")]
    Invalid(#[source] TokenError),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Authenticate a raw `Authorization` header value against the codec
pub fn authenticate(header: Option<&str>, codec: &JwtCodec) -> Result<ClientIdentity, AuthError> {
    let token = header
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::Missing)?;

    let claims = codec.verify(token).map_err(AuthError::Invalid)?;

    Ok(ClientIdentity {
        id: claims.id,
        email: claims.email,
    })
}

fn authenticate_request(
    req: &actix_web::HttpRequest,
    codec: &JwtCodec,
) -> Result<ClientIdentity, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    authenticate(header, codec).map_err(|e| {
        match &e {
            AuthError::Missing => {
                tracing::debug!(path = %req.path(), "Request without bearer token")
            }
            AuthError::Invalid(reason) => {
                tracing::warn!(path = %req.path(), error = %reason, "JWT validation failed")
            }
        }
        e
    })
}

/// JWT Authentication Middleware
///
/// Rejects the request with 401 before it reaches the wrapped service unless it carries a
/// valid bearer token; on success the [`ClientIdentity`] is stored in the request extensions.
pub struct JwtAuthMiddleware {
    codec: Arc<JwtCodec>,
}

impl JwtAuthMiddleware {
    pub fn new(codec: Arc<JwtCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = JwtAuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    service: Rc<S>,
    codec: Arc<JwtCodec>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate_request(req.request(), &self.codec) {
            Ok(identity) => {
                req.extensions_mut().insert(identity);
                let service = self.service.clone();
                Box::pin(async move {
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                })
            }
            Err(err) => {
                let response = req.into_response(err.error_response()).map_into_right_body();
                Box::pin(async move { Ok(response) })
            }
        }
    }
}

/// FromRequest implementation for ClientIdentity
///
/// Uses the identity stored by [`JwtAuthMiddleware`] when present; otherwise authenticates
/// the request itself with the `web::Data<JwtCodec>` registered on the app.
impl actix_web::FromRequest for ClientIdentity {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        if let Some(identity) = req.extensions().get::<ClientIdentity>() {
            return ready(Ok(identity.clone()));
        }

        let result = match req.app_data::<web::Data<JwtCodec>>() {
            Some(codec) => authenticate_request(req, codec),
            None => {
                tracing::error!("JwtCodec missing from app data; rejecting request");
                Err(AuthError::Missing)
            }
        };
        ready(result)
    }
}
