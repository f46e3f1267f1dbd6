use actix_web::dev::{Payload, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use actix_service::{forward_ready, Service};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::Role;
use crate::token::{SessionPayload, TokenService};

/// Who is making the request. Resolved once per request by `IdentityMiddleware`.
#[derive(Debug, Clone, PartialEq)]
pub enum Identity {
    Authenticated(SessionPayload),
    Anonymous,
}

impl Identity {
    pub fn require_user(&self) -> Result<&SessionPayload, ApiError> {
        match self {
            Identity::Authenticated(payload) => Ok(payload),
            Identity::Anonymous => Err(ApiError::Unauthorized),
        }
    }

    pub fn require_admin(&self) -> Result<&SessionPayload, ApiError> {
        let payload = self.require_user()?;
        if payload.role != Role::Admin {
            return Err(ApiError::Forbidden);
        }
        Ok(payload)
    }
}

impl FromRequest for Identity {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ok(req
            .extensions()
            .get::<Identity>()
            .cloned()
            .unwrap_or(Identity::Anonymous))
    }
}

/// The token after `Bearer ` in the Authorization header, if any.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

pub fn resolve_identity(headers: &HeaderMap, tokens: &TokenService) -> Identity {
    match extract_token(headers).map(|token| tokens.verify(token)) {
        Some(Ok(payload)) => Identity::Authenticated(payload),
        Some(Err(_)) | None => Identity::Anonymous,
    }
}

// Middleware factory
pub struct IdentityMiddleware {
    tokens: Arc<TokenService>,
}

impl IdentityMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        IdentityMiddleware { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = IdentityMiddlewareService<S>;
    type InitError = ();

    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(IdentityMiddlewareService {
            service: Rc::new(service),
            tokens: self.tokens.clone(),
        })
    }
}

pub struct IdentityMiddlewareService<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Never rejects; handlers decide whether anonymous access is allowed.
        let identity = resolve_identity(req.headers(), &self.tokens);
        req.extensions_mut().insert(identity);

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}
