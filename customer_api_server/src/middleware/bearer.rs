//! Bearer-token middleware.
//!
//! This middleware wraps the authenticated part of the API. It extracts the
//! `Authorization: Bearer <token>` header, verifies the token's signature and expiry against the
//! process-wide key, and attaches the resulting [`JwtClaims`] to the request extensions so that
//! the per-route scope guard and the handlers can use them. Scope checks are left to the
//! [`super::AclMiddlewareFactory`] on each route.
use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::debug;

use crate::{
    auth::{bearer_token, TokenVerifier},
    errors::ServerError,
};

pub struct BearerAuthMiddlewareFactory {
    verifier: TokenVerifier,
}

impl BearerAuthMiddlewareFactory {
    pub fn new(verifier: TokenVerifier) -> Self {
        BearerAuthMiddlewareFactory { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = BearerAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(BearerAuthMiddlewareService { verifier: self.verifier.clone(), service: Rc::new(service) })
    }
}

pub struct BearerAuthMiddlewareService<S> {
    verifier: TokenVerifier,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = self.verifier.clone();
        Box::pin(async move {
            let raw_token =
                bearer_token(req.request()).map_err(|e| Error::from(ServerError::AuthenticationError(e)))?;
            let claims = verifier.verify(raw_token, &[]).map_err(|e| {
                debug!("🔐️ Rejected bearer token: {e}");
                Error::from(ServerError::AuthenticationError(e))
            })?;
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
