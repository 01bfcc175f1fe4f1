//! Scope guard middleware.
//!
//! Placed on individual routes by the `route!` macro. It reads the [`JwtClaims`] that the bearer
//! middleware attached to the request and checks them against the scopes the route requires.
//! The check uses OR semantics: a token need only hold one of the listed scopes. A valid token
//! without a matching scope gets a 403, as distinct from the 401s the bearer middleware produces.
use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    Error,
    HttpMessage,
};
use customer_api_engine::db_types::Scope;
use futures::future::{ok, Ready};

use crate::{auth::JwtClaims, errors::{AuthError, ServerError}};

pub struct AclMiddlewareFactory {
    required_scopes: Vec<Scope>,
}

impl AclMiddlewareFactory {
    pub fn new(required_scopes: &[Scope]) -> Self {
        AclMiddlewareFactory { required_scopes: required_scopes.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_scopes: self.required_scopes.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_scopes: Vec<Scope>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let required_scopes = self.required_scopes.clone();
        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<JwtClaims>()
                .ok_or_else(|| {
                    log::warn!("No JWT claims found in request extensions");
                    ErrorInternalServerError("No JWT claims found in request extensions")
                })?
                .clone();
            if claims.has_any_scope(&required_scopes) {
                service.call(req).await
            } else {
                let wanted = required_scopes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
                let err = AuthError::InsufficientScope(format!("The token holds none of the scopes [{wanted}]"));
                Err(ServerError::AuthenticationError(err).into())
            }
        })
    }
}
