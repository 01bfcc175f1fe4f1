use actix_web::{body, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use cas_common::Secret;
use chrono::{DateTime, Utc};
use customer_api_engine::{db_types::Scope, ClientRegistry};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    auth::{JwtClaims, TokenIssuer, TokenVerifier, TOKEN_ISSUER},
    config::AuthConfig,
    middleware::BearerAuthMiddlewareFactory,
    routes::token,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this key anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_signing_key: Secret::new("0123456789abcdef0123456789abcdef".to_string()) }
}

/// Signs a token for `client_id` directly, bypassing the token endpoint, so that tests can mint
/// tokens with arbitrary scopes and expiry times.
pub fn issue_token(client_id: &str, scopes: &[Scope], expiry: DateTime<Utc>) -> String {
    let claims = JwtClaims {
        iss: TOKEN_ISSUER.to_string(),
        sub: client_id.to_string(),
        client_id: client_id.to_string(),
        iat: Utc::now().timestamp(),
        exp: expiry.timestamp(),
        scopes: scopes.to_vec(),
        jti: "test-token".to_string(),
    };
    sign_claims(&claims)
}

fn sign_claims(claims: &JwtClaims) -> String {
    let b64 = |data: &[u8]| base64::encode_config(data, base64::URL_SAFE_NO_PAD);
    let header = b64(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = b64(&serde_json::to_vec(claims).unwrap());
    let content = format!("{header}.{payload}");
    let config = get_auth_config();
    let mut mac = Hmac::<Sha256>::new_from_slice(config.jwt_signing_key.reveal().as_bytes()).unwrap();
    mac.update(content.as_bytes());
    format!("{content}.{}", b64(&mac.finalize().into_bytes()))
}

/// Sends a request against an app that mirrors the production layout: the configured routes live
/// under a `/v3` scope wrapped with the bearer middleware. Auth failures surface as service
/// errors; they are rendered into responses here so every test sees (status, body).
pub async fn send_request<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where F: FnOnce(&mut ServiceConfig) {
    let verifier = TokenVerifier::new(&get_auth_config());
    let scope = web::scope("/v3").wrap(BearerAuthMiddlewareFactory::new(verifier)).configure(configure);
    let app = App::new().service(scope);
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let bytes = test::read_body(res).await;
            (status, String::from_utf8_lossy(&bytes).into_owned())
        },
        Err(e) => error_to_parts(e).await,
    }
}

/// Sends a request to the token endpoint, which sits outside the bearer-wrapped scope.
pub async fn send_token_request(req: TestRequest) -> (StatusCode, String) {
    let issuer = TokenIssuer::new(&get_auth_config(), ClientRegistry::default());
    let app = App::new().app_data(web::Data::new(issuer)).service(token);
    let service = test::init_service(app).await;
    match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let bytes = test::read_body(res).await;
            (status, String::from_utf8_lossy(&bytes).into_owned())
        },
        Err(e) => error_to_parts(e).await,
    }
}

async fn error_to_parts(e: actix_web::Error) -> (StatusCode, String) {
    let res = e.error_response();
    let status = res.status();
    let bytes = body::to_bytes(res.into_body()).await.unwrap_or_default();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

pub fn bearer(raw_token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {raw_token}"))
}
