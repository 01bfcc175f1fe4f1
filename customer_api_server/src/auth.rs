use actix_web::{dev::Payload, error::ErrorInternalServerError, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use customer_api_engine::{
    db_types::Scope,
    helpers::new_object_id,
    negotiate_scopes,
    ClientRegistry,
};
use futures::future::{ready, Ready};
use hmac::{Hmac, Mac};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{config::AuthConfig, errors::AuthError};

type HmacSha256 = Hmac<Sha256>;

pub const TOKEN_ISSUER: &str = "customer-api-stub-server";
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// The claims carried by an access token. The token is self-contained: validity is fully
/// determined by the signature and the `exp` timestamp, and the verifier holds no token state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub client_id: String,
    pub iat: i64,
    pub exp: i64,
    pub scopes: Vec<Scope>,
    pub jti: String,
}

impl JwtClaims {
    /// OR semantics: an empty requirement always passes, otherwise any single matching scope is
    /// enough.
    pub fn has_any_scope(&self, required: &[Scope]) -> bool {
        required.is_empty() || required.iter().any(|s| self.scopes.contains(s))
    }
}

/// Claims are attached to the request by the bearer middleware; handlers extract them for audit
/// attribution.
impl FromRequest for JwtClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<JwtClaims>()
            .cloned()
            .ok_or_else(|| ErrorInternalServerError("No JWT claims found in request extensions"));
        ready(claims)
    }
}

/// A freshly minted access token together with the metadata the token endpoint reports.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub granted_scopes: Vec<Scope>,
    pub expires_in: i64,
}

fn b64(data: &[u8]) -> String {
    base64::encode_config(data, base64::URL_SAFE_NO_PAD)
}

fn hmac_sha256(key: &[u8], content: &str) -> Result<HmacSha256, AuthError> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| AuthError::SigningError(format!("Invalid signing key. {e}")))?;
    mac.update(content.as_bytes());
    Ok(mac)
}

/// Issues signed, time-bounded access tokens for the client-credentials grant.
///
/// Tokens are JWTs signed with HMAC-SHA256 under a process-wide symmetric key. There is no
/// server-side session; issuing a token has no side effects.
pub struct TokenIssuer {
    signing_key: Vec<u8>,
    registry: ClientRegistry,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig, registry: ClientRegistry) -> Self {
        Self { signing_key: config.jwt_signing_key.reveal().as_bytes().to_vec(), registry }
    }

    /// Validates the client credentials, negotiates the granted scopes and mints a token.
    ///
    /// An unknown client id and a wrong secret produce the same [`AuthError::InvalidClient`] so
    /// that callers cannot probe which client ids exist.
    pub fn issue(
        &self,
        client_id: &str,
        client_secret: &str,
        grant_type: &str,
        requested_scopes: &[String],
    ) -> Result<IssuedToken, AuthError> {
        if grant_type != "client_credentials" {
            return Err(AuthError::UnsupportedGrantType);
        }
        let client = self.registry.lookup(client_id).ok_or(AuthError::InvalidClient)?;
        if client.client_secret.reveal() != client_secret {
            return Err(AuthError::InvalidClient);
        }
        let granted_scopes = negotiate_scopes(requested_scopes, &client.allowed_scopes);
        let now = Utc::now();
        let claims = JwtClaims {
            iss: TOKEN_ISSUER.to_string(),
            sub: client_id.to_string(),
            client_id: client_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
            scopes: granted_scopes.clone(),
            jti: new_object_id(),
        };
        let access_token = self.sign(&claims)?;
        debug!("🔐️ Issued access token for {client_id} with scopes {granted_scopes:?}");
        Ok(IssuedToken { access_token, granted_scopes, expires_in: TOKEN_LIFETIME_SECS })
    }

    fn sign(&self, claims: &JwtClaims) -> Result<String, AuthError> {
        let header = b64(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = serde_json::to_vec(claims).map_err(|e| AuthError::SigningError(e.to_string()))?;
        let content = format!("{header}.{}", b64(&payload));
        let mac = hmac_sha256(&self.signing_key, &content)?;
        let signature = b64(&mac.finalize().into_bytes());
        Ok(format!("{content}.{signature}"))
    }
}

/// Verifies presented access tokens. Stateless by design: it consults no store, and correctness
/// rests entirely on the signature and timestamp checks.
#[derive(Clone)]
pub struct TokenVerifier {
    signing_key: Vec<u8>,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self { signing_key: config.jwt_signing_key.reveal().as_bytes().to_vec() }
    }

    /// Validates the signature, expiry and required scopes of a raw token and returns its claims.
    /// Required scopes use OR semantics; the expiry boundary `now == exp` is still valid.
    pub fn verify(&self, raw_token: &str, required_scopes: &[Scope]) -> Result<JwtClaims, AuthError> {
        let (content, signature) = raw_token
            .rsplit_once('.')
            .ok_or_else(|| AuthError::PoorlyFormattedToken("Not a three-part JWT".to_string()))?;
        if content.split('.').count() != 2 {
            return Err(AuthError::PoorlyFormattedToken("Not a three-part JWT".to_string()));
        }
        let signature = base64::decode_config(signature, base64::URL_SAFE_NO_PAD)
            .map_err(|e| AuthError::PoorlyFormattedToken(format!("Invalid signature encoding. {e}")))?;
        let mac = hmac_sha256(&self.signing_key, content)?;
        mac.verify_slice(&signature).map_err(|_| AuthError::InvalidSignature)?;

        let (_, payload) = content.split_once('.').ok_or(AuthError::InvalidSignature)?;
        let payload = base64::decode_config(payload, base64::URL_SAFE_NO_PAD)
            .map_err(|e| AuthError::PoorlyFormattedToken(format!("Invalid payload encoding. {e}")))?;
        let claims: JwtClaims = serde_json::from_slice(&payload)
            .map_err(|e| AuthError::PoorlyFormattedToken(format!("Invalid claims. {e}")))?;

        if Utc::now().timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }
        if !claims.has_any_scope(required_scopes) {
            let wanted = required_scopes.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            return Err(AuthError::InsufficientScope(format!("The token holds none of the scopes [{wanted}]")));
        }
        Ok(claims)
    }
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingCredential)
}
