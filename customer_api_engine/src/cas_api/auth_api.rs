use std::{collections::HashMap, env};

use cas_common::Secret;
use log::*;
use serde::Deserialize;

use crate::db_types::{Scope, DEFAULT_SCOPE};

pub const OAUTH_CLIENTS_ENV: &str = "CAS_OAUTH_CLIENTS";

/// A registered OAuth client: its id, its secret, and the scopes it may be granted. Loaded once
/// at startup; the registry is read-only thereafter.
#[derive(Debug, Clone)]
pub struct ClientCredential {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub allowed_scopes: Vec<Scope>,
}

impl ClientCredential {
    pub fn new<S: Into<String>>(client_id: S, client_secret: S, allowed_scopes: Vec<Scope>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: Secret::new(client_secret.into()),
            allowed_scopes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClientCredentialDef {
    client_id: String,
    client_secret: String,
    allowed_scopes: Vec<Scope>,
}

/// The static mapping of client identity to credential. Client ids must be unique; a duplicate id
/// in the configuration replaces the earlier entry with a warning.
#[derive(Debug, Clone)]
pub struct ClientRegistry {
    clients: HashMap<String, ClientCredential>,
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new(vec![
            ClientCredential::new("demo-client-id", "demo-client-secret", Scope::all()),
            ClientCredential::new("performance-test-client", "test-secret-123", Scope::all()),
        ])
    }
}

impl ClientRegistry {
    pub fn new(credentials: Vec<ClientCredential>) -> Self {
        let mut clients = HashMap::with_capacity(credentials.len());
        for credential in credentials {
            if clients.insert(credential.client_id.clone(), credential).is_some() {
                warn!("🔐️ Duplicate client id in the OAuth client configuration. The last entry wins.");
            }
        }
        Self { clients }
    }

    /// Loads the registry from the `CAS_OAUTH_CLIENTS` environment variable (a JSON array of
    /// `{client_id, client_secret, allowed_scopes}` objects), falling back to the two stock test
    /// clients when it is unset or invalid.
    pub fn from_env_or_default() -> Self {
        match env::var(OAUTH_CLIENTS_ENV) {
            Ok(json) => match serde_json::from_str::<Vec<ClientCredentialDef>>(&json) {
                Ok(defs) if !defs.is_empty() => {
                    info!("🔐️ Loaded {} OAuth client(s) from {OAUTH_CLIENTS_ENV}.", defs.len());
                    Self::new(
                        defs.into_iter()
                            .map(|d| ClientCredential::new(d.client_id, d.client_secret, d.allowed_scopes))
                            .collect(),
                    )
                },
                Ok(_) => {
                    warn!("🔐️ {OAUTH_CLIENTS_ENV} is set but empty. Using the stock test clients instead.");
                    Self::default()
                },
                Err(e) => {
                    warn!("🔐️ Could not parse {OAUTH_CLIENTS_ENV}: {e}. Using the stock test clients instead.");
                    Self::default()
                },
            },
            Err(_) => {
                info!("🔐️ {OAUTH_CLIENTS_ENV} is not set. Using the stock test clients.");
                Self::default()
            },
        }
    }

    pub fn lookup(&self, client_id: &str) -> Option<&ClientCredential> {
        self.clients.get(client_id)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

/// The scope negotiation policy for the client-credentials grant.
///
/// The requested scopes are intersected with the client's allowed scopes, preserving the
/// requested order (duplicates keep their first position). An empty request grants everything the
/// client is allowed. A non-empty request with an empty intersection falls back to the single
/// default read scope rather than failing; this keeps badly-configured load-test clients running
/// and is emphatically not a security posture.
pub fn negotiate_scopes(requested: &[String], allowed: &[Scope]) -> Vec<Scope> {
    if requested.is_empty() {
        return allowed.to_vec();
    }
    let mut granted = Vec::new();
    for scope in requested.iter().filter_map(|s| s.parse::<Scope>().ok()) {
        if allowed.contains(&scope) && !granted.contains(&scope) {
            granted.push(scope);
        }
    }
    if granted.is_empty() {
        granted.push(DEFAULT_SCOPE);
    }
    granted
}
