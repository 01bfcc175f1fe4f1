use std::{env, io::Write};

use cas_common::Secret;
use log::*;
use rand::{thread_rng, RngCore};
use serde_json::json;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_CAS_HOST: &str = "127.0.0.1";
const DEFAULT_CAS_PORT: u16 = 5050;
const DEFAULT_SEED_CUSTOMERS: usize = 20;
/// Anything shorter than this is too weak even for a test double.
const MIN_SIGNING_KEY_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How many fake customers to generate into the store at startup.
    pub seed_customers: usize,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CAS_HOST.to_string(),
            port: DEFAULT_CAS_PORT,
            seed_customers: DEFAULT_SEED_CUSTOMERS,
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CAS_HOST").ok().unwrap_or_else(|| DEFAULT_CAS_HOST.into());
        let port = env::var("CAS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CAS_PORT. {e} Using the default, {DEFAULT_CAS_PORT}, instead."
                    );
                    DEFAULT_CAS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CAS_PORT);
        let seed_customers = env::var("CAS_SEED_CUSTOMERS")
            .map(|s| {
                s.parse::<usize>().unwrap_or_else(|e| {
                    warn!("🪛️ Invalid configuration value for CAS_SEED_CUSTOMERS. {e}");
                    DEFAULT_SEED_CUSTOMERS
                })
            })
            .ok()
            .unwrap_or(DEFAULT_SEED_CUSTOMERS);
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, seed_customers, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The process-wide symmetric key used to sign and verify access tokens. All tokens become
    /// invalid when it changes.
    pub jwt_signing_key: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing key has not been set. I'm using a random value for this session. All issued \
             tokens will be rejected after a restart. 🚨️🚨️🚨️"
        );
        let mut key_bytes = [0u8; 32];
        thread_rng().fill_bytes(&mut key_bytes);
        let key = key_bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_signing_key": key }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT signing key for this session was written to {}. If this is anything but a \
                         throwaway test instance, set the CAS_JWT_SIGNING_KEY environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT signing key to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT signing key.");
            },
        }
        Self { jwt_signing_key: Secret::new(key) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let key = env::var("CAS_JWT_SIGNING_KEY")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [CAS_JWT_SIGNING_KEY]")))?;
        if key.len() < MIN_SIGNING_KEY_LEN {
            return Err(ServerError::ConfigurationError(format!(
                "CAS_JWT_SIGNING_KEY must be at least {MIN_SIGNING_KEY_LEN} characters long"
            )));
        }
        Ok(Self { jwt_signing_key: Secret::new(key) })
    }
}
