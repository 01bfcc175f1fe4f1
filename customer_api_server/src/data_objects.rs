use customer_api_engine::{
    cas_api::search::DEFAULT_SEARCH_LIMIT,
    db_types::{CustomerAttributes, CustomerKind, Scope},
    PartyDetailsUpdate,
    SearchQuery,
};
use serde::{Deserialize, Serialize};

/// The JSON:API-flavoured `{data: ...}` envelope used by the customer-domain endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonData<T> {
    pub data: T,
}

//----------------------------------------------   OAuth   -----------------------------------------------------------
/// The token request body. Accepted both form-encoded and as JSON, per the OAuth 2.0 spec.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenRequest {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
    /// Space-delimited scope names.
    pub scope: String,
}

impl TokenRequest {
    pub fn requested_scopes(&self) -> Vec<String> {
        self.scope.split_whitespace().map(String::from).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, granted_scopes: &[Scope], expires_in: i64) -> Self {
        let scope = granted_scopes.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ");
        Self { access_token, token_type: "Bearer".to_string(), expires_in, scope }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OAuthErrorBody {
    pub error: String,
    pub error_description: String,
}

//----------------------------------------------   Customers   -------------------------------------------------------
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomerData {
    #[serde(rename = "type")]
    pub kind: CustomerKind,
    #[serde(default)]
    pub attributes: CustomerAttributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerUpdateData {
    pub attributes: CustomerAttributesUpdate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerAttributesUpdate {
    pub party_details: PartyDetailsUpdate,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VulnerabilityUpdateData {
    pub attributes: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LifecycleData {
    pub operation: String,
    pub attributes: serde_json::Value,
}

/// The customer search query string. All criteria are optional; precedence and matching policy
/// live in the engine's [`SearchQuery`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registered_name: Option<String>,
    pub email_address: Option<String>,
    pub phone_number: Option<String>,
    pub party_id_scheme: Option<String>,
    pub party_id_ref: Option<String>,
    pub strict_match: Option<bool>,
    pub limit: Option<usize>,
}

impl From<SearchParams> for SearchQuery {
    fn from(params: SearchParams) -> Self {
        SearchQuery {
            first_name: params.first_name,
            last_name: params.last_name,
            registered_name: params.registered_name,
            email_address: params.email_address,
            phone_number: params.phone_number,
            party_id_scheme: params.party_id_scheme,
            party_id_ref: params.party_id_ref,
            strict_match: params.strict_match.unwrap_or(false),
            limit: params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        }
    }
}
