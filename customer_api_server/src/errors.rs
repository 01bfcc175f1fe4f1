use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use customer_api_engine::{CustomerApiError, LifecycleApiError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Payload deserialization error")]
    CouldNotDeserializePayload,
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("No customers found matching the search criteria")]
    NoMatches,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::CouldNotDeserializePayload => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::UnsupportedGrantType => StatusCode::BAD_REQUEST,
                AuthError::InvalidClient => StatusCode::UNAUTHORIZED,
                AuthError::MissingCredential => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidSignature => StatusCode::UNAUTHORIZED,
                AuthError::Expired => StatusCode::UNAUTHORIZED,
                AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
                AuthError::SigningError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::NoMatches => StatusCode::NOT_FOUND,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Every failure here is a normal, expected outcome of caller input; it is reported
    /// synchronously in the API's stable error envelope.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (code, title) = match (self, status.as_u16()) {
            (_, 400) => ("API-400", "Invalid Request"),
            (Self::AuthenticationError(AuthError::Expired), _) => ("API-401", "Token Expired"),
            (_, 401) => ("API-401", "Unauthorized"),
            (_, 403) => ("API-403", "Forbidden"),
            (Self::NoMatches, _) => ("API-404", "No Matching Customers"),
            (_, 404) => ("API-404", "Not Found"),
            _ => ("API-500", "Internal Server Error"),
        };
        let body = json!({
            "errors": [{
                "status": status.as_u16().to_string(),
                "code": code,
                "title": title,
                "details": self.to_string(),
            }]
        });
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Only the client_credentials grant type is supported")]
    UnsupportedGrantType,
    /// Covers both an unknown client id and a secret mismatch. The response shape is identical
    /// in both cases so that a caller cannot tell which check failed.
    #[error("Client authentication failed")]
    InvalidClient,
    #[error("Missing or invalid authorization header")]
    MissingCredential,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token signature is invalid")]
    InvalidSignature,
    #[error("Access token has expired")]
    Expired,
    #[error("Insufficient permissions. {0}")]
    InsufficientScope(String),
    #[error("Could not sign the access token. {0}")]
    SigningError(String),
}

impl From<CustomerApiError> for ServerError {
    fn from(e: CustomerApiError) -> Self {
        match e {
            CustomerApiError::CustomerNotFound(_) | CustomerApiError::VulnerabilityNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            CustomerApiError::NoMatches => Self::NoMatches,
            CustomerApiError::InvalidInput(msg) => Self::InvalidRequestBody(msg),
            CustomerApiError::StorageError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<LifecycleApiError> for ServerError {
    fn from(e: LifecycleApiError) -> Self {
        match e {
            LifecycleApiError::InvalidPayload(msg) => Self::InvalidRequestBody(msg),
            LifecycleApiError::StorageError(msg) => Self::BackendError(msg),
        }
    }
}
