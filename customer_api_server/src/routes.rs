//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! Handlers never block the worker thread: every storage call goes through the async engine APIs,
//! so slow requests do not stall the other requests on the same worker.
use actix_web::{get, http::StatusCode, post, web, HttpMessage, HttpRequest, HttpResponse, Responder};
use customer_api_engine::{
    db_types::{CustomerId, NewLifecycleEvent, Scope},
    traits::{CustomerManagement, LifecycleManagement},
    CustomerApi,
    LifecycleApi,
    SearchQuery,
};
use log::*;
use serde_json::json;

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        CustomerUpdateData,
        JsonData,
        LifecycleData,
        NewCustomerData,
        OAuthErrorBody,
        SearchParams,
        TokenRequest,
        TokenResponse,
        VulnerabilityUpdateData,
    },
    errors::{AuthError, ServerError},
};

const JSON_API_MIME: &str = "application/vnd.api+json";

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($scopes:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds)++ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($scopes),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/api/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(json!({
        "service": "customer-api-stub-server",
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "token": "POST /oauth/token",
            "health": "GET /api/health",
            "search_customers": "GET /v3/brands/{brand}/customers",
            "create_customer": "POST /v3/brands/{brand}/customers",
            "customer_by_id": "GET /v3/brands/{brand}/customers/{customerId}",
            "update_customer": "PATCH /v3/brands/{brand}/customers/{customerId}",
            "vulnerabilities": "GET /v3/brands/{brand}/customers/{customerId}/vulnerabilities",
            "update_vulnerability": "PATCH /v3/brands/{brand}/customers/{customerId}/vulnerabilities/{vulnerabilityId}",
            "lifecycle": "POST /v3/brands/{brand}/customers/lifecycle",
        },
    }))
}

//----------------------------------------------   OAuth  ----------------------------------------------------
/// Route handler for the token endpoint.
///
/// Implements the OAuth 2.0 client-credentials grant. The request body may be form-encoded or
/// JSON; both carry `client_id`, `client_secret`, `grant_type` and an optional space-delimited
/// `scope`. Failures here use the OAuth error body (`{error, error_description}`) rather than the
/// customer-domain error envelope, since OAuth clients expect that shape.
#[post("/oauth/token")]
pub async fn token(req: HttpRequest, body: web::Bytes, issuer: web::Data<TokenIssuer>) -> HttpResponse {
    trace!("💻️ Received token request");
    let token_request: TokenRequest = if req.content_type().contains("json") {
        match serde_json::from_slice(&body) {
            Ok(r) => r,
            Err(e) => return oauth_error(StatusCode::BAD_REQUEST, "invalid_request", &e.to_string()),
        }
    } else {
        match serde_urlencoded::from_bytes(&body) {
            Ok(r) => r,
            Err(e) => return oauth_error(StatusCode::BAD_REQUEST, "invalid_request", &e.to_string()),
        }
    };
    let requested = token_request.requested_scopes();
    match issuer.issue(&token_request.client_id, &token_request.client_secret, &token_request.grant_type, &requested) {
        Ok(issued) => {
            let response = TokenResponse::bearer(issued.access_token, &issued.granted_scopes, issued.expires_in);
            HttpResponse::Ok().json(response)
        },
        Err(e @ AuthError::UnsupportedGrantType) => {
            oauth_error(StatusCode::BAD_REQUEST, "unsupported_grant_type", &e.to_string())
        },
        Err(e @ AuthError::InvalidClient) => oauth_error(StatusCode::UNAUTHORIZED, "invalid_client", &e.to_string()),
        Err(e) => {
            error!("💻️ Token issuance failed unexpectedly. {e}");
            oauth_error(StatusCode::INTERNAL_SERVER_ERROR, "server_error", &e.to_string())
        },
    }
}

fn oauth_error(status: StatusCode, error: &str, description: &str) -> HttpResponse {
    debug!("💻️ Token request rejected: {error}. {description}");
    let body = OAuthErrorBody { error: error.to_string(), error_description: description.to_string() };
    HttpResponse::build(status).json(body)
}

//----------------------------------------------   Customers  ----------------------------------------------------
route!(customer_search => Get "/brands/{brand}/customers" impl CustomerManagement where requires [Scope::CustomerRead]);
/// Searches for customers matching the query-string criteria. At most one criterion is applied,
/// following a fixed precedence, and a query with no criteria at all matches every customer. Zero
/// matches is reported as a 404.
pub async fn customer_search<B: CustomerManagement>(
    params: web::Query<SearchParams>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let query = SearchQuery::from(params.into_inner());
    trace!("💻️ Received customer search request: {query:?}");
    let records = api.search_customers(&query).await?;
    Ok(HttpResponse::Ok().content_type(JSON_API_MIME).json(records))
}

route!(create_customer => Post "/brands/{brand}/customers" impl CustomerManagement where requires [Scope::CustomerWrite]);
pub async fn create_customer<B: CustomerManagement>(
    claims: JwtClaims,
    path: web::Path<String>,
    body: web::Json<JsonData<NewCustomerData>>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let brand = path.into_inner();
    let data = body.into_inner().data;
    trace!("💻️ Received create customer request for brand {brand}");
    let record = api.create_customer(data.kind, data.attributes, &claims.client_id, &brand).await?;
    Ok(HttpResponse::Created().content_type(JSON_API_MIME).json(JsonData { data: record }))
}

route!(customer_by_id => Get "/brands/{brand}/customers/{customer_id}" impl CustomerManagement where requires [Scope::CustomerRead]);
pub async fn customer_by_id<B: CustomerManagement>(
    path: web::Path<(String, String)>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (_brand, customer_id) = path.into_inner();
    let id = CustomerId(customer_id);
    trace!("💻️ Received fetch customer request for {id}");
    let record = api
        .fetch_customer(&id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No customer with id {id}")))?;
    Ok(HttpResponse::Ok().content_type(JSON_API_MIME).json(JsonData { data: record }))
}

route!(update_customer => Patch "/brands/{brand}/customers/{customer_id}" impl CustomerManagement where requires [Scope::CustomerWrite]);
/// Applies a partial update to a customer's party details. Only the groups present in the payload
/// are replaced; the merge and the modification audit land as one atomic change.
pub async fn update_customer<B: CustomerManagement>(
    claims: JwtClaims,
    path: web::Path<(String, String)>,
    body: web::Json<JsonData<CustomerUpdateData>>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (_brand, customer_id) = path.into_inner();
    let id = CustomerId(customer_id);
    trace!("💻️ Received update customer request for {id}");
    let update = body.into_inner().data.attributes.party_details;
    let record = api.update_customer(&id, update, &claims.client_id).await?;
    Ok(HttpResponse::Ok().content_type(JSON_API_MIME).json(JsonData { data: record }))
}

//----------------------------------------------   Vulnerabilities  ----------------------------------------------------
route!(vulnerabilities => Get "/brands/{brand}/customers/{customer_id}/vulnerabilities" impl CustomerManagement where requires [Scope::VulnerabilityRead]);
/// Lists the vulnerability records attached to a customer. A customer with no vulnerabilities is
/// an empty array, not a 404; an unknown customer is a 404.
pub async fn vulnerabilities<B: CustomerManagement>(
    path: web::Path<(String, String)>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (_brand, customer_id) = path.into_inner();
    let id = CustomerId(customer_id);
    trace!("💻️ Received vulnerabilities request for {id}");
    let records = api.fetch_vulnerabilities(&id).await?;
    Ok(HttpResponse::Ok().content_type(JSON_API_MIME).json(records))
}

route!(update_vulnerability => Patch "/brands/{brand}/customers/{customer_id}/vulnerabilities/{vulnerability_id}" impl CustomerManagement where requires [Scope::VulnerabilityWrite]);
pub async fn update_vulnerability<B: CustomerManagement>(
    path: web::Path<(String, String, String)>,
    body: web::Json<JsonData<VulnerabilityUpdateData>>,
    api: web::Data<CustomerApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let (_brand, customer_id, vulnerability_id) = path.into_inner();
    let id = CustomerId(customer_id);
    trace!("💻️ Received update vulnerability request for {id}/{vulnerability_id}");
    let attributes = body.into_inner().data.attributes;
    let record = api.update_vulnerability(&id, &vulnerability_id, attributes).await?;
    Ok(HttpResponse::Ok().content_type(JSON_API_MIME).json(JsonData { data: record }))
}

//----------------------------------------------   Lifecycle  ----------------------------------------------------
route!(lifecycle => Post "/brands/{brand}/customers/lifecycle" impl LifecycleManagement where requires [Scope::CustomerWrite]);
/// Records a customer lifecycle event and echoes the submitted party details back. The event
/// itself is append-only; nothing in the customer store changes.
pub async fn lifecycle<B: LifecycleManagement>(
    claims: JwtClaims,
    path: web::Path<String>,
    body: web::Json<JsonData<LifecycleData>>,
    api: web::Data<LifecycleApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let brand = path.into_inner();
    let data = body.into_inner().data;
    trace!("💻️ Received lifecycle event for brand {brand}: {}", data.operation);
    let party_details = data.attributes.get("partyDetails").cloned().unwrap_or_else(|| json!({}));
    let event = NewLifecycleEvent {
        brand,
        operation: data.operation,
        client_id: claims.client_id,
        payload: json!({ "attributes": data.attributes }),
    };
    api.record_event(event).await?;
    Ok(HttpResponse::Ok()
        .content_type(JSON_API_MIME)
        .json(json!({ "data": { "attributes": { "partyDetails": party_details } } })))
}
