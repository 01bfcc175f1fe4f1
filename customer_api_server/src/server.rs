use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use customer_api_engine::{helpers::sample_data, ClientRegistry, CustomerApi, LifecycleApi, MemoryDatabase};
use log::info;

use crate::{
    auth::{TokenIssuer, TokenVerifier},
    config::ServerConfig,
    errors::ServerError,
    middleware::BearerAuthMiddlewareFactory,
    routes::{
        health,
        token,
        CreateCustomerRoute,
        CustomerByIdRoute,
        CustomerSearchRoute,
        LifecycleRoute,
        UpdateCustomerRoute,
        UpdateVulnerabilityRoute,
        VulnerabilitiesRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = MemoryDatabase::new();
    sample_data::seed(&db, config.seed_customers).await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: MemoryDatabase) -> Result<Server, ServerError> {
    let registry = ClientRegistry::from_env_or_default();
    info!("🔐️ {} OAuth clients registered", registry.len());
    let srv = HttpServer::new(move || {
        let customers_api = CustomerApi::new(db.clone());
        let lifecycle_api = LifecycleApi::new(db.clone());
        let jwt_issuer = TokenIssuer::new(&config.auth, registry.clone());
        let jwt_verifier = TokenVerifier::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("cas::access_log"))
            .app_data(web::Data::new(customers_api))
            .app_data(web::Data::new(lifecycle_api))
            .app_data(web::Data::new(jwt_issuer));
        // Routes that require authentication. The lifecycle route registers before the
        // customer-by-id routes so that its `lifecycle` path segment is not captured as an id.
        let auth_scope = web::scope("/v3")
            .wrap(BearerAuthMiddlewareFactory::new(jwt_verifier))
            .service(LifecycleRoute::<MemoryDatabase>::new())
            .service(CustomerSearchRoute::<MemoryDatabase>::new())
            .service(CreateCustomerRoute::<MemoryDatabase>::new())
            .service(CustomerByIdRoute::<MemoryDatabase>::new())
            .service(UpdateCustomerRoute::<MemoryDatabase>::new())
            .service(VulnerabilitiesRoute::<MemoryDatabase>::new())
            .service(UpdateVulnerabilityRoute::<MemoryDatabase>::new());
        app.service(health).service(token).service(auth_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
