use crate::configuration::Settings;
use crate::db::ItemStore;
use crate::forms::FieldViolation;
use crate::health::HealthChecker;
use crate::helpers::JsonResponse;
use crate::routes;
use crate::services::ItemService;
use actix_cors::Cors;
use actix_web::{dev::Server, error, middleware, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub async fn run(
    listener: TcpListener,
    store: Arc<dyn ItemStore>,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let health_checker = HealthChecker::new(store.clone(), settings.environment.clone());
    run_with_checker(listener, store, health_checker, settings).await
}

/// Like [`run`], with a caller-built health checker.
pub async fn run_with_checker(
    listener: TcpListener,
    store: Arc<dyn ItemStore>,
    health_checker: HealthChecker,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let item_service = web::Data::new(ItemService::new(store));
    let health_checker = web::Data::new(health_checker);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::Deserialize(err) => format!(
                "Invalid JSON at line {} column {}: {}",
                err.line(),
                err.column(),
                err
            ),
            _ => err.to_string(),
        };
        let response = JsonResponse::form_error(vec![FieldViolation::new("body", message)]);
        error::InternalError::from_response(err, response).into()
    });

    tracing::info!(environment = %settings.environment, "Starting item service");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(Cors::permissive())
            .route("/health", web::get().to(routes::health_check))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(routes::health_check))
                    .service(
                        web::scope("/items")
                            .service(routes::item::get::list)
                            .service(routes::item::get::item)
                            .service(routes::item::add::add)
                            .service(routes::item::update::item)
                            .service(routes::item::delete::item),
                    ),
            )
            .app_data(json_config.clone())
            .app_data(item_service.clone())
            .app_data(health_checker.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
