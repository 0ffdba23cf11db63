use crate::health::{HealthChecker, HealthFailure};
use actix_web::{web, HttpResponse};

#[tracing::instrument(name = "Health check.", skip(checker))]
pub async fn health_check(checker: web::Data<HealthChecker>) -> HttpResponse {
    match checker.report() {
        Ok(snapshot) => HttpResponse::Ok().json(snapshot),
        Err(err) => {
            tracing::error!("Health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(HealthFailure::new(err.to_string()))
        }
    }
}
