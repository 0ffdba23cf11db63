use crate::helpers::JsonResponse;
use crate::services::{ItemError, ItemService};
use actix_web::{get, web, HttpResponse};

#[tracing::instrument(name = "Get all items.", skip(service))]
#[get("")]
pub async fn list(service: web::Data<ItemService>) -> Result<HttpResponse, ItemError> {
    service
        .list()
        .await
        .map(|items| JsonResponse::list(items).ok())
}

#[tracing::instrument(name = "Get item.", skip(service))]
#[get("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    service: web::Data<ItemService>,
) -> Result<HttpResponse, ItemError> {
    let (id,) = path.into_inner();
    service
        .get(&id)
        .await
        .map(|found| JsonResponse::item(found).ok())
}
