use crate::helpers::JsonResponse;
use crate::services::{ItemError, ItemService};
use actix_web::{delete, web, HttpResponse};
use serde_json::json;

#[tracing::instrument(name = "Delete item.", skip(service))]
#[delete("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    service: web::Data<ItemService>,
) -> Result<HttpResponse, ItemError> {
    let (id,) = path.into_inner();
    service.delete(&id).await?;

    Ok(JsonResponse::item(json!({})).ok())
}
