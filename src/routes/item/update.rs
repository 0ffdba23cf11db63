use crate::forms::ItemForm;
use crate::helpers::JsonResponse;
use crate::services::{ItemError, ItemService};
use actix_web::{put, web, HttpResponse};

#[tracing::instrument(name = "Update item.", skip(service))]
#[put("/{id}")]
pub async fn item(
    path: web::Path<(String,)>,
    form: web::Json<ItemForm>,
    service: web::Data<ItemService>,
) -> Result<HttpResponse, ItemError> {
    let (id,) = path.into_inner();
    let updated = service.update(&id, form.into_inner()).await?;

    Ok(JsonResponse::item(updated).ok())
}
