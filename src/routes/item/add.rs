use crate::forms::ItemForm;
use crate::helpers::JsonResponse;
use crate::services::{ItemError, ItemService};
use actix_web::{post, web, HttpResponse};

#[tracing::instrument(name = "Add item.", skip(service))]
#[post("")]
pub async fn add(
    form: web::Json<ItemForm>,
    service: web::Data<ItemService>,
) -> Result<HttpResponse, ItemError> {
    let created = service.create(form.into_inner()).await?;

    Ok(JsonResponse::item(created).created())
}
