use crate::forms::FieldViolation;
use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Envelope shared by every item endpoint:
/// `{success, count?, data?, error?, errors?}`.
#[derive(Debug, Serialize)]
pub struct JsonResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldViolation>>,
}

impl<T> Default for JsonResponse<T> {
    fn default() -> Self {
        JsonResponse {
            success: true,
            count: None,
            data: None,
            error: None,
            errors: None,
        }
    }
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    pub fn item(data: T) -> Self {
        JsonResponse {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn ok(self) -> HttpResponse {
        self.respond(StatusCode::OK)
    }

    pub fn created(self) -> HttpResponse {
        self.respond(StatusCode::CREATED)
    }

    fn respond(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl<T> JsonResponse<Vec<T>>
where
    T: Serialize,
{
    pub fn list(data: Vec<T>) -> Self {
        JsonResponse {
            count: Some(data.len()),
            data: Some(data),
            ..Default::default()
        }
    }
}

impl JsonResponse<()> {
    fn failure() -> Self {
        JsonResponse {
            success: false,
            ..Default::default()
        }
    }

    pub fn not_found(message: impl Into<String>) -> HttpResponse {
        JsonResponse {
            error: Some(message.into()),
            ..Self::failure()
        }
        .respond(StatusCode::NOT_FOUND)
    }

    pub fn form_error(errors: Vec<FieldViolation>) -> HttpResponse {
        JsonResponse {
            errors: Some(errors),
            ..Self::failure()
        }
        .respond(StatusCode::BAD_REQUEST)
    }

    pub fn internal_server_error(message: impl Into<String>) -> HttpResponse {
        JsonResponse {
            error: Some(message.into()),
            ..Self::failure()
        }
        .respond(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
