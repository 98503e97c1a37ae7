use crate::domain::DomainError;
use actix_multipart::MultipartError;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, ResponseError};
use serde::Serialize;

/// Envelope of every successful response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: status.as_u16() < 400,
        }
    }

    /// Writes the envelope into an existing builder, so callers can attach cookies first.
    pub fn send(self, mut builder: HttpResponseBuilder) -> HttpResponse {
        builder.json(self)
    }
}

pub fn ok<T: Serialize>(data: T, message: &str) -> HttpResponse {
    ApiResponse::new(StatusCode::OK, data, message).send(HttpResponse::Ok())
}

pub fn created<T: Serialize>(data: T, message: &str) -> HttpResponse {
    ApiResponse::new(StatusCode::CREATED, data, message).send(HttpResponse::Created())
}

/// Envelope of every failed response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub errors: Vec<String>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.to_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Storage and hashing details stay in the logs.
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(status).json(ApiError {
            status_code: status.as_u16(),
            message,
            success: false,
            errors: Vec::new(),
        })
    }
}

// Обработчики ошибок экстракторов: всё приводится к единому формату ответа

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation(format!("Invalid JSON body: {}", err)).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation(format!("Invalid path parameter: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation(format!("Invalid query string: {}", err)).into()
}

pub fn multipart_error_handler(err: MultipartError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::validation(format!("Invalid multipart form: {}", err)).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(resp: HttpResponse) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_rt::test]
    async fn success_envelope() {
        let resp = created(serde_json::json!({ "id": 1 }), "Created");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body = body_json(resp).await;
        assert_eq!(body["statusCode"], 201);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Created");
        assert_eq!(body["data"]["id"], 1);
    }

    #[actix_rt::test]
    async fn error_envelope() {
        let resp = DomainError::Forbidden.error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body = body_json(resp).await;
        assert_eq!(body["statusCode"], 403);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"], serde_json::json!([]));
    }

    #[actix_rt::test]
    async fn internal_details_are_hidden() {
        let resp = DomainError::DatabaseError("connection refused".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(resp).await;
        assert_eq!(body["message"], "Internal server error");
    }
}
