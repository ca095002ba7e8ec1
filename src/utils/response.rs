use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub message: String,
}

impl Response {
    pub fn ok(message: &str) -> HttpResponse {
        HttpResponse::Ok()
            .content_type("application/json")
            .json(json!({ "message": message }))
    }

    pub fn bad_request(message: &str) -> HttpResponse {
        HttpResponse::BadRequest()
            .content_type("application/json")
            .json(json!({ "error": message }))
    }

    pub fn unauthorized(message: &str) -> HttpResponse {
        HttpResponse::Unauthorized()
            .content_type("application/json")
            .json(json!({ "error": message }))
    }

    pub fn forbidden(message: &str) -> HttpResponse {
        HttpResponse::Forbidden()
            .content_type("application/json")
            .json(json!({ "error": message }))
    }

    pub fn not_found(message: &str) -> HttpResponse {
        HttpResponse::NotFound()
            .content_type("application/json")
            .json(json!({ "error": message }))
    }

    pub fn conflict(message: &str) -> HttpResponse {
        HttpResponse::Conflict()
            .content_type("application/json")
            .json(json!({ "error": message }))
    }

    pub fn internal_server_error(message: &str) -> HttpResponse {
        HttpResponse::InternalServerError()
            .content_type("application/json")
            .json(json!({ "error": message }))
    }
}
