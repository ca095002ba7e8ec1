use serde_json::json;
use crate::Integrations::places;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    latitude: f64,
    longitude: f64,
}

/// Reverse geocode a point and pick the most address-like result.
pub async fn task(
    req: HttpRequest,
    form_data: web::Json<ReqBody>
) -> Result<HttpResponse, Error> {
    require_access(&req, AccessRequirement::AnyToken)?;

    let results = match places::reverse_geocode(
        form_data.latitude,
        form_data.longitude,
    ).await {
        Ok(results) => results,
        Err(error) => {
            log::error!("{}", error);
            return Ok(Response::internal_server_error(&error));
        },
    };

    let Some(address) = places::best_address(&results) else {
        return Ok(Response::not_found("No address found for this location"));
    };

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({ "address": address }))
    )
}
