use uuid::Uuid;
use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use crate::Integrations::places;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    query: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
struct PlacesSession {
    user_id: String,
    session_id: String,
}

pub async fn task(
    req: HttpRequest,
    form_data: web::Json<ReqBody>
) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;
    let user_id = user.user_id;

    if form_data.query.trim().is_empty() {
        return Ok(Response::bad_request("Query is required"));
    }

    // One billing session token per user, created lazily.
    let db = MongoDB.connect();
    let collection = db.collection::<PlacesSession>("places_session");
    let result = collection.find_one(doc!{ "user_id": &user_id }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let session = match result.unwrap() {
        Some(session) => session,
        None => {
            let session = PlacesSession {
                user_id: user_id.clone(),
                session_id: Uuid::new_v4().to_string(),
            };

            if let Err(error) = collection.insert_one(&session).await {
                log::error!("{:?}", error);
                return Ok(Response::internal_server_error(&error.to_string()));
            }

            session
        },
    };

    // The provider call is the purpose of this request, so its failure is
    // surfaced instead of swallowed.
    let predictions = places::autocomplete(
        &form_data.query,
        form_data.latitude,
        form_data.longitude,
        &session.session_id,
    ).await;

    match predictions {
        Ok(predictions) => Ok(
            HttpResponse::Ok()
            .content_type("application/json")
            .json(predictions)
        ),
        Err(error) => {
            log::error!("{}", error);
            Ok(Response::internal_server_error(&error))
        },
    }
}
