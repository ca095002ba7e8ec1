use uuid::Uuid;
use serde_json::json;
use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::tag::Tag;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    name: String,
}

pub async fn task(
    req: HttpRequest,
    form_data: web::Json<ReqBody>
) -> Result<HttpResponse, Error> {
    require_access(&req, AccessRequirement::AnyToken)?;

    let name = form_data.name.trim().to_lowercase();
    if name.is_empty() {
        return Ok(Response::bad_request("Name is required"));
    }

    let db = MongoDB.connect();
    let collection = db.collection::<Tag>("tag");

    let result = collection.find_one(doc!{ "name": &name }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    if result.unwrap().is_some() {
        return Ok(Response::conflict("Tag already exists"));
    }

    let tag = Tag {
        uuid: Uuid::new_v4().to_string(),
        name,
        count: 0,
    };

    let result = collection.insert_one(&tag).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(json!({
            "uuid": &tag.uuid,
            "name": &tag.name,
            "count": &tag.count,
        }))
    )
}
