use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::notification::Notification;

pub async fn task(
    req: HttpRequest,
    path: web::Path<String>
) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;
    let uuid = path.into_inner();

    let db = MongoDB.connect();
    let collection = db.collection::<Notification>("notification");

    let result = collection.find_one(doc!{ "uuid": &uuid }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let Some(notification) = result.unwrap() else {
        return Ok(Response::not_found("Notification not found"));
    };

    if notification.recipient_id != user.user_id {
        return Ok(Response::forbidden("You are not authorized to perform this action"));
    }

    let result = collection.delete_one(doc!{ "uuid": &uuid }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    Ok(Response::ok("Notification successfully deleted"))
}
