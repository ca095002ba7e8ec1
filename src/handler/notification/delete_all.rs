use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use crate::utils::response::Response;
use actix_web::{Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::notification::Notification;

pub async fn task(req: HttpRequest) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;

    let db = MongoDB.connect();
    let collection = db.collection::<Notification>("notification");

    let result = collection.delete_many(
        doc!{ "recipient_id": &user.user_id },
    ).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    Ok(Response::ok("All notifications deleted"))
}
