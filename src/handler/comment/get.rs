use serde_json::json;
use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse};
use crate::model::account::{self, Account};
use crate::model::comment::Comment;

pub async fn task(path: web::Path<String>) -> Result<HttpResponse, Error> {
    let uuid = path.into_inner();

    let db = MongoDB.connect();
    let collection = db.collection::<Comment>("comment");
    let result = collection.find_one(doc!{ "uuid": &uuid }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let Some(comment) = result.unwrap() else {
        return Ok(Response::not_found("Comment not found"));
    };

    let collection = db.collection::<Account>("account");
    let result = collection.find_one(doc!{ "uuid": &comment.author_id }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let author = result.unwrap();

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(json!({
            "uuid": &comment.uuid,
            "post_id": &comment.post_id,
            "parent_id": &comment.parent_id,
            "content": &comment.content,
            "path": &comment.path,
            "depth": comment.depth(),
            "is_anonymous": &comment.is_anonymous,
            "author": account::display_identity(author.as_ref(), comment.is_anonymous),
            "created_at": &comment.created_at,
        }))
    )
}
