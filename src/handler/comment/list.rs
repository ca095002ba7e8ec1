use std::collections::HashMap;

use serde_json::json;
use mongodb::bson::{doc, Bson};
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use crate::utils::mongo::{find_sorted, read_all};
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::account::{self, Account, AccountRole};
use crate::model::comment::Comment;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Query {
    post_id: Option<String>,
}

/// Root comments of a post when `post_id` is given (public); otherwise the
/// admin-only listing of every root comment.
pub async fn task(
    req: HttpRequest,
    query: web::Query<Query>
) -> Result<HttpResponse, Error> {
    let filter = match &query.post_id {
        Some(post_id) => doc!{ "post_id": post_id, "parent_id": Bson::Null },
        None => {
            require_access(
                &req,
                AccessRequirement::AnyOf(vec![
                    AccountRole::Admin,
                    AccountRole::SuperAdmin,
                ])
            )?;

            doc!{ "parent_id": Bson::Null }
        }
    };

    let db = MongoDB.connect();
    let collection = db.collection::<Comment>("comment");
    let result = find_sorted(&collection, filter, false, None).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let comments = match read_all(result.unwrap()).await {
        Ok(comments) => comments,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    let author_ids: Vec<Bson> = comments
        .iter()
        .map(|c| Bson::String(c.author_id.clone()))
        .collect();

    let collection = db.collection::<Account>("account");
    let result = collection.find(doc!{ "uuid": { "$in": author_ids } }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let authors = match read_all(result.unwrap()).await {
        Ok(authors) => authors,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    let authors: HashMap<String, Account> = authors
        .into_iter()
        .map(|a| (a.uuid.clone(), a))
        .collect();

    let response: Vec<serde_json::Value> = comments
        .iter()
        .map(|comment| json!({
            "uuid": &comment.uuid,
            "post_id": &comment.post_id,
            "content": &comment.content,
            "path": &comment.path,
            "depth": comment.depth(),
            "is_anonymous": &comment.is_anonymous,
            "author": account::display_identity(
                authors.get(&comment.author_id),
                comment.is_anonymous,
            ),
            "created_at": &comment.created_at,
        }))
        .collect();

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(response)
    )
}
