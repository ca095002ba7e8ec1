use std::collections::HashMap;

use serde_json::json;
use mongodb::{bson::{doc, Bson}, Database};
use actix_web::HttpResponse;

use crate::utils::mongo::read_all;
use crate::utils::response::Response;
use crate::model::account::{self, Account};
use crate::model::post::Post;

pub mod create;
pub use create as Create;

pub mod get;
pub use get as Get;

pub mod delete;
pub use delete as Delete;

pub mod search;
pub use search as Search;

pub mod calendar;
pub use calendar as Calendar;

/// Renders posts with the anonymity transform applied: an anonymous post
/// exposes neither its author id nor identity, only the fixed placeholder.
pub(crate) async fn present_many(
    db: &Database,
    posts: &[Post],
) -> Result<Vec<serde_json::Value>, HttpResponse> {
    let author_ids: Vec<Bson> = posts
        .iter()
        .map(|p| Bson::String(p.author_id.clone()))
        .collect();

    let collection = db.collection::<Account>("account");
    let result = collection.find(doc!{ "uuid": { "$in": author_ids } }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Err(Response::internal_server_error(&error.to_string()));
    }

    let authors = match read_all(result.unwrap()).await {
        Ok(authors) => authors,
        Err(error) => {
            log::error!("{:?}", error);
            return Err(Response::internal_server_error(&error.to_string()));
        },
    };

    let authors: HashMap<String, Account> = authors
        .into_iter()
        .map(|a| (a.uuid.clone(), a))
        .collect();

    let rendered = posts
        .iter()
        .map(|post| json!({
            "uuid": &post.uuid,
            "title": &post.title,
            "content": &post.content,
            "icon_id": &post.icon_id,
            "latitude": &post.latitude,
            "longitude": &post.longitude,
            "location": &post.location,
            "tags": &post.tags,
            "is_anonymous": &post.is_anonymous,
            "author_id": match post.is_anonymous {
                true => serde_json::Value::Null,
                false => json!(&post.author_id),
            },
            "author": account::display_identity(
                authors.get(&post.author_id),
                post.is_anonymous,
            ),
            "created_at": &post.created_at,
        }))
        .collect();

    Ok(rendered)
}
