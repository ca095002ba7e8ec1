use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde_json::json;
use mongodb::bson::{doc, Bson};
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use futures::TryStreamExt;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::post::Post;
use crate::model::tag::Tag;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    title: String,
    content: String,
    icon_id: String,
    latitude: f64,
    longitude: f64,
    location: String,
    tags_ids: Vec<String>,
    is_anonymous: Option<bool>,
    created_at: Option<DateTime<Utc>>,
}

pub async fn task(
    req: HttpRequest,
    form_data: web::Json<ReqBody>
) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;
    let user_id = user.user_id;

    if let Err(res) = check_empty_fields(&form_data) {
        return Ok(Response::bad_request(&res));
    }

    /* DATABASE ACID SESSION INIT */
    let (db, mut session) = MongoDB.connect_acid().await;

    if let Err(error) = session.start_transaction().await {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    // Every referenced tag must exist before anything is mutated.
    let tag_ids: Vec<Bson> = form_data.tags_ids
        .iter()
        .map(|id| Bson::String(id.clone()))
        .collect();

    let collection = db.collection::<Tag>("tag");
    let result = collection.find(
        doc!{ "uuid": { "$in": tag_ids.clone() } },
    ).session(&mut session).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        session.abort_transaction().await.ok();
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let found: Vec<Tag> = match result.unwrap().stream(&mut session).try_collect().await {
        Ok(found) => found,
        Err(error) => {
            log::error!("{:?}", error);
            session.abort_transaction().await.ok();
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    if let Some(missing) = first_missing_tag_id(&form_data.tags_ids, &found) {
        session.abort_transaction().await.ok();
        return Ok(Response::bad_request(
            &format!("Tag with id {} not found", missing)
        ));
    }

    // Counter bump pushed down to the store, never read-modify-write.
    if !form_data.tags_ids.is_empty() {
        let result = collection.update_many(
            doc!{ "uuid": { "$in": tag_ids.clone() } },
            doc!{ "$inc": { "count": 1 } },
        ).session(&mut session).await;

        if let Err(error) = &result {
            log::error!("{:?}", error);
            session.abort_transaction().await.ok();
            return Ok(Response::internal_server_error(&error.to_string()));
        }
    }

    let now = Utc::now().timestamp_millis();
    let post = Post {
        uuid: Uuid::new_v4().to_string(),
        author_id: user_id,
        title: form_data.title.clone(),
        content: form_data.content.clone(),
        icon_id: form_data.icon_id.clone(),
        latitude: form_data.latitude,
        longitude: form_data.longitude,
        location: form_data.location.clone(),
        tags: form_data.tags_ids.clone(),
        is_anonymous: form_data.is_anonymous.unwrap_or(false),
        created_at: form_data.created_at
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(now),
    };

    let collection = db.collection::<Post>("post");
    let result = collection.insert_one(&post).session(&mut session).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        session.abort_transaction().await.ok();
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    /* DATABASE ACID COMMIT */
    if let Err(error) = session.commit_transaction().await {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(json!({
            "uuid": &post.uuid,
            "title": &post.title,
            "tags": &post.tags,
            "created_at": &post.created_at,
        }))
    )
}

/// First requested id with no matching tag. Requested ids may repeat, so
/// membership is checked per id rather than by comparing counts.
fn first_missing_tag_id(requested: &[String], found: &[Tag]) -> Option<String> {
    requested
        .iter()
        .find(|id| !found.iter().any(|tag| &tag.uuid == *id))
        .cloned()
}

fn check_empty_fields(data: &ReqBody) -> Result<(), String> {
    if data.title.trim().is_empty() {
        Err("Title is required".to_string())
    }
    else if data.content.trim().is_empty() {
        Err("Content is required".to_string())
    }
    else if data.location.trim().is_empty() {
        Err("Location is required".to_string())
    }
    else if data.icon_id.trim().is_empty() {
        Err("Icon is required".to_string())
    }
    else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(uuid: &str) -> Tag {
        Tag {
            uuid: uuid.to_string(),
            name: uuid.to_string(),
            count: 0,
        }
    }

    #[test]
    fn repeated_tag_ids_are_not_reported_missing() {
        let requested = vec!["a".to_string(), "a".to_string()];
        let found = vec![tag("a")];

        assert_eq!(first_missing_tag_id(&requested, &found), None);
    }

    #[test]
    fn the_first_unknown_tag_id_is_named() {
        let requested = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let found = vec![tag("a"), tag("c")];

        assert_eq!(
            first_missing_tag_id(&requested, &found),
            Some("b".to_string()),
        );
    }
}
