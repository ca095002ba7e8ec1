use mongodb::bson::{doc, Bson};
use crate::BuiltIns::mongo::MongoDB;
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::account::AccountRole;
use crate::model::comment::Comment;
use crate::model::post::Post;
use crate::model::tag::Tag;

pub async fn task(
    req: HttpRequest,
    path: web::Path<String>
) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;
    let uuid = path.into_inner();

    /* DATABASE ACID SESSION INIT */
    let (db, mut session) = MongoDB.connect_acid().await;

    if let Err(error) = session.start_transaction().await {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let collection = db.collection::<Post>("post");
    let result = collection.find_one(
        doc!{ "uuid": &uuid },
    ).session(&mut session).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        session.abort_transaction().await.ok();
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let Some(post) = result.unwrap() else {
        session.abort_transaction().await.ok();
        return Ok(Response::not_found("Post not found"));
    };

    let is_admin = matches!(user.role, AccountRole::Admin | AccountRole::SuperAdmin);
    if post.author_id != user.user_id && !is_admin {
        session.abort_transaction().await.ok();
        return Ok(Response::forbidden("You are not authorized to perform this action"));
    }

    // Give back each tag's usage slot, clamped at zero; a shortfall means
    // the counters already drifted and is worth an alarm.
    if !post.tags.is_empty() {
        let tag_ids: Vec<Bson> = post.tags
            .iter()
            .map(|id| Bson::String(id.clone()))
            .collect();

        let collection = db.collection::<Tag>("tag");
        let result = collection.update_many(
            doc!{ "uuid": { "$in": tag_ids.clone() }, "count": { "$gt": 0 } },
            doc!{ "$inc": { "count": -1 } },
        ).session(&mut session).await;

        match result {
            Ok(outcome) => {
                if (outcome.modified_count as usize) < post.tags.len() {
                    log::warn!(
                        "tag counter underflow while deleting post {}: {} of {} decremented",
                        post.uuid,
                        outcome.modified_count,
                        post.tags.len(),
                    );
                }
            },
            Err(error) => {
                log::error!("{:?}", error);
                session.abort_transaction().await.ok();
                return Ok(Response::internal_server_error(&error.to_string()));
            },
        }
    }

    // Comments are owned by the post. Notifications pointing at the post or
    // its comments are weak references and stay behind.
    let collection = db.collection::<Comment>("comment");
    let result = collection.delete_many(
        doc!{ "post_id": &post.uuid },
    ).session(&mut session).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        session.abort_transaction().await.ok();
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let collection = db.collection::<Post>("post");
    let result = collection.delete_one(
        doc!{ "uuid": &post.uuid },
    ).session(&mut session).await;

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

    Ok(Response::ok(&format!("Post {} deleted", uuid)))
}
