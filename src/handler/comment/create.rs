use uuid::Uuid;
use chrono::Utc;
use serde_json::json;
use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use crate::Integrations::mailer;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::post::Post;
use crate::model::comment::{self, Comment};
use crate::model::notification::{self, CommentEvent, Notification};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    post_id: String,
    content: String,
    parent_id: Option<String>,
    is_anonymous: Option<bool>,
}

pub async fn task(
    req: HttpRequest,
    form_data: web::Json<ReqBody>
) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;
    let user_id = user.user_id;

    if form_data.content.trim().is_empty() {
        return Ok(Response::bad_request("Content is required"));
    }

    /* DATABASE ACID SESSION INIT */
    let (db, mut session) = MongoDB.connect_acid().await;

    if let Err(error) = session.start_transaction().await {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let collection = db.collection::<Post>("post");
    let result = collection.find_one(
        doc!{ "uuid": &form_data.post_id },
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

    // A reply can never be reparented onto a different post than its
    // ancestor chain.
    let mut parent: Option<Comment> = None;
    if let Some(parent_id) = &form_data.parent_id {
        let collection = db.collection::<Comment>("comment");
        let result = collection.find_one(
            doc!{ "uuid": parent_id },
        ).session(&mut session).await;

        if let Err(error) = &result {
            log::error!("{:?}", error);
            session.abort_transaction().await.ok();
            return Ok(Response::internal_server_error(&error.to_string()));
        }

        let Some(parent_comment) = result.unwrap() else {
            session.abort_transaction().await.ok();
            return Ok(Response::not_found("Parent comment not found"));
        };

        if parent_comment.post_id != form_data.post_id {
            session.abort_transaction().await.ok();
            return Ok(Response::bad_request("Parent comment belongs to another post"));
        }

        parent = Some(parent_comment);
    }

    let comment_id = Uuid::new_v4().to_string();
    let now = Utc::now().timestamp_millis();

    // The uuid is assigned before the insert, so the path is committed
    // together with the row; no reader ever sees a comment without one.
    let path = comment::assign_path(
        &comment_id,
        parent.as_ref().map(|p| p.path.as_str()),
    );

    let comment = Comment {
        uuid: comment_id.clone(),
        post_id: form_data.post_id.clone(),
        author_id: user_id.clone(),
        content: form_data.content.clone(),
        parent_id: form_data.parent_id.clone(),
        path,
        is_anonymous: form_data.is_anonymous.unwrap_or(false),
        created_at: now,
    };

    let collection = db.collection::<Comment>("comment");
    let result = collection.insert_one(&comment).session(&mut session).await;

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

    // Fan out after the comment is durable. A notification or delivery
    // failure must never undo a saved comment.
    let plan = notification::plan_for_comment(&CommentEvent {
        author_id: &user_id,
        is_anonymous: comment.is_anonymous,
        post_id: &post.uuid,
        post_author_id: &post.author_id,
        parent: parent.as_ref().map(|p| (p.uuid.as_str(), p.author_id.as_str())),
    });

    let collection = db.collection::<Notification>("notification");
    for notification in plan {
        if let Err(error) = collection.insert_one(&notification).await {
            log::error!("{:?}", error);
            continue;
        }

        // Fire and forget: the record exists before delivery is attempted.
        let db = db.clone();
        actix_web::rt::spawn(async move {
            mailer::deliver(&db, &notification).await;
        });
    }

    Ok(
        HttpResponse::Created()
        .content_type("application/json")
        .json(json!({
            "uuid": &comment.uuid,
            "post_id": &comment.post_id,
            "parent_id": &comment.parent_id,
            "path": &comment.path,
            "depth": comment.depth(),
            "created_at": &comment.created_at,
        }))
    )
}
