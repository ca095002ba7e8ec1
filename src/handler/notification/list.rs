use std::collections::HashMap;

use serde_json::json;
use mongodb::bson::{doc, Bson};
use mongodb::Database;
use crate::BuiltIns::mongo::MongoDB;
use crate::utils::response::Response;
use crate::utils::mongo::{find_sorted, read_all};
use actix_web::{Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::account::{self, Account, ANONYMOUS_NAME};
use crate::model::comment::Comment;
use crate::model::notification::{Notification, NotificationSubject};
use crate::model::post::Post;

/// The caller's notifications, newest first. Fetching the list marks every
/// returned record as read; the response still shows the pre-fetch state.
pub async fn task(req: HttpRequest) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;
    let user_id = user.user_id;

    let db = MongoDB.connect();
    let collection = db.collection::<Notification>("notification");
    let result = find_sorted(
        &collection,
        doc!{ "recipient_id": &user_id },
        false,
        None,
    ).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let notifications = match read_all(result.unwrap()).await {
        Ok(notifications) => notifications,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    let responders = match load_responders(&db, &notifications).await {
        Ok(responders) => responders,
        Err(error) => return Ok(error),
    };

    let mut rendered = Vec::with_capacity(notifications.len());
    for notification in &notifications {
        let responder = responders.get(&notification.responder_id);

        let responder_name = match notification.is_responder_anonymous {
            true => ANONYMOUS_NAME.to_string(),
            false => responder
                .map(|a| a.display_name())
                .unwrap_or_else(|| "Someone".to_string()),
        };

        // Weak subject reference: a deleted post or comment renders as a
        // null subject, never an error.
        let subject = match resolve_subject(&db, &notification.subject).await {
            Ok(subject) => subject,
            Err(error) => return Ok(error),
        };

        rendered.push(json!({
            "uuid": &notification.uuid,
            "message": notification.message(&responder_name),
            "responder": account::display_identity(
                responder,
                notification.is_responder_anonymous,
            ),
            "subject": subject,
            "read": &notification.read,
            "created_at": &notification.created_at,
        }));
    }

    // Mark-as-read is a side effect of the fetch.
    let result = collection.update_many(
        doc!{ "recipient_id": &user_id, "read": false },
        doc!{ "$set": { "read": true } },
    ).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
    }

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(rendered)
    )
}

async fn load_responders(
    db: &Database,
    notifications: &[Notification],
) -> Result<HashMap<String, Account>, HttpResponse> {
    let responder_ids: Vec<Bson> = notifications
        .iter()
        .map(|n| Bson::String(n.responder_id.clone()))
        .collect();

    let collection = db.collection::<Account>("account");
    let result = collection.find(doc!{ "uuid": { "$in": responder_ids } }).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Err(Response::internal_server_error(&error.to_string()));
    }

    let accounts = match read_all(result.unwrap()).await {
        Ok(accounts) => accounts,
        Err(error) => {
            log::error!("{:?}", error);
            return Err(Response::internal_server_error(&error.to_string()));
        },
    };

    Ok(accounts.into_iter().map(|a| (a.uuid.clone(), a)).collect())
}

async fn resolve_subject(
    db: &Database,
    subject: &NotificationSubject,
) -> Result<serde_json::Value, HttpResponse> {
    match subject {
        NotificationSubject::Post(uuid) => {
            let collection = db.collection::<Post>("post");
            let result = collection.find_one(doc!{ "uuid": uuid }).await;

            match result {
                Ok(Some(post)) => Ok(json!({
                    "kind": "Post",
                    "uuid": &post.uuid,
                    "title": &post.title,
                })),
                Ok(None) => Ok(serde_json::Value::Null),
                Err(error) => {
                    log::error!("{:?}", error);
                    Err(Response::internal_server_error(&error.to_string()))
                },
            }
        },
        NotificationSubject::Comment(uuid) => {
            let collection = db.collection::<Comment>("comment");
            let result = collection.find_one(doc!{ "uuid": uuid }).await;

            match result {
                Ok(Some(comment)) => Ok(json!({
                    "kind": "Comment",
                    "uuid": &comment.uuid,
                    "content": &comment.content,
                })),
                Ok(None) => Ok(serde_json::Value::Null),
                Err(error) => {
                    log::error!("{:?}", error);
                    Err(Response::internal_server_error(&error.to_string()))
                },
            }
        },
    }
}
