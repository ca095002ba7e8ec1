use std::time::Duration;

use serde_json::json;
use mongodb::{bson::doc, Database};
use crate::model::account::{Account, ANONYMOUS_NAME};
use crate::model::comment::Comment;
use crate::model::notification::{Notification, NotificationSubject};
use crate::model::post::Post;

const DELIVERY_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Best-effort email for an already persisted notification. Every failure
/// path here is logged and swallowed; the notification record is the
/// source of truth and delivery never rolls anything back.
pub async fn deliver(db: &Database, notification: &Notification) {
    let Some(recipient) = find_account(db, &notification.recipient_id).await else {
        log::warn!(
            "notification {} has no recipient account, skipping email",
            notification.uuid,
        );
        return;
    };

    let responder = find_account(db, &notification.responder_id).await;
    let responder_name = match notification.is_responder_anonymous {
        true => ANONYMOUS_NAME.to_string(),
        false => responder
            .map(|a| a.display_name())
            .unwrap_or_else(|| "Someone".to_string()),
    };

    let message = json!({
        "to": recipient.email,
        "subject": "You have a new notification",
        "body": notification.message(&responder_name),
        "subject_title": subject_title(db, &notification.subject).await,
    });

    let Ok(url) = std::env::var("MAILER_URL") else {
        log::info!("MAILER_URL not configured, would notify {}", recipient.email);
        return;
    };

    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(error) => {
            log::error!("{:?}", error);
            return;
        },
    };

    for attempt in 1..=DELIVERY_ATTEMPTS {
        match client.post(&url).json(&message).send().await {
            Ok(response) if response.status().is_success() => return,
            Ok(response) => {
                log::warn!(
                    "mailer returned {} (attempt {}/{})",
                    response.status(),
                    attempt,
                    DELIVERY_ATTEMPTS,
                );
            },
            Err(error) => {
                log::warn!(
                    "mailer request failed (attempt {}/{}): {:?}",
                    attempt,
                    DELIVERY_ATTEMPTS,
                    error,
                );
            },
        }

        if attempt < DELIVERY_ATTEMPTS {
            tokio::time::sleep(BACKOFF_BASE * 2u32.pow(attempt - 1)).await;
        }
    }

    log::error!("giving up on notification email to {}", recipient.email);
}

async fn find_account(db: &Database, uuid: &str) -> Option<Account> {
    let collection = db.collection::<Account>("account");
    match collection.find_one(doc!{ "uuid": uuid }).await {
        Ok(account) => account,
        Err(error) => {
            log::error!("{:?}", error);
            None
        },
    }
}

/// Title of whatever the notification points at; `None` when the subject
/// has been deleted since.
async fn subject_title(db: &Database, subject: &NotificationSubject) -> Option<String> {
    match subject {
        NotificationSubject::Post(uuid) => {
            let collection = db.collection::<Post>("post");
            collection.find_one(doc!{ "uuid": uuid }).await
                .ok()
                .flatten()
                .map(|post| post.title)
        },
        NotificationSubject::Comment(uuid) => {
            let collection = db.collection::<Comment>("comment");
            collection.find_one(doc!{ "uuid": uuid }).await
                .ok()
                .flatten()
                .map(|comment| excerpt(&comment.content))
        },
    }
}

fn excerpt(content: &str) -> String {
    const LIMIT: usize = 80;

    if content.chars().count() <= LIMIT {
        return content.to_string();
    }

    let cut: String = content.chars().take(LIMIT).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_passes_through_unchanged() {
        assert_eq!(excerpt("nice spot"), "nice spot");
    }

    #[test]
    fn long_content_is_truncated_with_an_ellipsis() {
        let long = "x".repeat(200);
        let cut = excerpt(&long);

        assert_eq!(cut.chars().count(), 81);
        assert!(cut.ends_with('…'));
    }
}
