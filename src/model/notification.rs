use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::Utc;

/// What a notification is about. Stored as a discriminator plus a foreign
/// uuid; the reference is weak, the subject may have been deleted since.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "subject_kind", content = "subject_id")]
pub enum NotificationSubject {
    Post(String),
    Comment(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Notification {
    pub uuid: String,
    pub recipient_id: String,
    pub responder_id: String,
    pub is_responder_anonymous: bool,

    #[serde(flatten)]
    pub subject: NotificationSubject,

    pub read: bool,
    pub created_at: i64,
}

impl Notification {
    /// Message text derived at render time; `responder_name` has already
    /// been through the anonymity transform.
    pub fn message(&self, responder_name: &str) -> String {
        match self.subject {
            NotificationSubject::Post(_) => {
                format!("{} commented on your post!", responder_name)
            }
            NotificationSubject::Comment(_) => {
                format!("{} replied to your comment!", responder_name)
            }
        }
    }
}

/// A freshly created comment, as the dispatcher sees it.
pub struct CommentEvent<'a> {
    pub author_id: &'a str,
    pub is_anonymous: bool,
    pub post_id: &'a str,
    pub post_author_id: &'a str,
    /// (uuid, author uuid) of the parent comment, when the new comment is
    /// a reply.
    pub parent: Option<(&'a str, &'a str)>,
}

/// Notifications owed for a freshly created comment. The post author and
/// the parent comment's author are notified independently, and the
/// commenter never notifies themselves; a reply to someone else's comment
/// on someone else's post produces two records.
pub fn plan_for_comment(event: &CommentEvent) -> Vec<Notification> {
    let now = Utc::now().timestamp_millis();
    let mut notifications = Vec::new();

    if event.post_author_id != event.author_id {
        notifications.push(Notification {
            uuid: Uuid::new_v4().to_string(),
            recipient_id: event.post_author_id.to_string(),
            responder_id: event.author_id.to_string(),
            is_responder_anonymous: event.is_anonymous,
            subject: NotificationSubject::Post(event.post_id.to_string()),
            read: false,
            created_at: now,
        });
    }

    if let Some((parent_id, parent_author_id)) = event.parent {
        if parent_author_id != event.author_id {
            notifications.push(Notification {
                uuid: Uuid::new_v4().to_string(),
                recipient_id: parent_author_id.to_string(),
                responder_id: event.author_id.to_string(),
                is_responder_anonymous: event.is_anonymous,
                subject: NotificationSubject::Comment(parent_id.to_string()),
                read: false,
                created_at: now,
            });
        }
    }

    notifications
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_post_own_comment_notifies_nobody() {
        let plan = plan_for_comment(&CommentEvent {
            author_id: "z",
            is_anonymous: false,
            post_id: "p1",
            post_author_id: "z",
            parent: None,
        });

        assert!(plan.is_empty());
    }

    #[test]
    fn comment_on_foreign_post_notifies_the_post_author() {
        let plan = plan_for_comment(&CommentEvent {
            author_id: "x",
            is_anonymous: false,
            post_id: "p1",
            post_author_id: "z",
            parent: None,
        });

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].recipient_id, "z");
        assert_eq!(plan[0].responder_id, "x");
        assert_eq!(plan[0].subject, NotificationSubject::Post("p1".to_string()));
        assert!(!plan[0].read);
    }

    #[test]
    fn reply_notifies_post_author_and_parent_author() {
        let plan = plan_for_comment(&CommentEvent {
            author_id: "x",
            is_anonymous: true,
            post_id: "p1",
            post_author_id: "z",
            parent: Some(("c1", "y")),
        });

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].recipient_id, "z");
        assert_eq!(plan[0].subject, NotificationSubject::Post("p1".to_string()));
        assert_eq!(plan[1].recipient_id, "y");
        assert_eq!(plan[1].subject, NotificationSubject::Comment("c1".to_string()));
        assert!(plan.iter().all(|n| n.is_responder_anonymous));
    }

    #[test]
    fn reply_to_own_comment_only_notifies_the_post_author() {
        let plan = plan_for_comment(&CommentEvent {
            author_id: "x",
            is_anonymous: false,
            post_id: "p1",
            post_author_id: "z",
            parent: Some(("c1", "x")),
        });

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].recipient_id, "z");
    }

    #[test]
    fn message_depends_on_subject_kind() {
        let notification = Notification {
            uuid: "n1".to_string(),
            recipient_id: "z".to_string(),
            responder_id: "x".to_string(),
            is_responder_anonymous: false,
            subject: NotificationSubject::Comment("c1".to_string()),
            read: false,
            created_at: 0,
        };

        assert_eq!(
            notification.message("Jan Kowalski"),
            "Jan Kowalski replied to your comment!"
        );
    }
}
