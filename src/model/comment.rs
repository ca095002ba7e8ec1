use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Comment {
    pub uuid: String,
    pub post_id: String,
    pub author_id: String,

    pub content: String,
    pub parent_id: Option<String>,

    /// Dot-delimited chain of ancestor uuids ending in this comment's own
    /// uuid. Assigned exactly once at creation, never mutated; no reader
    /// ever observes a comment without a path.
    pub path: String,

    pub is_anonymous: bool,
    pub created_at: i64,
}

impl Comment {
    pub fn depth(&self) -> usize {
        depth_of(&self.path)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Materialized path for a new comment: the parent's path extended by the
/// comment's own uuid, or the uuid alone for a root comment. Paths are
/// append-only; no rebalancing or compression is ever performed.
pub fn assign_path(own_uuid: &str, parent_path: Option<&str>) -> String {
    match parent_path {
        Some(parent_path) => format!("{}.{}", parent_path, own_uuid),
        None => own_uuid.to_string(),
    }
}

pub fn depth_of(path: &str) -> usize {
    path.split('.').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_path_is_the_own_uuid() {
        let path = assign_path("c1", None);
        assert_eq!(path, "c1");
        assert_eq!(depth_of(&path), 1);
    }

    #[test]
    fn child_path_extends_parent_by_one_segment() {
        let parent = assign_path("c1", None);
        let child = assign_path("c2", Some(&parent));
        let grandchild = assign_path("c3", Some(&child));

        assert_eq!(child, "c1.c2");
        assert_eq!(grandchild, "c1.c2.c3");

        assert!(grandchild.starts_with(&format!("{}.", child)));
        assert_eq!(depth_of(&child), depth_of(&parent) + 1);
        assert_eq!(depth_of(&grandchild), depth_of(&child) + 1);
    }

    #[test]
    fn depth_counts_path_segments() {
        let comment = Comment {
            uuid: "c3".to_string(),
            post_id: "p1".to_string(),
            author_id: "u1".to_string(),
            content: "hello".to_string(),
            parent_id: Some("c2".to_string()),
            path: "c1.c2.c3".to_string(),
            is_anonymous: false,
            created_at: 0,
        };

        assert_eq!(comment.depth(), 3);
        assert!(!comment.is_root());
    }
}
