use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Post {
    pub uuid: String,
    pub author_id: String,

    pub title: String,
    pub content: String,
    pub icon_id: String,

    pub latitude: f64,
    pub longitude: f64,
    pub location: String,

    //uuids of the tags attached to this post
    pub tags: Vec<String>,

    pub is_anonymous: bool,
    pub created_at: i64,
}

//shape returned by calendar preview buckets
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostSummary {
    pub uuid: String,
    pub title: String,
    pub created_at: i64,
}

impl Post {
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            uuid: self.uuid.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
        }
    }
}
