use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportType {
    Spam,
    Threat,
    Inappropriate,
    Other,
}
impl std::fmt::Display for ReportType {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt,"{:?}", self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "subject_kind", content = "subject_id")]
pub enum ReportSubject {
    Post(String),
    Comment(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Report {
    pub uuid: String,
    pub reporter_id: String,

    #[serde(flatten)]
    pub subject: ReportSubject,

    pub r#type: ReportType,
    pub message: Option<String>,
    pub created_at: i64,
}
