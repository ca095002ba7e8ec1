use uuid::Uuid;
use chrono::Utc;
use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::comment::Comment;
use crate::model::post::Post;
use crate::model::report::{Report, ReportSubject, ReportType};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReqBody {
    pub post_id: Option<String>,
    pub comment_id: Option<String>,
    pub r#type: ReportType,
    pub message: Option<String>,
}

pub async fn task(
    req: HttpRequest,
    form_data: web::Json<ReqBody>
) -> Result<HttpResponse, Error> {
    let user = require_access(&req, AccessRequirement::AnyToken)?;

    let db = MongoDB.connect();

    // Exactly one subject, and it has to exist.
    let subject = match (&form_data.post_id, &form_data.comment_id) {
        (Some(post_id), None) => {
            let collection = db.collection::<Post>("post");
            let result = collection.find_one(doc!{ "uuid": post_id }).await;

            if let Err(error) = &result {
                log::error!("{:?}", error);
                return Ok(Response::internal_server_error(&error.to_string()));
            }

            if result.unwrap().is_none() {
                return Ok(Response::not_found("Post not found"));
            }

            ReportSubject::Post(post_id.clone())
        },
        (None, Some(comment_id)) => {
            let collection = db.collection::<Comment>("comment");
            let result = collection.find_one(doc!{ "uuid": comment_id }).await;

            if let Err(error) = &result {
                log::error!("{:?}", error);
                return Ok(Response::internal_server_error(&error.to_string()));
            }

            if result.unwrap().is_none() {
                return Ok(Response::not_found("Comment not found"));
            }

            ReportSubject::Comment(comment_id.clone())
        },
        _ => {
            return Ok(Response::bad_request(
                "Exactly one of post_id and comment_id is required"
            ));
        },
    };

    let report = Report {
        uuid: Uuid::new_v4().to_string(),
        reporter_id: user.user_id,
        subject,
        r#type: form_data.r#type.clone(),
        message: form_data.message.clone(),
        created_at: Utc::now().timestamp_millis(),
    };

    let collection = db.collection::<Report>("report");
    let result = collection.insert_one(&report).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    Ok(Response::ok("Reported successfully"))
}
