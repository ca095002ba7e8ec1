use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use serde::{ Serialize, Deserialize };
use crate::utils::response::Response;
use crate::utils::mongo::{find_sorted, read_all};
use actix_web::{web, Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::post::Post;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Query {
    uuid: Option<String>,
}

pub async fn task(
    req: HttpRequest,
    query: web::Query<Query>
) -> Result<HttpResponse, Error> {
    require_access(&req, AccessRequirement::AnyToken)?;

    let db = MongoDB.connect();
    let collection = db.collection::<Post>("post");

    let posts = match &query.uuid {
        Some(uuid) => {
            let result = collection.find_one(doc!{ "uuid": uuid }).await;

            if let Err(error) = &result {
                log::error!("{:?}", error);
                return Ok(Response::internal_server_error(&error.to_string()));
            }

            let Some(post) = result.unwrap() else {
                return Ok(Response::not_found("Post not found"));
            };

            vec![post]
        },
        None => {
            let result = find_sorted(&collection, doc!{}, false, None).await;

            if let Err(error) = &result {
                log::error!("{:?}", error);
                return Ok(Response::internal_server_error(&error.to_string()));
            }

            match read_all(result.unwrap()).await {
                Ok(posts) => posts,
                Err(error) => {
                    log::error!("{:?}", error);
                    return Ok(Response::internal_server_error(&error.to_string()));
                },
            }
        },
    };

    let rendered = match super::present_many(&db, &posts).await {
        Ok(rendered) => rendered,
        Err(error) => return Ok(error),
    };

    if query.uuid.is_some() {
        let single = rendered.into_iter().next();
        return Ok(
            HttpResponse::Ok()
            .content_type("application/json")
            .json(single)
        );
    }

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(rendered)
    )
}
