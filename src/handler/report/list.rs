use mongodb::bson::doc;
use crate::BuiltIns::mongo::MongoDB;
use crate::utils::response::Response;
use crate::utils::mongo::{find_sorted, read_all};
use actix_web::{Error, HttpResponse, HttpRequest};
use crate::middleware::auth::{require_access, AccessRequirement};
use crate::model::account::AccountRole;
use crate::model::report::Report;

pub async fn task(req: HttpRequest) -> Result<HttpResponse, Error> {
    require_access(
        &req,
        AccessRequirement::AnyOf(vec![
            AccountRole::Admin,
            AccountRole::SuperAdmin,
        ])
    )?;

    let db = MongoDB.connect();
    let collection = db.collection::<Report>("report");
    let result = find_sorted(&collection, doc!{}, false, None).await;

    if let Err(error) = &result {
        log::error!("{:?}", error);
        return Ok(Response::internal_server_error(&error.to_string()));
    }

    let reports = match read_all(result.unwrap()).await {
        Ok(reports) => reports,
        Err(error) => {
            log::error!("{:?}", error);
            return Ok(Response::internal_server_error(&error.to_string()));
        },
    };

    Ok(
        HttpResponse::Ok()
        .content_type("application/json")
        .json(reports)
    )
}
