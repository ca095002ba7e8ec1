use actix_web::HttpResponse;

use crate::utils::response::Response;

pub mod post;
pub use post as Post;

pub mod comment;
pub use comment as Comment;

pub mod tag;
pub use tag as Tag;

pub mod notification;
pub use notification as Notification;

pub mod report;
pub use report as Report;

pub mod location;
pub use location as Location;

pub async fn not_found() -> HttpResponse {
    Response::not_found("No such endpoint")
}
