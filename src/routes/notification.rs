use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notification")
        //List mine (marks as read)
        .route(
          "",
          web::get().to(Handler::Notification::List::task)
        )
        //Delete all mine
        .route(
          "",
          web::delete().to(Handler::Notification::DeleteAll::task)
        )
        //Delete one
        .route(
          "/{uuid}",
          web::delete().to(Handler::Notification::Delete::task)
        )
    );
}
