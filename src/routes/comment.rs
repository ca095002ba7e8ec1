use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/comment")
        //Create
        .route(
          "",
          web::post().to(Handler::Comment::Create::task)
        )
        //List roots (per post or admin-wide)
        .route(
          "",
          web::get().to(Handler::Comment::List::task)
        )
        //Get
        .route(
          "/{uuid}",
          web::get().to(Handler::Comment::Get::task)
        )
    );
}
