use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/tag")
        //Create
        .route(
          "",
          web::post().to(Handler::Tag::Create::task)
        )
        //Ranked search
        .route(
          "",
          web::get().to(Handler::Tag::Search::task)
        )
    );
}
