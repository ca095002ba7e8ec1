use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/report")
        //Create
        .route(
          "",
          web::post().to(Handler::Report::Create::task)
        )
        //List (admin)
        .route(
          "",
          web::get().to(Handler::Report::List::task)
        )
    );
}
