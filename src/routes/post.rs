use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/post")
        //Create
        .route(
          "",
          web::post().to(Handler::Post::Create::task)
        )
        //Get one or list all
        .route(
          "",
          web::get().to(Handler::Post::Get::task)
        )
        //Search with filters and proximity ordering
        .route(
          "/search",
          web::post().to(Handler::Post::Search::task)
        )
        //Calendar preview
        .route(
          "/calendar",
          web::post().to(Handler::Post::Calendar::task)
        )
        //Delete
        .route(
          "/{uuid}",
          web::delete().to(Handler::Post::Delete::task)
        )
    );
}
