use actix_web::web;
use crate::Handler;

pub fn router(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/location")
        //Place autocomplete
        .route(
          "/autocomplete",
          web::post().to(Handler::Location::Autocomplete::task)
        )
        //Reverse geocode with address scoring
        .route(
          "/resolve",
          web::post().to(Handler::Location::Resolve::task)
        )
    );
}
