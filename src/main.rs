use actix_cors::Cors;
use actix_web::{web, App, HttpServer};

pub mod builtins;
pub use builtins as BuiltIns;

pub mod integrations;
pub use integrations as Integrations;

pub mod model;
pub use model as Model;

pub mod handler;
pub use handler as Handler;

pub mod routes;
pub use routes as Routes;

pub mod middleware;
pub use middleware as Middleware;

pub mod utils;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    builtins::mongo::MongoDB.init().await;

    let bind_addr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:5000".to_string());

    log::info!("Starting server at {}", bind_addr);

    HttpServer::new(|| {
        let cors = Cors::default()
            .allowed_origin("https://localhost:5173")
            .allowed_origin("https://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec!["Content-Type", "Authorization"])
            .supports_credentials();

        App::new()
            .wrap(cors)
            .configure(Routes::Post::router)
            .configure(Routes::Comment::router)
            .configure(Routes::Tag::router)
            .configure(Routes::Notification::router)
            .configure(Routes::Report::router)
            .configure(Routes::Location::router)
            .default_service(web::route().to(handler::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
