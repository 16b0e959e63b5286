mod api;
mod config;
mod error;
mod model;
mod routes;

use actix_identity::{CookieIdentityPolicy, IdentityService};
use actix_web::{middleware::Logger, web, App, HttpServer};
use api::ApiClient;
use config::Config;
use log::info;
use std::io;

fn startup_error<E: std::fmt::Display>(err: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("movie_ratings=debug,actix_web=info"),
    )
    .init();

    let config = Config::from_env().map_err(startup_error)?;
    let tera = tera::Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
        .map_err(startup_error)?;
    info!("serving on {}, backend at {}", config.bind, config.api_url);

    let bind = config.bind.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(IdentityService::new(
                CookieIdentityPolicy::new(&config.secret)
                    .name("auth-cookie")
                    .secure(false),
            ))
            .data(tera.clone())
            .data(ApiClient::new(&config.api_url, config.api_timeout))
            .configure(routes::configure)
            .default_service(web::route().to(routes::not_found))
    })
    .bind(bind)?
    .run()
    .await
}
