use actix_web::{get, HttpResponse, Responder, web};
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::HttpRequest;
use log::debug;

use crate::core::error::Error;

pub mod directors;
pub mod genres;
pub mod movies;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok()
}

fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("rejecting payload for {}: {}", req.path(), err);
    Error::PayloadError(err.to_string()).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("rejecting query for {}: {}", req.path(), err);
    Error::PayloadError(err.to_string()).into()
}

/// Registers every catalog route. The caller supplies the
/// `Data<DbConnectionPool>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .service(health)
        .service(movies::get_movies)
        .service(movies::post_movie)
        .service(movies::get_movie)
        .service(movies::put_movie)
        .service(movies::delete_movie)
        .service(directors::get_directors)
        .service(directors::post_director)
        .service(directors::get_director)
        .service(directors::put_director)
        .service(directors::delete_director)
        .service(genres::get_genres)
        .service(genres::post_genre)
        .service(genres::get_genre)
        .service(genres::put_genre)
        .service(genres::delete_genre);
}
