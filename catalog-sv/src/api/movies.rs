use actix_web::{delete, get, HttpResponse, put, routes, web};
use actix_web::http::header;
use actix_web::web::Json;

use crate::core::{CreateMovieParams, MovieFilter, Resource, UpdateMovieParams};
use crate::core::action;
use crate::core::error::Error;
use crate::db::{DbConnection, DbConnectionPool};

#[routes]
#[get("/movies")]
#[get("/movies/")]
pub async fn get_movies(
    pool: web::Data<DbConnectionPool>,
    filter: web::Query<MovieFilter>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let filter = filter.into_inner();

    let movies = web::block(move || action::find_movies(&mut conn, &filter))
        .await??;

    Ok(HttpResponse::Ok().json(movies))
}

#[routes]
#[post("/movies")]
#[post("/movies/")]
pub async fn post_movie(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateMovieParams>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    let id = web::block(move || action::create_movie(&mut conn, req.into_inner()))
        .await??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/movies/{}", id)))
        .json("Movie created"))
}

#[get("/movies/{movie_id}")]
pub async fn get_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let id = movie_id.into_inner();

    let maybe = web::block(move || action::find_one_movie(&mut conn, id))
        .await??;

    match maybe {
        None => Err(Error::NotFoundError { resource: Resource::Movie, id }),
        Some(movie) => Ok(HttpResponse::Ok().json(movie))
    }
}

#[put("/movies/{movie_id}")]
pub async fn put_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
    req: Json<UpdateMovieParams>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    web::block(move || action::update_movie(&mut conn, movie_id.into_inner(), req.into_inner()))
        .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/movies/{movie_id}")]
pub async fn delete_movie(
    pool: web::Data<DbConnectionPool>,
    movie_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let id = movie_id.into_inner();

    let was_present = web::block(move || action::delete_movie(&mut conn, id))
        .await??;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError { resource: Resource::Movie, id })
    }
}
