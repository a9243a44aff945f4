use actix_web::{delete, get, HttpResponse, put, routes, web};
use actix_web::http::header;
use actix_web::web::Json;

use crate::core::{CreateNamedParams, Resource, UpdateNamedParams};
use crate::core::action;
use crate::core::error::Error;
use crate::db::{DbConnection, DbConnectionPool};

#[routes]
#[get("/genres")]
#[get("/genres/")]
pub async fn get_genres(
    pool: web::Data<DbConnectionPool>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    let genres = web::block(move || action::find_genres(&mut conn))
        .await??;

    Ok(HttpResponse::Ok().json(genres))
}

#[routes]
#[post("/genres")]
#[post("/genres/")]
pub async fn post_genre(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateNamedParams>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    let id = web::block(move || action::create_genre(&mut conn, req.into_inner()))
        .await??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/genres/{}", id)))
        .json("Genre created"))
}

#[get("/genres/{genre_id}")]
pub async fn get_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let id = genre_id.into_inner();

    let maybe = web::block(move || action::find_one_genre(&mut conn, id))
        .await??;

    match maybe {
        None => Err(Error::NotFoundError { resource: Resource::Genre, id }),
        Some(genre) => Ok(HttpResponse::Ok().json(genre))
    }
}

#[put("/genres/{genre_id}")]
pub async fn put_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
    req: Json<UpdateNamedParams>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    web::block(move || action::update_genre(&mut conn, genre_id.into_inner(), req.into_inner()))
        .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/genres/{genre_id}")]
pub async fn delete_genre(
    pool: web::Data<DbConnectionPool>,
    genre_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let id = genre_id.into_inner();

    let was_present = web::block(move || action::delete_genre(&mut conn, id))
        .await??;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError { resource: Resource::Genre, id })
    }
}
