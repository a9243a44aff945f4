use actix_web::{delete, get, HttpResponse, put, routes, web};
use actix_web::http::header;
use actix_web::web::Json;

use crate::core::{CreateNamedParams, Resource, UpdateNamedParams};
use crate::core::action;
use crate::core::error::Error;
use crate::db::{DbConnection, DbConnectionPool};

#[routes]
#[get("/directors")]
#[get("/directors/")]
pub async fn get_directors(
    pool: web::Data<DbConnectionPool>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    let directors = web::block(move || action::find_directors(&mut conn))
        .await??;

    Ok(HttpResponse::Ok().json(directors))
}

#[routes]
#[post("/directors")]
#[post("/directors/")]
pub async fn post_director(
    pool: web::Data<DbConnectionPool>,
    req: Json<CreateNamedParams>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    let id = web::block(move || action::create_director(&mut conn, req.into_inner()))
        .await??;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/directors/{}", id)))
        .json("Director created"))
}

#[get("/directors/{director_id}")]
pub async fn get_director(
    pool: web::Data<DbConnectionPool>,
    director_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let id = director_id.into_inner();

    let maybe = web::block(move || action::find_one_director(&mut conn, id))
        .await??;

    match maybe {
        None => Err(Error::NotFoundError { resource: Resource::Director, id }),
        Some(director) => Ok(HttpResponse::Ok().json(director))
    }
}

#[put("/directors/{director_id}")]
pub async fn put_director(
    pool: web::Data<DbConnectionPool>,
    director_id: web::Path<i32>,
    req: Json<UpdateNamedParams>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;

    web::block(move || action::update_director(&mut conn, director_id.into_inner(), req.into_inner()))
        .await??;

    Ok(HttpResponse::NoContent().finish())
}

#[delete("/directors/{director_id}")]
pub async fn delete_director(
    pool: web::Data<DbConnectionPool>,
    director_id: web::Path<i32>,
) -> Result<HttpResponse, Error> {
    let mut conn: DbConnection = pool.get()?;
    let id = director_id.into_inner();

    let was_present = web::block(move || action::delete_director(&mut conn, id))
        .await??;

    if was_present {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(Error::NotFoundError { resource: Resource::Director, id })
    }
}
